//! 直播课场次存储操作

use super::SeaOrmStorage;
use crate::entity::bookings::{Column as BookingColumn, Entity as Bookings};
use crate::entity::sessions::{ActiveModel, Column, Entity as Sessions};
use crate::entity::waitlist_entries::{Column as WaitlistColumn, Entity as WaitlistEntries};
use crate::errors::{BookingSystemError, Result};
use crate::models::bookings::entities::{BookingStatus, CancelReason};
use crate::models::sessions::{
    entities::{Session, SessionStatus},
    requests::{CancelSessionRequest, CreateSessionRequest, SessionListQuery},
    responses::{CancelSessionResponse, SessionDetailResponse, SessionListResponse},
};
use crate::models::waitlist::entities::WaitlistStatus;
use crate::models::PaginationInfo;
use crate::utils::escape_like_pattern;
use crate::utils::validate::validate_create_session;
use chrono::TimeDelta;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建场次
    pub async fn create_session_impl(&self, req: CreateSessionRequest) -> Result<Session> {
        validate_create_session(&req)?;

        let now = chrono::Utc::now().timestamp();
        let end_at_utc = req.start_at_utc + TimeDelta::minutes(req.duration_minutes);

        let session = ActiveModel {
            course_id: Set(req.course_id),
            teacher_id: Set(req.teacher_id),
            title: Set(req.title),
            description: Set(req.description),
            start_at_utc: Set(req.start_at_utc.timestamp()),
            end_at_utc: Set(end_at_utc.timestamp()),
            timezone_snapshot: Set(req.timezone_snapshot),
            capacity: Set(req.capacity),
            seats_taken: Set(0),
            enable_waitlist: Set(req.enable_waitlist),
            status: Set(SessionStatus::SCHEDULED.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = session
            .insert(&self.db)
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("创建场次失败: {e}")))?;

        Ok(result.into_session())
    }

    /// 通过ID获取场次
    pub async fn get_session_by_id_impl(&self, session_id: i64) -> Result<Option<Session>> {
        let session = Sessions::find_by_id(session_id)
            .one(&self.db)
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("查询场次失败: {e}")))?;

        Ok(session.map(|m| m.into_session()))
    }

    /// 场次详情：已订座位数从预约表实时汇总，不信任冗余计数
    pub async fn get_session_detail_impl(
        &self,
        session_id: i64,
    ) -> Result<Option<SessionDetailResponse>> {
        let Some(session) = self.get_session_by_id_impl(session_id).await? else {
            return Ok(None);
        };

        let booked_seats = Self::sum_held_seats(&self.db, session_id).await?;

        let waiting_count = WaitlistEntries::find()
            .filter(WaitlistColumn::SessionId.eq(session_id))
            .filter(WaitlistColumn::Status.eq(WaitlistStatus::WAITING))
            .count(&self.db)
            .await
            .map_err(|e| {
                BookingSystemError::database_operation(format!("查询候补人数失败: {e}"))
            })?;

        let remaining_seats = (session.capacity - booked_seats).max(0);

        Ok(Some(SessionDetailResponse {
            session,
            booked_seats,
            remaining_seats,
            waiting_count: waiting_count as i64,
        }))
    }

    /// 列出场次
    pub async fn list_sessions_with_pagination_impl(
        &self,
        query: SessionListQuery,
    ) -> Result<SessionListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Sessions::find();

        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }

        if let Some(course_id) = query.course_id {
            select = select.filter(Column::CourseId.eq(course_id));
        }

        if let Some(ref status) = query.status {
            let status: SessionStatus = status.parse().map_err(BookingSystemError::validation)?;
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        if query.upcoming_only.unwrap_or(false) {
            let now = chrono::Utc::now().timestamp();
            select = select.filter(Column::StartAtUtc.gt(now));
        }

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(Column::Title.contains(&escaped));
        }

        // 按开始时间升序，最近的场次排在前面
        select = select.order_by_asc(Column::StartAtUtc);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("查询场次总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("查询场次页数失败: {e}")))?;

        let sessions = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("查询场次列表失败: {e}")))?;

        Ok(SessionListResponse {
            items: sessions.into_iter().map(|m| m.into_session()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 取消场次：级联取消所有活跃预约，并作废全部候补
    pub async fn cancel_session_impl(
        &self,
        session_id: i64,
        req: CancelSessionRequest,
    ) -> Result<CancelSessionResponse> {
        let now = chrono::Utc::now().timestamp();

        let txn = self.db.begin().await.map_err(|e| {
            BookingSystemError::database_operation(format!("开启事务失败: {e}"))
        })?;

        let session = Sessions::find_by_id(session_id)
            .one(&txn)
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("查询场次失败: {e}")))?
            .ok_or_else(|| BookingSystemError::not_found(format!("场次 {session_id} 不存在")))?;

        if session.status != SessionStatus::SCHEDULED {
            return Err(BookingSystemError::invalid_transition(format!(
                "场次当前状态为 {}，无法取消",
                session.status
            )));
        }

        // 级联取消仍然活跃的预约
        let cancelled_bookings = Bookings::update_many()
            .col_expr(
                BookingColumn::Status,
                sea_orm::sea_query::Expr::value(BookingStatus::CANCELLED),
            )
            .col_expr(
                BookingColumn::CancelledAt,
                sea_orm::sea_query::Expr::value(now),
            )
            .col_expr(
                BookingColumn::CancelledBy,
                sea_orm::sea_query::Expr::value(req.cancelled_by),
            )
            .col_expr(
                BookingColumn::CancelReason,
                sea_orm::sea_query::Expr::value(CancelReason::Teacher.to_string()),
            )
            .col_expr(
                BookingColumn::UpdatedAt,
                sea_orm::sea_query::Expr::value(now),
            )
            .filter(BookingColumn::SessionId.eq(session_id))
            .filter(
                BookingColumn::Status
                    .is_in([BookingStatus::PENDING, BookingStatus::CONFIRMED]),
            )
            .exec(&txn)
            .await
            .map_err(|e| {
                BookingSystemError::database_operation(format!("级联取消预约失败: {e}"))
            })?
            .rows_affected;

        // 候补名单全部作废
        let expired_waitlist_entries = WaitlistEntries::update_many()
            .col_expr(
                WaitlistColumn::Status,
                sea_orm::sea_query::Expr::value(WaitlistStatus::EXPIRED),
            )
            .col_expr(
                WaitlistColumn::ExpiredAt,
                sea_orm::sea_query::Expr::value(now),
            )
            .filter(WaitlistColumn::SessionId.eq(session_id))
            .filter(
                WaitlistColumn::Status
                    .is_in([WaitlistStatus::WAITING, WaitlistStatus::OFFERED]),
            )
            .exec(&txn)
            .await
            .map_err(|e| {
                BookingSystemError::database_operation(format!("作废候补名单失败: {e}"))
            })?
            .rows_affected;

        let mut active: ActiveModel = session.into();
        active.status = Set(SessionStatus::CANCELLED.to_string());
        active.cancelled_at = Set(Some(now));
        active.seats_taken = Set(0);
        active.updated_at = Set(now);
        let updated = active
            .update(&txn)
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("更新场次失败: {e}")))?;

        txn.commit().await.map_err(|e| {
            BookingSystemError::database_operation(format!("提交事务失败: {e}"))
        })?;

        Ok(CancelSessionResponse {
            session: updated.into_session(),
            cancelled_bookings,
            expired_waitlist_entries,
        })
    }

    /// 从预约表汇总占座数（confirmed + attended）
    pub(crate) async fn sum_held_seats<C: ConnectionTrait>(
        conn: &C,
        session_id: i64,
    ) -> Result<i64> {
        let total: Option<i64> = Bookings::find()
            .select_only()
            .column_as(BookingColumn::SeatsReserved.sum(), "total")
            .filter(BookingColumn::SessionId.eq(session_id))
            .filter(
                BookingColumn::Status
                    .is_in([BookingStatus::CONFIRMED, BookingStatus::ATTENDED]),
            )
            .into_tuple::<Option<i64>>()
            .one(conn)
            .await
            .map_err(|e| {
                BookingSystemError::database_operation(format!("汇总已订座位失败: {e}"))
            })?
            .flatten();

        Ok(total.unwrap_or(0))
    }
}
