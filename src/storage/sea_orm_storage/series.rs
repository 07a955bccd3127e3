//! 周期预约系列存储操作
//!
//! 系列在创建时一次性展开：group_series 每次生成一个场次和一条预约，
//! one_on_one_series 只生成预约。

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::config::AppConfig;
use crate::entity::booking_series::{
    ActiveModel as SeriesActiveModel, Entity as BookingSeriesEntity,
};
use crate::entity::booking_series_items::{
    ActiveModel as ItemActiveModel, Column as ItemColumn, Entity as SeriesItems,
};
use crate::entity::bookings::{
    ActiveModel as BookingActiveModel, Column as BookingColumn, Entity as Bookings,
};
use crate::entity::sessions::{ActiveModel as SessionActiveModel, Entity as Sessions};
use crate::entity::waitlist_entries::{Column as WaitlistColumn, Entity as WaitlistEntries};
use crate::errors::{BookingSystemError, Result};
use crate::models::bookings::entities::{BookingStatus, BookingType, CancelReason};
use crate::models::series::{
    entities::{SeriesStatus, SeriesType},
    requests::{CancelSeriesRequest, CreateSeriesRequest},
    responses::{CancelSeriesResponse, SeriesDetailResponse},
};
use crate::models::sessions::entities::SessionStatus;
use crate::models::waitlist::entities::WaitlistStatus;
use crate::utils::recurrence::expand_occurrences;
use crate::utils::validate::validate_create_series;
use chrono::{TimeDelta, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建系列并立即展开所有预约
    pub async fn create_booking_series_impl(
        &self,
        req: CreateSeriesRequest,
    ) -> Result<SeriesDetailResponse> {
        validate_create_series(&req)?;

        let now = Utc::now();
        let now_ts = now.timestamp();
        let config = AppConfig::get();

        let occurrences = expand_occurrences(
            req.start_at_utc,
            req.frequency,
            req.interval,
            req.occurrence_count,
            req.until_date,
            config.booking.max_series_occurrences,
        )?;

        let booking_type = match req.series_type {
            SeriesType::GroupSeries => BookingType::GroupSession,
            SeriesType::OneOnOneSeries => BookingType::OneOnOne,
        };

        let first_start = *occurrences
            .first()
            .ok_or_else(|| BookingSystemError::validation("系列展开结果为空"))?;

        // 提前量只对首次生效，后续场次天然满足
        let policy = Self::resolve_policy(&self.db, req.teacher_id, Some(req.course_id)).await?;
        let initial_status = policy.initial_status(booking_type, first_start, now)?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let series = SeriesActiveModel {
            series_type: Set(req.series_type.to_string()),
            status: Set(SeriesStatus::Active.to_string()),
            student_user_id: Set(req.student_user_id),
            teacher_id: Set(req.teacher_id),
            course_id: Set(req.course_id),
            title: Set(req.title.clone()),
            frequency: Set(req.frequency.to_string()),
            interval: Set(req.interval),
            occurrence_count: Set(req.occurrence_count.map(|c| c as i64)),
            until_date: Set(req.until_date.map(|d| d.timestamp())),
            start_at_utc: Set(req.start_at_utc.timestamp()),
            duration_minutes: Set(req.duration_minutes),
            capacity: Set(req.capacity),
            enable_waitlist: Set(req.enable_waitlist),
            created_at: Set(now_ts),
            updated_at: Set(now_ts),
            ..Default::default()
        };
        let series = series
            .insert(&txn)
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("创建系列失败: {e}")))?;

        let total = occurrences.len();
        let mut items = Vec::with_capacity(total);
        let mut bookings = Vec::with_capacity(total);

        for (index, start_at) in occurrences.into_iter().enumerate() {
            let end_at = start_at + TimeDelta::minutes(req.duration_minutes);

            let session_id = match req.series_type {
                SeriesType::GroupSeries => {
                    let capacity = req.capacity.unwrap_or(1);
                    let session = SessionActiveModel {
                        course_id: Set(req.course_id),
                        teacher_id: Set(req.teacher_id),
                        title: Set(format!("{} ({}/{})", req.title, index + 1, total)),
                        start_at_utc: Set(start_at.timestamp()),
                        end_at_utc: Set(end_at.timestamp()),
                        timezone_snapshot: Set("UTC".to_string()),
                        capacity: Set(capacity),
                        seats_taken: Set(if initial_status.holds_seat() { 1 } else { 0 }),
                        enable_waitlist: Set(req.enable_waitlist),
                        status: Set(SessionStatus::SCHEDULED.to_string()),
                        created_at: Set(now_ts),
                        updated_at: Set(now_ts),
                        ..Default::default()
                    };
                    let session = session.insert(&txn).await.map_err(|e| {
                        BookingSystemError::database_operation(format!("创建系列场次失败: {e}"))
                    })?;
                    Some(session.id)
                }
                SeriesType::OneOnOneSeries => None,
            };

            let booking = BookingActiveModel {
                booking_type: Set(booking_type.to_string()),
                course_id: Set(req.course_id),
                teacher_id: Set(req.teacher_id),
                student_user_id: Set(req.student_user_id),
                session_id: Set(session_id),
                start_at_utc: Set(start_at.timestamp()),
                end_at_utc: Set(end_at.timestamp()),
                seats_reserved: Set(1),
                status: Set(initial_status.to_string()),
                created_at: Set(now_ts),
                updated_at: Set(now_ts),
                ..Default::default()
            };
            let booking = booking.insert(&txn).await.map_err(|e| {
                BookingSystemError::database_operation(format!("创建系列预约失败: {e}"))
            })?;

            let item = ItemActiveModel {
                series_id: Set(series.id),
                booking_id: Set(booking.id),
                session_id: Set(session_id),
                occurrence_index: Set(index as i64),
                created_at: Set(now_ts),
                ..Default::default()
            };
            let item = item.insert(&txn).await.map_err(|e| {
                BookingSystemError::database_operation(format!("创建系列条目失败: {e}"))
            })?;

            items.push(item.into_series_item());
            bookings.push(booking.into_booking());
        }

        txn.commit()
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(SeriesDetailResponse {
            series: series.into_series(),
            items,
            bookings,
        })
    }

    /// 通过ID获取系列详情
    pub async fn get_booking_series_impl(
        &self,
        series_id: i64,
    ) -> Result<Option<SeriesDetailResponse>> {
        let series = BookingSeriesEntity::find_by_id(series_id)
            .one(&self.db)
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("查询系列失败: {e}")))?;
        let Some(series) = series else {
            return Ok(None);
        };

        let items = SeriesItems::find()
            .filter(ItemColumn::SeriesId.eq(series_id))
            .order_by_asc(ItemColumn::OccurrenceIndex)
            .all(&self.db)
            .await
            .map_err(|e| {
                BookingSystemError::database_operation(format!("查询系列条目失败: {e}"))
            })?;

        let booking_ids: Vec<i64> = items.iter().map(|item| item.booking_id).collect();
        let mut booking_map: HashMap<i64, _> = Bookings::find()
            .filter(BookingColumn::Id.is_in(booking_ids))
            .all(&self.db)
            .await
            .map_err(|e| {
                BookingSystemError::database_operation(format!("查询系列预约失败: {e}"))
            })?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();

        let bookings = items
            .iter()
            .filter_map(|item| booking_map.remove(&item.booking_id))
            .map(|m| m.into_booking())
            .collect();

        Ok(Some(SeriesDetailResponse {
            series: series.into_series(),
            items: items.into_iter().map(|m| m.into_series_item()).collect(),
            bookings,
        }))
    }

    /// 取消系列：只取消未开始且仍活跃的预约，已发生的保持原样
    pub async fn cancel_booking_series_impl(
        &self,
        series_id: i64,
        req: CancelSeriesRequest,
    ) -> Result<CancelSeriesResponse> {
        let now_ts = Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let series = BookingSeriesEntity::find_by_id(series_id)
            .one(&txn)
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("查询系列失败: {e}")))?
            .ok_or_else(|| BookingSystemError::not_found(format!("系列 {series_id} 不存在")))?;

        if series.status != SeriesStatus::Active.to_string() {
            return Err(BookingSystemError::invalid_transition(format!(
                "系列当前状态为 {}，无法取消",
                series.status
            )));
        }

        let items = SeriesItems::find()
            .filter(ItemColumn::SeriesId.eq(series_id))
            .order_by_asc(ItemColumn::OccurrenceIndex)
            .all(&txn)
            .await
            .map_err(|e| {
                BookingSystemError::database_operation(format!("查询系列条目失败: {e}"))
            })?;

        let mut cancelled_occurrences = 0u64;
        let mut untouched_occurrences = 0u64;

        for item in &items {
            let booking = Bookings::find_by_id(item.booking_id)
                .one(&txn)
                .await
                .map_err(|e| {
                    BookingSystemError::database_operation(format!("查询系列预约失败: {e}"))
                })?;
            let Some(booking) = booking else {
                untouched_occurrences += 1;
                continue;
            };

            let status: BookingStatus = booking
                .status
                .parse()
                .map_err(BookingSystemError::validation)?;
            let future = booking.start_at_utc > now_ts;
            if !future || !status.is_active() {
                untouched_occurrences += 1;
                continue;
            }

            let mut active: BookingActiveModel = booking.into();
            active.status = Set(BookingStatus::CANCELLED.to_string());
            active.cancelled_at = Set(Some(now_ts));
            active.cancelled_by = Set(Some(req.cancelled_by));
            active.cancel_reason = Set(Some(CancelReason::Teacher.to_string()));
            active.updated_at = Set(now_ts);
            active.update(&txn).await.map_err(|e| {
                BookingSystemError::database_operation(format!("取消系列预约失败: {e}"))
            })?;

            // 系列生成的场次随预约一起取消
            if let Some(session_id) = item.session_id {
                Self::cancel_series_session(&txn, session_id, req.cancelled_by, now_ts).await?;
            }

            cancelled_occurrences += 1;
        }

        let mut series_active: SeriesActiveModel = series.into();
        series_active.status = Set(SeriesStatus::Cancelled.to_string());
        series_active.cancelled_at = Set(Some(now_ts));
        series_active.updated_at = Set(now_ts);
        let series = series_active
            .update(&txn)
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("更新系列失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(CancelSeriesResponse {
            series: series.into_series(),
            cancelled_occurrences,
            untouched_occurrences,
        })
    }

    /// 取消系列生成的场次，级联取消其余活跃预约并作废候补名单
    async fn cancel_series_session<C: ConnectionTrait>(
        conn: &C,
        session_id: i64,
        cancelled_by: i64,
        now_ts: i64,
    ) -> Result<()> {
        let session = Sessions::find_by_id(session_id)
            .one(conn)
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("查询场次失败: {e}")))?;
        let Some(session) = session else {
            return Ok(());
        };
        if session.status != SessionStatus::SCHEDULED {
            return Ok(());
        }

        // 场次上可能有非系列学生的预约，取消场次时一并取消
        Bookings::update_many()
            .col_expr(
                BookingColumn::Status,
                sea_orm::sea_query::Expr::value(BookingStatus::CANCELLED),
            )
            .col_expr(
                BookingColumn::CancelledAt,
                sea_orm::sea_query::Expr::value(now_ts),
            )
            .col_expr(
                BookingColumn::CancelledBy,
                sea_orm::sea_query::Expr::value(cancelled_by),
            )
            .col_expr(
                BookingColumn::CancelReason,
                sea_orm::sea_query::Expr::value(CancelReason::Teacher.to_string()),
            )
            .col_expr(
                BookingColumn::UpdatedAt,
                sea_orm::sea_query::Expr::value(now_ts),
            )
            .filter(BookingColumn::SessionId.eq(session_id))
            .filter(
                BookingColumn::Status.is_in([BookingStatus::PENDING, BookingStatus::CONFIRMED]),
            )
            .exec(conn)
            .await
            .map_err(|e| {
                BookingSystemError::database_operation(format!("级联取消预约失败: {e}"))
            })?;

        WaitlistEntries::update_many()
            .col_expr(
                WaitlistColumn::Status,
                sea_orm::sea_query::Expr::value(WaitlistStatus::EXPIRED),
            )
            .col_expr(
                WaitlistColumn::ExpiredAt,
                sea_orm::sea_query::Expr::value(now_ts),
            )
            .filter(WaitlistColumn::SessionId.eq(session_id))
            .filter(
                WaitlistColumn::Status.is_in([WaitlistStatus::WAITING, WaitlistStatus::OFFERED]),
            )
            .exec(conn)
            .await
            .map_err(|e| {
                BookingSystemError::database_operation(format!("作废候补名单失败: {e}"))
            })?;

        let mut active: SessionActiveModel = session.into();
        active.status = Set(SessionStatus::CANCELLED.to_string());
        active.cancelled_at = Set(Some(now_ts));
        active.seats_taken = Set(0);
        active.updated_at = Set(now_ts);
        active
            .update(conn)
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("取消场次失败: {e}")))?;

        Ok(())
    }
}
