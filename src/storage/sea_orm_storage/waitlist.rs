//! 候补名单存储操作
//!
//! 补位邀请的过期是惰性的：任何触碰候补名单的操作都会先作废
//! 已失效的邀请，再推进队列。

use super::SeaOrmStorage;
use crate::config::AppConfig;
use crate::entity::bookings::{
    ActiveModel as BookingActiveModel, Column as BookingColumn, Entity as Bookings,
};
use crate::entity::sessions::{ActiveModel as SessionActiveModel, Entity as Sessions};
use crate::entity::waitlist_entries::{ActiveModel, Column, Entity as WaitlistEntries, Model};
use crate::errors::{BookingSystemError, Result};
use crate::models::bookings::entities::{BookingStatus, BookingType};
use crate::models::sessions::entities::SessionStatus;
use crate::models::waitlist::{
    entities::WaitlistStatus,
    requests::{AcceptOfferRequest, LeaveWaitlistRequest},
    responses::{AcceptOfferResponse, WaitlistResponse},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 查询场次候补名单（队列顺序），顺带推进队列
    pub async fn list_session_waitlist_impl(&self, session_id: i64) -> Result<WaitlistResponse> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let session = Sessions::find_by_id(session_id)
            .one(&txn)
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("查询场次失败: {e}")))?
            .ok_or_else(|| BookingSystemError::not_found(format!("场次 {session_id} 不存在")))?;

        Self::promote_next_waiting(&txn, &session, now).await?;

        let entries = WaitlistEntries::find()
            .filter(Column::SessionId.eq(session_id))
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(&txn)
            .await
            .map_err(|e| {
                BookingSystemError::database_operation(format!("查询候补名单失败: {e}"))
            })?;

        txn.commit()
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(WaitlistResponse {
            session_id,
            entries: entries.into_iter().map(|m| m.into_waitlist_entry()).collect(),
        })
    }

    /// 接受补位邀请：原子地创建 confirmed 预约并占座
    pub async fn accept_waitlist_offer_impl(
        &self,
        session_id: i64,
        req: AcceptOfferRequest,
    ) -> Result<AcceptOfferResponse> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let session = Sessions::find_by_id(session_id)
            .one(&txn)
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("查询场次失败: {e}")))?
            .ok_or_else(|| BookingSystemError::not_found(format!("场次 {session_id} 不存在")))?;

        let entry = WaitlistEntries::find()
            .filter(Column::SessionId.eq(session_id))
            .filter(Column::StudentUserId.eq(req.student_user_id))
            .filter(Column::Status.eq(WaitlistStatus::OFFERED))
            .one(&txn)
            .await
            .map_err(|e| {
                BookingSystemError::database_operation(format!("查询候补记录失败: {e}"))
            })?
            .ok_or_else(|| BookingSystemError::not_found("当前没有待接受的补位邀请"))?;

        // 邀请已失效：作废并把机会让给下一位
        if entry.offer_expires_at.is_some_and(|deadline| deadline <= now) {
            let mut lapsed: ActiveModel = entry.into();
            lapsed.status = Set(WaitlistStatus::EXPIRED.to_string());
            lapsed.expired_at = Set(Some(now));
            lapsed
                .update(&txn)
                .await
                .map_err(|e| {
                    BookingSystemError::database_operation(format!("作废候补记录失败: {e}"))
                })?;
            Self::promote_next_waiting(&txn, &session, now).await?;
            txn.commit().await.map_err(|e| {
                BookingSystemError::database_operation(format!("提交事务失败: {e}"))
            })?;
            return Err(BookingSystemError::offer_expired("补位邀请已过期"));
        }

        if session.status != SessionStatus::SCHEDULED || session.start_at_utc <= now {
            return Err(BookingSystemError::validation("场次已不可预约"));
        }

        // 邀请不占座，接受时还要再次确认座位
        if session.seats_taken + 1 > session.capacity {
            return Err(BookingSystemError::session_full("场次座位已满"));
        }

        let existing = Bookings::find()
            .filter(BookingColumn::SessionId.eq(session_id))
            .filter(BookingColumn::StudentUserId.eq(req.student_user_id))
            .filter(
                BookingColumn::Status
                    .is_in([BookingStatus::PENDING, BookingStatus::CONFIRMED]),
            )
            .one(&txn)
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("查询预约失败: {e}")))?;
        if existing.is_some() {
            return Err(BookingSystemError::duplicate_booking("该场次已有活跃预约"));
        }

        let new_seats_taken = session.seats_taken + 1;

        let booking = BookingActiveModel {
            booking_type: Set(BookingType::GroupSession.to_string()),
            course_id: Set(session.course_id),
            teacher_id: Set(session.teacher_id),
            student_user_id: Set(req.student_user_id),
            session_id: Set(Some(session_id)),
            start_at_utc: Set(session.start_at_utc),
            end_at_utc: Set(session.end_at_utc),
            seats_reserved: Set(1),
            status: Set(BookingStatus::CONFIRMED.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let booking = booking
            .insert(&txn)
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("创建预约失败: {e}")))?;

        let mut session_active: SessionActiveModel = session.into();
        session_active.seats_taken = Set(new_seats_taken);
        session_active.updated_at = Set(now);
        session_active
            .update(&txn)
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("更新场次占座失败: {e}")))?;

        let mut accepted: ActiveModel = entry.into();
        accepted.status = Set(WaitlistStatus::ACCEPTED.to_string());
        accepted.accepted_at = Set(Some(now));
        let accepted = accepted
            .update(&txn)
            .await
            .map_err(|e| {
                BookingSystemError::database_operation(format!("更新候补记录失败: {e}"))
            })?;

        txn.commit()
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(AcceptOfferResponse {
            entry: accepted.into_waitlist_entry(),
            booking: booking.into_booking(),
        })
    }

    /// 退出候补名单；若退出者持有邀请，队列顺势前移
    pub async fn leave_waitlist_impl(
        &self,
        session_id: i64,
        req: LeaveWaitlistRequest,
    ) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let entry = WaitlistEntries::find()
            .filter(Column::SessionId.eq(session_id))
            .filter(Column::StudentUserId.eq(req.student_user_id))
            .filter(
                Column::Status.is_in([WaitlistStatus::WAITING, WaitlistStatus::OFFERED]),
            )
            .one(&txn)
            .await
            .map_err(|e| {
                BookingSystemError::database_operation(format!("查询候补记录失败: {e}"))
            })?;

        let Some(entry) = entry else {
            return Ok(false);
        };

        let held_offer = entry.status == WaitlistStatus::OFFERED;

        entry
            .delete(&txn)
            .await
            .map_err(|e| {
                BookingSystemError::database_operation(format!("删除候补记录失败: {e}"))
            })?;

        if held_offer
            && let Some(session) = Sessions::find_by_id(session_id)
                .one(&txn)
                .await
                .map_err(|e| {
                    BookingSystemError::database_operation(format!("查询场次失败: {e}"))
                })?
        {
            Self::promote_next_waiting(&txn, &session, now).await?;
        }

        txn.commit()
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(true)
    }

    /// 作废该场次所有已失效的补位邀请
    pub(crate) async fn expire_lapsed_offers<C: ConnectionTrait>(
        conn: &C,
        session_id: i64,
        now: i64,
    ) -> Result<u64> {
        let result = WaitlistEntries::update_many()
            .col_expr(
                Column::Status,
                sea_orm::sea_query::Expr::value(WaitlistStatus::EXPIRED),
            )
            .col_expr(Column::ExpiredAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::SessionId.eq(session_id))
            .filter(Column::Status.eq(WaitlistStatus::OFFERED))
            .filter(Column::OfferExpiresAt.lte(now))
            .exec(conn)
            .await
            .map_err(|e| {
                BookingSystemError::database_operation(format!("作废过期邀请失败: {e}"))
            })?;

        Ok(result.rows_affected)
    }

    /// 推进候补队列：先作废失效邀请，再给队头补位
    ///
    /// 同一场次同时最多一条 offered；无空位或已有邀请在途时不动作。
    pub(crate) async fn promote_next_waiting<C: ConnectionTrait>(
        conn: &C,
        session: &crate::entity::sessions::Model,
        now: i64,
    ) -> Result<Option<Model>> {
        Self::expire_lapsed_offers(conn, session.id, now).await?;

        if session.status != SessionStatus::SCHEDULED
            || session.start_at_utc <= now
            || !session.enable_waitlist
        {
            return Ok(None);
        }

        // 座位数要重读，调用方手里的 session 可能已经过时
        let seats_taken = Self::sum_held_seats(conn, session.id).await?;
        if seats_taken >= session.capacity {
            return Ok(None);
        }

        let outstanding = WaitlistEntries::find()
            .filter(Column::SessionId.eq(session.id))
            .filter(Column::Status.eq(WaitlistStatus::OFFERED))
            .one(conn)
            .await
            .map_err(|e| {
                BookingSystemError::database_operation(format!("查询在途邀请失败: {e}"))
            })?;
        if outstanding.is_some() {
            return Ok(None);
        }

        let head = WaitlistEntries::find()
            .filter(Column::SessionId.eq(session.id))
            .filter(Column::Status.eq(WaitlistStatus::WAITING))
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .one(conn)
            .await
            .map_err(|e| {
                BookingSystemError::database_operation(format!("查询候补队头失败: {e}"))
            })?;

        let Some(head) = head else {
            return Ok(None);
        };

        let ttl_hours = AppConfig::get().booking.offer_ttl_hours;
        let mut offered: ActiveModel = head.into();
        offered.status = Set(WaitlistStatus::OFFERED.to_string());
        offered.offered_at = Set(Some(now));
        offered.offer_expires_at = Set(Some(now + ttl_hours * 3600));
        let offered = offered
            .update(conn)
            .await
            .map_err(|e| {
                BookingSystemError::database_operation(format!("发出补位邀请失败: {e}"))
            })?;

        Ok(Some(offered))
    }
}
