//! 预约存储操作
//!
//! 座位计数的一致性约定：seats_taken 只在事务里随 confirmed/attended
//! 预约的增删同步变化，任何可能超员的路径都在提交前重新校验容量。

use super::SeaOrmStorage;
use crate::entity::bookings::{ActiveModel, Column, Entity as Bookings};
use crate::entity::sessions::{ActiveModel as SessionActiveModel, Entity as Sessions};
use crate::entity::waitlist_entries::{
    ActiveModel as WaitlistActiveModel, Column as WaitlistColumn, Entity as WaitlistEntries,
};
use crate::errors::{BookingSystemError, Result};
use crate::models::bookings::{
    entities::{Booking, BookingStatus, BookingType},
    requests::{
        BookingDecisionRequest, BookingListQuery, CancelBookingRequest, CreateBookingRequest,
        MarkAttendedRequest,
    },
    responses::{BookingListResponse, BookingOutcome, CancelBookingResponse},
};
use crate::models::sessions::entities::SessionStatus;
use crate::models::waitlist::entities::WaitlistStatus;
use crate::models::PaginationInfo;
use crate::utils::validate::validate_create_booking;
use chrono::{DateTime, TimeDelta, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建预约。团课满员且开启候补时落入候补名单。
    pub async fn create_booking_impl(&self, req: CreateBookingRequest) -> Result<BookingOutcome> {
        validate_create_booking(&req)?;

        match req.booking_type {
            BookingType::GroupSession => self.create_group_booking(req).await,
            BookingType::OneOnOne => self.create_one_on_one_booking(req).await,
        }
    }

    async fn create_group_booking(&self, req: CreateBookingRequest) -> Result<BookingOutcome> {
        let now = Utc::now();
        let now_ts = now.timestamp();
        // validate_create_booking 已保证 session_id 存在
        let session_id = req
            .session_id
            .ok_or_else(|| BookingSystemError::validation("团课预约必须指定 session_id"))?;

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

        if session.status != SessionStatus::SCHEDULED {
            return Err(BookingSystemError::validation("场次已取消或已结束"));
        }
        if session.start_at_utc <= now_ts {
            return Err(BookingSystemError::validation("场次已开始，无法预约"));
        }

        Self::ensure_no_active_booking(&txn, session_id, req.student_user_id).await?;

        let on_waitlist = WaitlistEntries::find()
            .filter(WaitlistColumn::SessionId.eq(session_id))
            .filter(WaitlistColumn::StudentUserId.eq(req.student_user_id))
            .filter(
                WaitlistColumn::Status.is_in([WaitlistStatus::WAITING, WaitlistStatus::OFFERED]),
            )
            .one(&txn)
            .await
            .map_err(|e| {
                BookingSystemError::database_operation(format!("查询候补记录失败: {e}"))
            })?;
        if on_waitlist.is_some() {
            return Err(BookingSystemError::duplicate_booking("已在该场次候补名单中"));
        }

        let policy =
            Self::resolve_policy(&txn, session.teacher_id, Some(session.course_id)).await?;
        let start_at = DateTime::<Utc>::from_timestamp(session.start_at_utc, 0)
            .unwrap_or_default();
        let initial_status = policy.initial_status(BookingType::GroupSession, start_at, now)?;

        let free_seats = session.capacity - session.seats_taken;
        if free_seats < req.seats_reserved {
            // 完全满员且只订一个座位时进入候补队列
            if free_seats <= 0 && session.enable_waitlist && req.seats_reserved == 1 {
                let entry = WaitlistActiveModel {
                    session_id: Set(session_id),
                    student_user_id: Set(req.student_user_id),
                    status: Set(WaitlistStatus::WAITING.to_string()),
                    created_at: Set(now_ts),
                    ..Default::default()
                };
                let entry = entry.insert(&txn).await.map_err(|e| {
                    BookingSystemError::database_operation(format!("加入候补名单失败: {e}"))
                })?;

                let position = WaitlistEntries::find()
                    .filter(WaitlistColumn::SessionId.eq(session_id))
                    .filter(WaitlistColumn::Status.eq(WaitlistStatus::WAITING))
                    .count(&txn)
                    .await
                    .map_err(|e| {
                        BookingSystemError::database_operation(format!("查询候补人数失败: {e}"))
                    })?;

                txn.commit().await.map_err(|e| {
                    BookingSystemError::database_operation(format!("提交事务失败: {e}"))
                })?;

                return Ok(BookingOutcome::Waitlisted {
                    entry: entry.into_waitlist_entry(),
                    position: position as i64,
                });
            }

            if free_seats <= 0 {
                // 满员且候补不可用属于容量不足，SessionFull 留给确认时的并发竞争
                return Err(BookingSystemError::capacity_exceeded("场次座位已满且候补不可用"));
            }
            return Err(BookingSystemError::capacity_exceeded(format!(
                "剩余座位不足: 剩余 {free_seats}，请求 {}",
                req.seats_reserved
            )));
        }

        let booking = ActiveModel {
            booking_type: Set(BookingType::GroupSession.to_string()),
            course_id: Set(session.course_id),
            teacher_id: Set(session.teacher_id),
            student_user_id: Set(req.student_user_id),
            session_id: Set(Some(session_id)),
            start_at_utc: Set(session.start_at_utc),
            end_at_utc: Set(session.end_at_utc),
            seats_reserved: Set(req.seats_reserved),
            status: Set(initial_status.to_string()),
            student_note: Set(req.student_note),
            created_at: Set(now_ts),
            updated_at: Set(now_ts),
            ..Default::default()
        };
        let booking = booking
            .insert(&txn)
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("创建预约失败: {e}")))?;

        // pending 不占座，审批通过时再占
        if initial_status.holds_seat() {
            let new_seats_taken = session.seats_taken + req.seats_reserved;
            let mut session_active: SessionActiveModel = session.into();
            session_active.seats_taken = Set(new_seats_taken);
            session_active.updated_at = Set(now_ts);
            session_active.update(&txn).await.map_err(|e| {
                BookingSystemError::database_operation(format!("更新场次占座失败: {e}"))
            })?;
        }

        txn.commit()
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(BookingOutcome::Booked {
            booking: booking.into_booking(),
        })
    }

    async fn create_one_on_one_booking(&self, req: CreateBookingRequest) -> Result<BookingOutcome> {
        let now = Utc::now();
        let now_ts = now.timestamp();
        // validate_create_booking 已保证三个字段都存在
        let teacher_id = req
            .teacher_id
            .ok_or_else(|| BookingSystemError::validation("1:1 预约必须指定 teacher_id"))?;
        let course_id = req
            .course_id
            .ok_or_else(|| BookingSystemError::validation("1:1 预约必须指定 course_id"))?;
        let start_at = req
            .start_at_utc
            .ok_or_else(|| BookingSystemError::validation("1:1 预约必须指定 start_at_utc"))?;
        let duration = req.duration_minutes.unwrap_or(60);
        let end_at = start_at + TimeDelta::minutes(duration);

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let policy = Self::resolve_policy(&txn, teacher_id, Some(course_id)).await?;
        let initial_status = policy.initial_status(BookingType::OneOnOne, start_at, now)?;

        // 教师同时间段只接待一个学生
        let conflict = Bookings::find()
            .filter(Column::TeacherId.eq(teacher_id))
            .filter(Column::BookingType.eq(BookingType::OneOnOne.to_string()))
            .filter(Column::Status.is_in([BookingStatus::PENDING, BookingStatus::CONFIRMED]))
            .filter(Column::StartAtUtc.lt(end_at.timestamp()))
            .filter(Column::EndAtUtc.gt(start_at.timestamp()))
            .one(&txn)
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("查询预约冲突失败: {e}")))?;
        if let Some(conflict) = conflict {
            if conflict.student_user_id == req.student_user_id {
                return Err(BookingSystemError::duplicate_booking("该时间段已有预约"));
            }
            return Err(BookingSystemError::validation("该时间段教师已有其他预约"));
        }

        let booking = ActiveModel {
            booking_type: Set(BookingType::OneOnOne.to_string()),
            course_id: Set(course_id),
            teacher_id: Set(teacher_id),
            student_user_id: Set(req.student_user_id),
            session_id: Set(None),
            start_at_utc: Set(start_at.timestamp()),
            end_at_utc: Set(end_at.timestamp()),
            seats_reserved: Set(1),
            status: Set(initial_status.to_string()),
            student_note: Set(req.student_note),
            created_at: Set(now_ts),
            updated_at: Set(now_ts),
            ..Default::default()
        };
        let booking = booking
            .insert(&txn)
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("创建预约失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(BookingOutcome::Booked {
            booking: booking.into_booking(),
        })
    }

    /// 通过ID获取预约
    pub async fn get_booking_by_id_impl(&self, booking_id: i64) -> Result<Option<Booking>> {
        let booking = Bookings::find_by_id(booking_id)
            .one(&self.db)
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("查询预约失败: {e}")))?;

        Ok(booking.map(|m| m.into_booking()))
    }

    /// 列出预约
    pub async fn list_bookings_with_pagination_impl(
        &self,
        query: BookingListQuery,
    ) -> Result<BookingListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Bookings::find();

        if let Some(student_user_id) = query.student_user_id {
            select = select.filter(Column::StudentUserId.eq(student_user_id));
        }
        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }
        if let Some(session_id) = query.session_id {
            select = select.filter(Column::SessionId.eq(session_id));
        }
        if let Some(ref status) = query.status {
            let status: BookingStatus = status.parse().map_err(BookingSystemError::validation)?;
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        if let Some(ref booking_type) = query.booking_type {
            let booking_type: BookingType =
                booking_type.parse().map_err(BookingSystemError::validation)?;
            select = select.filter(Column::BookingType.eq(booking_type.to_string()));
        }

        select = select.order_by_desc(Column::CreatedAt);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("查询预约总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("查询预约页数失败: {e}")))?;

        let bookings = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("查询预约列表失败: {e}")))?;

        Ok(BookingListResponse {
            items: bookings.into_iter().map(|m| m.into_booking()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 教师通过待审批的预约。提交前重新校验容量，满员返回 SessionFull。
    pub async fn confirm_booking_impl(
        &self,
        booking_id: i64,
        req: BookingDecisionRequest,
    ) -> Result<Booking> {
        let now_ts = Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let booking = Bookings::find_by_id(booking_id)
            .one(&txn)
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("查询预约失败: {e}")))?
            .ok_or_else(|| BookingSystemError::not_found(format!("预约 {booking_id} 不存在")))?;

        let status: BookingStatus = booking
            .status
            .parse()
            .map_err(BookingSystemError::validation)?;
        if !status.can_transition_to(BookingStatus::Confirmed) {
            return Err(BookingSystemError::invalid_transition(format!(
                "预约状态 {} 无法变更为 confirmed",
                booking.status
            )));
        }

        // 团课审批通过即占座，提交前按当前占座重新校验
        if let Some(session_id) = booking.session_id {
            let session = Sessions::find_by_id(session_id)
                .one(&txn)
                .await
                .map_err(|e| BookingSystemError::database_operation(format!("查询场次失败: {e}")))?
                .ok_or_else(|| {
                    BookingSystemError::not_found(format!("场次 {session_id} 不存在"))
                })?;

            if session.status != SessionStatus::SCHEDULED || session.start_at_utc <= now_ts {
                return Err(BookingSystemError::validation("场次已不可确认"));
            }
            if session.seats_taken + booking.seats_reserved > session.capacity {
                return Err(BookingSystemError::session_full("场次座位已满，无法确认"));
            }

            let new_seats_taken = session.seats_taken + booking.seats_reserved;
            let mut session_active: SessionActiveModel = session.into();
            session_active.seats_taken = Set(new_seats_taken);
            session_active.updated_at = Set(now_ts);
            session_active.update(&txn).await.map_err(|e| {
                BookingSystemError::database_operation(format!("更新场次占座失败: {e}"))
            })?;
        }

        let mut active: ActiveModel = booking.into();
        active.status = Set(BookingStatus::CONFIRMED.to_string());
        active.decision_at = Set(Some(now_ts));
        active.decided_by = Set(Some(req.decided_by));
        if req.note.is_some() {
            active.teacher_note = Set(req.note);
        }
        active.updated_at = Set(now_ts);
        let updated = active
            .update(&txn)
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("更新预约失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(updated.into_booking())
    }

    /// 教师拒绝待审批的预约。pending 不占座，无需动座位。
    pub async fn decline_booking_impl(
        &self,
        booking_id: i64,
        req: BookingDecisionRequest,
    ) -> Result<Booking> {
        let now_ts = Utc::now().timestamp();

        let booking = Bookings::find_by_id(booking_id)
            .one(&self.db)
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("查询预约失败: {e}")))?
            .ok_or_else(|| BookingSystemError::not_found(format!("预约 {booking_id} 不存在")))?;

        let status: BookingStatus = booking
            .status
            .parse()
            .map_err(BookingSystemError::validation)?;
        if !status.can_transition_to(BookingStatus::Declined) {
            return Err(BookingSystemError::invalid_transition(format!(
                "预约状态 {} 无法变更为 declined",
                booking.status
            )));
        }

        let mut active: ActiveModel = booking.into();
        active.status = Set(BookingStatus::DECLINED.to_string());
        active.decision_at = Set(Some(now_ts));
        active.decided_by = Set(Some(req.decided_by));
        if req.note.is_some() {
            active.teacher_note = Set(req.note);
        }
        active.updated_at = Set(now_ts);
        let updated = active
            .update(&self.db)
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("更新预约失败: {e}")))?;

        Ok(updated.into_booking())
    }

    /// 取消预约。释放的座位在同一事务里触发候补补位。
    pub async fn cancel_booking_impl(
        &self,
        booking_id: i64,
        req: CancelBookingRequest,
    ) -> Result<CancelBookingResponse> {
        let now = Utc::now();
        let now_ts = now.timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let booking = Bookings::find_by_id(booking_id)
            .one(&txn)
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("查询预约失败: {e}")))?
            .ok_or_else(|| BookingSystemError::not_found(format!("预约 {booking_id} 不存在")))?;

        let status: BookingStatus = booking
            .status
            .parse()
            .map_err(BookingSystemError::validation)?;
        if !status.can_transition_to(BookingStatus::Cancelled) {
            return Err(BookingSystemError::invalid_transition(format!(
                "预约状态 {} 无法变更为 cancelled",
                booking.status
            )));
        }

        // 学生本人取消受取消窗口约束，教师/管理员/系统取消不受限
        if req.reason.enforces_cancel_window() {
            let policy =
                Self::resolve_policy(&txn, booking.teacher_id, Some(booking.course_id)).await?;
            let start_at = DateTime::<Utc>::from_timestamp(booking.start_at_utc, 0)
                .unwrap_or_default();
            if !policy.within_cancel_window(start_at, now) {
                return Err(BookingSystemError::validation(format!(
                    "距开始不足 {} 小时，已超出允许取消的时间窗口",
                    policy.cancel_window_hours
                )));
            }
        }

        let seats_released = if status.holds_seat() {
            booking.seats_reserved
        } else {
            0
        };
        let session_id = booking.session_id;

        let mut active: ActiveModel = booking.into();
        active.status = Set(BookingStatus::CANCELLED.to_string());
        active.cancelled_at = Set(Some(now_ts));
        active.cancelled_by = Set(Some(req.cancelled_by));
        active.cancel_reason = Set(Some(req.reason.to_string()));
        if req.note.is_some() {
            active.teacher_note = Set(req.note);
        }
        active.updated_at = Set(now_ts);
        let updated = active
            .update(&txn)
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("更新预约失败: {e}")))?;

        let mut offered_entry = None;
        if let Some(session_id) = session_id
            && seats_released > 0
        {
            offered_entry =
                Self::release_seats_and_promote(&txn, session_id, seats_released, now_ts).await?;
        }

        txn.commit()
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(CancelBookingResponse {
            booking: updated.into_booking(),
            seats_released,
            offered_entry,
        })
    }

    /// 出席签到：confirmed -> attended，座位保持占用
    pub async fn mark_booking_attended_impl(
        &self,
        booking_id: i64,
        req: MarkAttendedRequest,
    ) -> Result<Booking> {
        let now_ts = Utc::now().timestamp();

        let booking = Bookings::find_by_id(booking_id)
            .one(&self.db)
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("查询预约失败: {e}")))?
            .ok_or_else(|| BookingSystemError::not_found(format!("预约 {booking_id} 不存在")))?;

        let status: BookingStatus = booking
            .status
            .parse()
            .map_err(BookingSystemError::validation)?;
        if !status.can_transition_to(BookingStatus::Attended) {
            return Err(BookingSystemError::invalid_transition(format!(
                "预约状态 {} 无法变更为 attended",
                booking.status
            )));
        }
        if booking.start_at_utc > now_ts {
            return Err(BookingSystemError::validation("课程尚未开始，无法签到"));
        }

        tracing::info!(
            booking_id = booking.id,
            marked_by = req.marked_by,
            "Booking marked attended"
        );

        let mut active: ActiveModel = booking.into();
        active.status = Set(BookingStatus::ATTENDED.to_string());
        active.updated_at = Set(now_ts);
        let updated = active
            .update(&self.db)
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("更新预约失败: {e}")))?;

        Ok(updated.into_booking())
    }

    /// 活跃预约唯一性：同一 (场次, 学生) 最多一条 pending/confirmed
    async fn ensure_no_active_booking(
        txn: &DatabaseTransaction,
        session_id: i64,
        student_user_id: i64,
    ) -> Result<()> {
        let existing = Bookings::find()
            .filter(Column::SessionId.eq(session_id))
            .filter(Column::StudentUserId.eq(student_user_id))
            .filter(Column::Status.is_in([BookingStatus::PENDING, BookingStatus::CONFIRMED]))
            .one(txn)
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("查询预约失败: {e}")))?;

        if existing.is_some() {
            return Err(BookingSystemError::duplicate_booking("该场次已有活跃预约"));
        }
        Ok(())
    }

    /// 释放座位并推进候补队列，返回新收到邀请的候补记录
    pub(crate) async fn release_seats_and_promote(
        txn: &DatabaseTransaction,
        session_id: i64,
        seats_released: i64,
        now_ts: i64,
    ) -> Result<Option<crate::models::waitlist::entities::WaitlistEntry>> {
        let session = Sessions::find_by_id(session_id)
            .one(txn)
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("查询场次失败: {e}")))?;
        let Some(session) = session else {
            return Ok(None);
        };

        let new_seats_taken = (session.seats_taken - seats_released).max(0);
        let mut session_active: SessionActiveModel = session.into();
        session_active.seats_taken = Set(new_seats_taken);
        session_active.updated_at = Set(now_ts);
        let session = session_active.update(txn).await.map_err(|e| {
            BookingSystemError::database_operation(format!("更新场次占座失败: {e}"))
        })?;

        let offered = Self::promote_next_waiting(txn, &session, now_ts).await?;
        Ok(offered.map(|m| m.into_waitlist_entry()))
    }
}
