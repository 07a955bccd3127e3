use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{BookingSystemError, Result};
use crate::models::bookings::entities::{BookingStatus, BookingType};

// 教师预约策略业务实体
//
// course_id 为空表示教师默认策略；查询时按课程策略优先，回退到默认策略。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherBookingPolicy {
    // 回退的内置默认策略没有数据库记录，id 为空
    pub id: Option<i64>,
    pub teacher_id: i64,
    pub course_id: Option<i64>,
    pub requires_approval_for_one_on_one: bool,
    pub requires_approval_for_group: bool,
    pub min_notice_hours: i64,
    pub cancel_window_hours: i64,
    pub max_bookings_per_day: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TeacherBookingPolicy {
    /// 未配置任何策略时使用的内置默认值
    pub fn fallback(teacher_id: i64, min_notice_hours: i64, cancel_window_hours: i64) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            teacher_id,
            course_id: None,
            requires_approval_for_one_on_one: false,
            requires_approval_for_group: false,
            min_notice_hours,
            cancel_window_hours,
            max_bookings_per_day: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// 指定预约类型是否需要教师审批
    pub fn requires_approval(&self, booking_type: BookingType) -> bool {
        match booking_type {
            BookingType::OneOnOne => self.requires_approval_for_one_on_one,
            BookingType::GroupSession => self.requires_approval_for_group,
        }
    }

    /// 纯决策函数：给定预约类型和开始时间，返回初始状态。
    /// 提前量不足时返回 InsufficientNotice。
    pub fn initial_status(
        &self,
        booking_type: BookingType,
        start_at_utc: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<BookingStatus> {
        let required = TimeDelta::hours(self.min_notice_hours);
        if start_at_utc - now < required {
            return Err(BookingSystemError::insufficient_notice(format!(
                "预约需提前至少 {} 小时",
                self.min_notice_hours
            )));
        }

        if self.requires_approval(booking_type) {
            Ok(BookingStatus::Pending)
        } else {
            Ok(BookingStatus::Confirmed)
        }
    }

    /// 学生取消是否还在允许的取消窗口内
    pub fn within_cancel_window(&self, start_at_utc: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        start_at_utc - now >= TimeDelta::hours(self.cancel_window_hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(approval_1on1: bool, approval_group: bool, notice: i64) -> TeacherBookingPolicy {
        let mut p = TeacherBookingPolicy::fallback(7, notice, 24);
        p.requires_approval_for_one_on_one = approval_1on1;
        p.requires_approval_for_group = approval_group;
        p
    }

    #[test]
    fn test_auto_confirm_when_no_approval_required() {
        let now = Utc::now();
        let status = policy(false, false, 24)
            .initial_status(BookingType::GroupSession, now + TimeDelta::hours(48), now)
            .unwrap();
        assert_eq!(status, BookingStatus::Confirmed);
    }

    #[test]
    fn test_pending_when_approval_required() {
        let now = Utc::now();
        let status = policy(true, false, 24)
            .initial_status(BookingType::OneOnOne, now + TimeDelta::hours(48), now)
            .unwrap();
        assert_eq!(status, BookingStatus::Pending);

        // 类型标志独立生效
        let status = policy(true, false, 24)
            .initial_status(BookingType::GroupSession, now + TimeDelta::hours(48), now)
            .unwrap();
        assert_eq!(status, BookingStatus::Confirmed);
    }

    #[test]
    fn test_insufficient_notice() {
        let now = Utc::now();
        let err = policy(false, false, 24)
            .initial_status(BookingType::GroupSession, now + TimeDelta::hours(2), now)
            .unwrap_err();
        assert_eq!(err.code(), "E104");
    }

    #[test]
    fn test_cancel_window() {
        let now = Utc::now();
        let p = policy(false, false, 24);
        assert!(p.within_cancel_window(now + TimeDelta::hours(30), now));
        assert!(!p.within_cancel_window(now + TimeDelta::hours(3), now));
    }
}
