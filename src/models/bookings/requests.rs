use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::entities::{BookingType, CancelReason};

// 创建预约请求
//
// group_session: 需要 session_id，时间从场次带出
// one_on_one: 需要 teacher_id / course_id / start_at_utc / duration_minutes
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingRequest {
    pub booking_type: BookingType,
    pub student_user_id: i64,
    pub session_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub course_id: Option<i64>,
    pub start_at_utc: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i64>,
    #[serde(default = "default_seats")]
    pub seats_reserved: i64,
    #[serde(default)]
    pub student_note: Option<String>,
}

fn default_seats() -> i64 {
    1
}

// 预约列表查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub student_user_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub session_id: Option<i64>,
    pub status: Option<String>,
    pub booking_type: Option<String>,
}

// 确认/拒绝预约请求
#[derive(Debug, Clone, Deserialize)]
pub struct BookingDecisionRequest {
    pub decided_by: i64,
    #[serde(default)]
    pub note: Option<String>,
}

// 取消预约请求
#[derive(Debug, Clone, Deserialize)]
pub struct CancelBookingRequest {
    pub cancelled_by: i64,
    pub reason: CancelReason,
    #[serde(default)]
    pub note: Option<String>,
}

// 标记出席请求
#[derive(Debug, Clone, Deserialize)]
pub struct MarkAttendedRequest {
    pub marked_by: i64,
}
