use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::entities::{SeriesFrequency, SeriesType};

// 创建周期预约系列请求
//
// occurrence_count 与 until_date 二选一
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSeriesRequest {
    pub series_type: SeriesType,
    pub student_user_id: i64,
    pub teacher_id: i64,
    pub course_id: i64,
    pub title: String,
    pub frequency: SeriesFrequency,
    #[serde(default = "default_interval")]
    pub interval: i64,
    pub occurrence_count: Option<u32>,
    pub until_date: Option<DateTime<Utc>>,
    pub start_at_utc: DateTime<Utc>,
    #[serde(default = "default_duration_minutes")]
    pub duration_minutes: i64,
    // 仅 group_series 生效
    pub capacity: Option<i64>,
    #[serde(default)]
    pub enable_waitlist: bool,
}

fn default_interval() -> i64 {
    1
}

fn default_duration_minutes() -> i64 {
    60
}

// 取消系列请求
#[derive(Debug, Clone, Deserialize)]
pub struct CancelSeriesRequest {
    pub cancelled_by: i64,
    #[serde(default)]
    pub note: Option<String>,
}
