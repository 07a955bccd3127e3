use chrono::{DateTime, Utc};
use serde::Deserialize;

// 创建场次请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSessionRequest {
    pub course_id: i64,
    pub teacher_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub start_at_utc: DateTime<Utc>,
    #[serde(default = "default_duration_minutes")]
    pub duration_minutes: i64,
    #[serde(default = "default_timezone")]
    pub timezone_snapshot: String,
    #[serde(default = "default_capacity")]
    pub capacity: i64,
    #[serde(default)]
    pub enable_waitlist: bool,
}

fn default_duration_minutes() -> i64 {
    60
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_capacity() -> i64 {
    10
}

// 场次列表查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub teacher_id: Option<i64>,
    pub course_id: Option<i64>,
    pub status: Option<String>,
    // 只看未开始的场次
    pub upcoming_only: Option<bool>,
    pub search: Option<String>,
}

// 取消场次请求
#[derive(Debug, Clone, Deserialize)]
pub struct CancelSessionRequest {
    pub cancelled_by: i64,
    #[serde(default)]
    pub note: Option<String>,
}
