use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 系统运行状态响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemStatusResponse {
    pub name: String,
    pub version: String,
    pub environment: String,
    pub start_time: DateTime<Utc>,
    pub uptime_seconds: i64,
}
