pub mod error_code;
pub mod pagination;
pub mod response;

use chrono::{DateTime, Utc};

/// 程序启动时间，用于 /system/status 的运行时长统计
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: DateTime<Utc>,
}
