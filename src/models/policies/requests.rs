use serde::Deserialize;

// 创建/更新教师预约策略请求（按 teacher_id + course_id 覆盖写入）
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertPolicyRequest {
    pub course_id: Option<i64>,
    #[serde(default)]
    pub requires_approval_for_one_on_one: bool,
    #[serde(default)]
    pub requires_approval_for_group: bool,
    #[serde(default = "default_min_notice_hours")]
    pub min_notice_hours: i64,
    #[serde(default = "default_cancel_window_hours")]
    pub cancel_window_hours: i64,
    pub max_bookings_per_day: Option<i64>,
}

fn default_min_notice_hours() -> i64 {
    24
}

fn default_cancel_window_hours() -> i64 {
    24
}

// 策略查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolicyQuery {
    pub course_id: Option<i64>,
}
