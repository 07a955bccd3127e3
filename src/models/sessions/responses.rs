use serde::{Deserialize, Serialize};

use crate::models::sessions::entities::Session;
use crate::models::PaginationInfo;

// 场次列表响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionListResponse {
    pub items: Vec<Session>,
    pub pagination: PaginationInfo,
}

// 场次详情响应，座位数从预约表实时推导
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDetailResponse {
    pub session: Session,
    // count(confirmed + attended) 的实时汇总，用于核对缓存计数
    pub booked_seats: i64,
    pub remaining_seats: i64,
    // 候补中 waiting 状态的人数
    pub waiting_count: i64,
}

// 取消场次响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelSessionResponse {
    pub session: Session,
    pub cancelled_bookings: u64,
    pub expired_waitlist_entries: u64,
}
