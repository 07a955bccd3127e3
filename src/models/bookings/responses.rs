use serde::{Deserialize, Serialize};

use crate::models::bookings::entities::Booking;
use crate::models::waitlist::entities::WaitlistEntry;
use crate::models::PaginationInfo;

// 预约列表响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingListResponse {
    pub items: Vec<Booking>,
    pub pagination: PaginationInfo,
}

// 创建预约的结果：满员且开启候补时落入候补名单
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BookingOutcome {
    Booked { booking: Booking },
    Waitlisted { entry: WaitlistEntry, position: i64 },
}

// 取消预约响应，带取消后触发的候补补位信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelBookingResponse {
    pub booking: Booking,
    pub seats_released: i64,
    // 取消释放座位后收到补位邀请的候补记录
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offered_entry: Option<WaitlistEntry>,
}
