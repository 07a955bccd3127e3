use serde::{Deserialize, Serialize};

use crate::models::bookings::entities::Booking;
use crate::models::waitlist::entities::WaitlistEntry;

// 候补名单响应，按 FIFO 顺序（created_at 升序）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitlistResponse {
    pub session_id: i64,
    pub entries: Vec<WaitlistEntry>,
}

// 接受补位邀请成功后返回生成的预约
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptOfferResponse {
    pub entry: WaitlistEntry,
    pub booking: Booking,
}
