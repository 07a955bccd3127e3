use serde::{Deserialize, Serialize};

use crate::models::bookings::entities::Booking;
use crate::models::series::entities::{BookingSeries, BookingSeriesItem};

// 系列详情响应：系列 + 按次序排列的预约
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesDetailResponse {
    pub series: BookingSeries,
    pub items: Vec<BookingSeriesItem>,
    pub bookings: Vec<Booking>,
}

// 取消系列响应，只取消未开始的预约
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelSeriesResponse {
    pub series: BookingSeries,
    pub cancelled_occurrences: u64,
    pub untouched_occurrences: u64,
}
