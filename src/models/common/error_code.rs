//! API 业务错误码
//!
//! 按模块分段：1xxx 通用，2xxx 场次，3xxx 预约，4xxx 候补，5xxx 系列，6xxx 策略。

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    InvalidParams = 1001,
    NotFound = 1004,
    InternalServerError = 1500,

    // 场次
    SessionNotFound = 2001,
    SessionCreationFailed = 2002,
    SessionNotBookable = 2003,
    SessionCancelFailed = 2004,

    // 预约
    BookingNotFound = 3001,
    BookingCreationFailed = 3002,
    DuplicateBooking = 3003,
    CapacityExceeded = 3004,
    SessionFull = 3005,
    InsufficientNotice = 3006,
    BookingTransitionInvalid = 3007,
    BookingUpdateFailed = 3008,

    // 候补
    WaitlistEntryNotFound = 4001,
    OfferExpired = 4002,
    WaitlistOperationFailed = 4003,

    // 系列
    SeriesNotFound = 5001,
    SeriesCreationFailed = 5002,
    SeriesCancelFailed = 5003,

    // 策略
    PolicyNotFound = 6001,
    PolicyUpdateFailed = 6002,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::CapacityExceeded as i32, 3004);
        assert_eq!(ErrorCode::OfferExpired as i32, 4002);
    }
}
