//! 请求参数校验

use crate::errors::{BookingSystemError, Result};
use crate::models::bookings::entities::BookingType;
use crate::models::bookings::requests::CreateBookingRequest;
use crate::models::series::requests::CreateSeriesRequest;
use crate::models::sessions::requests::CreateSessionRequest;

/// 校验创建场次请求
pub fn validate_create_session(req: &CreateSessionRequest) -> Result<()> {
    if req.title.trim().is_empty() {
        return Err(BookingSystemError::validation("标题不能为空"));
    }
    if req.capacity < 1 {
        return Err(BookingSystemError::validation("座位数必须大于等于 1"));
    }
    if req.duration_minutes < 1 {
        return Err(BookingSystemError::validation("时长必须大于等于 1 分钟"));
    }
    if req.teacher_id < 1 || req.course_id < 1 {
        return Err(BookingSystemError::validation("teacher_id / course_id 非法"));
    }
    Ok(())
}

/// 校验创建预约请求，按预约类型检查必填字段
pub fn validate_create_booking(req: &CreateBookingRequest) -> Result<()> {
    if req.student_user_id < 1 {
        return Err(BookingSystemError::validation("student_user_id 非法"));
    }
    if req.seats_reserved < 1 {
        return Err(BookingSystemError::validation("预约座位数必须大于等于 1"));
    }
    match req.booking_type {
        BookingType::GroupSession => {
            if req.session_id.is_none() {
                return Err(BookingSystemError::validation(
                    "团课预约必须指定 session_id",
                ));
            }
        }
        BookingType::OneOnOne => {
            if req.teacher_id.is_none() || req.course_id.is_none() {
                return Err(BookingSystemError::validation(
                    "1:1 预约必须指定 teacher_id 和 course_id",
                ));
            }
            if req.start_at_utc.is_none() {
                return Err(BookingSystemError::validation(
                    "1:1 预约必须指定 start_at_utc",
                ));
            }
            if req.duration_minutes.is_some_and(|d| d < 1) {
                return Err(BookingSystemError::validation("时长必须大于等于 1 分钟"));
            }
            if req.seats_reserved != 1 {
                return Err(BookingSystemError::validation("1:1 预约只能占用 1 个座位"));
            }
        }
    }
    Ok(())
}

/// 校验创建系列请求
pub fn validate_create_series(req: &CreateSeriesRequest) -> Result<()> {
    if req.title.trim().is_empty() {
        return Err(BookingSystemError::validation("标题不能为空"));
    }
    if req.interval < 1 {
        return Err(BookingSystemError::validation("间隔必须大于等于 1"));
    }
    if req.duration_minutes < 1 {
        return Err(BookingSystemError::validation("时长必须大于等于 1 分钟"));
    }
    if req.capacity.is_some_and(|c| c < 1) {
        return Err(BookingSystemError::validation("座位数必须大于等于 1"));
    }
    if req.student_user_id < 1 || req.teacher_id < 1 || req.course_id < 1 {
        return Err(BookingSystemError::validation("相关 ID 非法"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn group_booking() -> CreateBookingRequest {
        CreateBookingRequest {
            booking_type: BookingType::GroupSession,
            student_user_id: 1,
            session_id: Some(1),
            teacher_id: None,
            course_id: None,
            start_at_utc: None,
            duration_minutes: None,
            seats_reserved: 1,
            student_note: None,
        }
    }

    #[test]
    fn test_group_booking_requires_session() {
        let mut req = group_booking();
        assert!(validate_create_booking(&req).is_ok());
        req.session_id = None;
        assert!(validate_create_booking(&req).is_err());
    }

    #[test]
    fn test_one_on_one_requires_teacher_and_time() {
        let req = CreateBookingRequest {
            booking_type: BookingType::OneOnOne,
            student_user_id: 1,
            session_id: None,
            teacher_id: Some(2),
            course_id: Some(3),
            start_at_utc: Some(Utc::now()),
            duration_minutes: Some(30),
            seats_reserved: 1,
            student_note: None,
        };
        assert!(validate_create_booking(&req).is_ok());

        let missing_time = CreateBookingRequest {
            start_at_utc: None,
            ..req.clone()
        };
        assert!(validate_create_booking(&missing_time).is_err());

        let multi_seat = CreateBookingRequest {
            seats_reserved: 2,
            ..req
        };
        assert!(validate_create_booking(&multi_seat).is_err());
    }

    #[test]
    fn test_seats_must_be_positive() {
        let mut req = group_booking();
        req.seats_reserved = 0;
        assert!(validate_create_booking(&req).is_err());
    }
}
