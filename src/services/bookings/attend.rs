use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{BookingService, booking_error_response};
use crate::models::ApiResponse;
use crate::models::bookings::requests::MarkAttendedRequest;

pub async fn mark_attended(
    service: &BookingService,
    request: &HttpRequest,
    booking_id: i64,
    attend_data: MarkAttendedRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.mark_booking_attended(booking_id, attend_data).await {
        Ok(booking) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(booking, "Attendance marked successfully"))),
        Err(e) => Ok(booking_error_response(&e)),
    }
}
