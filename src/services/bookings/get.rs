use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{BookingService, booking_error_response};
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_booking(
    service: &BookingService,
    request: &HttpRequest,
    booking_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_booking_by_id(booking_id).await {
        Ok(Some(booking)) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(booking, "Booking retrieved successfully"))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::BookingNotFound,
            format!("Booking {booking_id} not found"),
        ))),
        Err(e) => Ok(booking_error_response(&e)),
    }
}
