use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{BookingService, booking_error_response};
use crate::models::ApiResponse;
use crate::models::bookings::requests::BookingDecisionRequest;

pub async fn confirm_booking(
    service: &BookingService,
    request: &HttpRequest,
    booking_id: i64,
    decision: BookingDecisionRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let decided_by = decision.decided_by;

    match storage.confirm_booking(booking_id, decision).await {
        Ok(booking) => {
            info!(booking_id, decided_by, "Booking confirmed");
            Ok(HttpResponse::Ok()
                .json(ApiResponse::success(booking, "Booking confirmed successfully")))
        }
        Err(e) => Ok(booking_error_response(&e)),
    }
}

pub async fn decline_booking(
    service: &BookingService,
    request: &HttpRequest,
    booking_id: i64,
    decision: BookingDecisionRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let decided_by = decision.decided_by;

    match storage.decline_booking(booking_id, decision).await {
        Ok(booking) => {
            info!(booking_id, decided_by, "Booking declined");
            Ok(HttpResponse::Ok()
                .json(ApiResponse::success(booking, "Booking declined successfully")))
        }
        Err(e) => Ok(booking_error_response(&e)),
    }
}
