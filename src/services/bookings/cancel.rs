use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{BookingService, booking_error_response};
use crate::models::ApiResponse;
use crate::models::bookings::requests::CancelBookingRequest;

pub async fn cancel_booking(
    service: &BookingService,
    request: &HttpRequest,
    booking_id: i64,
    cancel_data: CancelBookingRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.cancel_booking(booking_id, cancel_data).await {
        Ok(result) => {
            info!(
                booking_id,
                seats_released = result.seats_released,
                promoted = result.offered_entry.is_some(),
                "Booking cancelled"
            );
            Ok(HttpResponse::Ok()
                .json(ApiResponse::success(result, "Booking cancelled successfully")))
        }
        Err(e) => Ok(booking_error_response(&e)),
    }
}
