use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{BookingService, booking_error_response};
use crate::models::ApiResponse;
use crate::models::bookings::{requests::CreateBookingRequest, responses::BookingOutcome};

pub async fn create_booking(
    service: &BookingService,
    request: &HttpRequest,
    booking_data: CreateBookingRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let student_user_id = booking_data.student_user_id;

    match storage.create_booking(booking_data).await {
        Ok(outcome) => match &outcome {
            BookingOutcome::Booked { booking } => {
                info!(
                    booking_id = booking.id,
                    student_user_id,
                    status = %booking.status,
                    "Booking created"
                );
                Ok(HttpResponse::Created()
                    .json(ApiResponse::success(outcome, "Booking created successfully")))
            }
            BookingOutcome::Waitlisted { entry, position } => {
                info!(
                    entry_id = entry.id,
                    student_user_id,
                    position,
                    "Session full, student joined waitlist"
                );
                // 满员落入候补也算成功受理
                Ok(HttpResponse::Accepted()
                    .json(ApiResponse::success(outcome, "Session full, joined waitlist")))
            }
        },
        Err(e) => Ok(booking_error_response(&e)),
    }
}
