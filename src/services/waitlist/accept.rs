use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{WaitlistService, waitlist_error_response};
use crate::models::ApiResponse;
use crate::models::waitlist::requests::AcceptOfferRequest;

pub async fn accept_offer(
    service: &WaitlistService,
    request: &HttpRequest,
    session_id: i64,
    accept_data: AcceptOfferRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let student_user_id = accept_data.student_user_id;

    match storage.accept_waitlist_offer(session_id, accept_data).await {
        Ok(result) => {
            info!(
                session_id,
                student_user_id,
                booking_id = result.booking.id,
                "Waitlist offer accepted"
            );
            Ok(HttpResponse::Ok()
                .json(ApiResponse::success(result, "Offer accepted successfully")))
        }
        Err(e) => Ok(waitlist_error_response(&e)),
    }
}
