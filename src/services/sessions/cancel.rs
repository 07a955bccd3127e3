use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{SessionService, session_error_response};
use crate::models::ApiResponse;
use crate::models::sessions::requests::CancelSessionRequest;

pub async fn cancel_session(
    service: &SessionService,
    request: &HttpRequest,
    session_id: i64,
    cancel_data: CancelSessionRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.cancel_session(session_id, cancel_data).await {
        Ok(result) => {
            info!(
                session_id,
                cancelled_bookings = result.cancelled_bookings,
                expired_waitlist_entries = result.expired_waitlist_entries,
                "Session cancelled"
            );
            Ok(HttpResponse::Ok()
                .json(ApiResponse::success(result, "Session cancelled successfully")))
        }
        Err(e) => Ok(session_error_response(&e)),
    }
}
