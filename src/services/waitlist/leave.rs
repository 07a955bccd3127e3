use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{WaitlistService, waitlist_error_response};
use crate::models::{ApiResponse, ErrorCode};
use crate::models::waitlist::requests::LeaveWaitlistRequest;

pub async fn leave_waitlist(
    service: &WaitlistService,
    request: &HttpRequest,
    session_id: i64,
    leave_data: LeaveWaitlistRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.leave_waitlist(session_id, leave_data).await {
        Ok(true) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success_empty("Left waitlist successfully"))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::WaitlistEntryNotFound,
            "No active waitlist entry for this student",
        ))),
        Err(e) => Ok(waitlist_error_response(&e)),
    }
}
