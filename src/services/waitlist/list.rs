use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{WaitlistService, waitlist_error_response};
use crate::errors::BookingSystemError;
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_waitlist(
    service: &WaitlistService,
    request: &HttpRequest,
    session_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_session_waitlist(session_id).await {
        Ok(list) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(list, "Waitlist retrieved successfully"))),
        // 这里的 NotFound 指场次本身不存在
        Err(BookingSystemError::NotFound(msg)) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::SessionNotFound, msg))),
        Err(e) => Ok(waitlist_error_response(&e)),
    }
}
