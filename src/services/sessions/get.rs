use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SessionService, session_error_response};
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_session(
    service: &SessionService,
    request: &HttpRequest,
    session_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_session_detail(session_id).await {
        Ok(Some(detail)) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(detail, "Session retrieved successfully"))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SessionNotFound,
            format!("Session {session_id} not found"),
        ))),
        Err(e) => Ok(session_error_response(&e)),
    }
}
