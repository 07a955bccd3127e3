use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SessionService, session_error_response};
use crate::models::ApiResponse;
use crate::models::sessions::requests::SessionListQuery;

pub async fn list_sessions(
    service: &SessionService,
    request: &HttpRequest,
    query: SessionListQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_sessions_with_pagination(query).await {
        Ok(list) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(list, "Sessions retrieved successfully"))),
        Err(e) => Ok(session_error_response(&e)),
    }
}
