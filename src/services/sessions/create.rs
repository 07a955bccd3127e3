use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{SessionService, session_error_response};
use crate::models::ApiResponse;
use crate::models::sessions::requests::CreateSessionRequest;

pub async fn create_session(
    service: &SessionService,
    request: &HttpRequest,
    session_data: CreateSessionRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.create_session(session_data).await {
        Ok(session) => {
            info!(
                session_id = session.id,
                teacher_id = session.teacher_id,
                "Session created successfully"
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(session, "Session created successfully")))
        }
        Err(e) => Ok(session_error_response(&e)),
    }
}
