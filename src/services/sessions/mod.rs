pub mod cancel;
pub mod create;
pub mod get;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::BookingSystemError;
use crate::models::sessions::requests::{
    CancelSessionRequest, CreateSessionRequest, SessionListQuery,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct SessionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SessionService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn create_session(
        &self,
        req: &HttpRequest,
        session_data: CreateSessionRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_session(self, req, session_data).await
    }

    // 场次详情（含实时座位统计）
    pub async fn get_session(&self, req: &HttpRequest, session_id: i64) -> ActixResult<HttpResponse> {
        get::get_session(self, req, session_id).await
    }

    pub async fn list_sessions(
        &self,
        req: &HttpRequest,
        query: SessionListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_sessions(self, req, query).await
    }

    pub async fn cancel_session(
        &self,
        req: &HttpRequest,
        session_id: i64,
        cancel_data: CancelSessionRequest,
    ) -> ActixResult<HttpResponse> {
        cancel::cancel_session(self, req, session_id, cancel_data).await
    }
}

/// 场次相关存储错误到 HTTP 响应的统一映射
pub(crate) fn session_error_response(e: &BookingSystemError) -> HttpResponse {
    match e {
        BookingSystemError::Validation(msg) => HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::InvalidParams, msg)),
        BookingSystemError::NotFound(msg) => HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::SessionNotFound, msg)),
        BookingSystemError::InvalidTransition(msg) => HttpResponse::Conflict()
            .json(ApiResponse::error_empty(ErrorCode::SessionCancelFailed, msg)),
        _ => {
            tracing::error!("Session operation failed: {}", e);
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                "Internal server error",
            ))
        }
    }
}
