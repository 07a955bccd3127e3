pub mod accept;
pub mod leave;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::BookingSystemError;
use crate::models::waitlist::requests::{AcceptOfferRequest, LeaveWaitlistRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct WaitlistService {
    storage: Option<Arc<dyn Storage>>,
}

impl WaitlistService {
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

    pub async fn list_waitlist(&self, req: &HttpRequest, session_id: i64) -> ActixResult<HttpResponse> {
        list::list_waitlist(self, req, session_id).await
    }

    pub async fn accept_offer(
        &self,
        req: &HttpRequest,
        session_id: i64,
        accept_data: AcceptOfferRequest,
    ) -> ActixResult<HttpResponse> {
        accept::accept_offer(self, req, session_id, accept_data).await
    }

    pub async fn leave_waitlist(
        &self,
        req: &HttpRequest,
        session_id: i64,
        leave_data: LeaveWaitlistRequest,
    ) -> ActixResult<HttpResponse> {
        leave::leave_waitlist(self, req, session_id, leave_data).await
    }
}

/// 候补相关存储错误到 HTTP 响应的统一映射
pub(crate) fn waitlist_error_response(e: &BookingSystemError) -> HttpResponse {
    match e {
        BookingSystemError::Validation(msg) => HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::InvalidParams, msg)),
        BookingSystemError::NotFound(msg) => HttpResponse::NotFound().json(
            ApiResponse::error_empty(ErrorCode::WaitlistEntryNotFound, msg),
        ),
        BookingSystemError::OfferExpired(msg) => HttpResponse::Gone()
            .json(ApiResponse::error_empty(ErrorCode::OfferExpired, msg)),
        BookingSystemError::SessionFull(msg) => HttpResponse::Conflict()
            .json(ApiResponse::error_empty(ErrorCode::SessionFull, msg)),
        BookingSystemError::DuplicateBooking(msg) => HttpResponse::Conflict()
            .json(ApiResponse::error_empty(ErrorCode::DuplicateBooking, msg)),
        _ => {
            tracing::error!("Waitlist operation failed: {}", e);
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                "Internal server error",
            ))
        }
    }
}
