pub mod attend;
pub mod cancel;
pub mod create;
pub mod decision;
pub mod get;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::BookingSystemError;
use crate::models::bookings::requests::{
    BookingDecisionRequest, BookingListQuery, CancelBookingRequest, CreateBookingRequest,
    MarkAttendedRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct BookingService {
    storage: Option<Arc<dyn Storage>>,
}

impl BookingService {
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

    pub async fn create_booking(
        &self,
        req: &HttpRequest,
        booking_data: CreateBookingRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_booking(self, req, booking_data).await
    }

    pub async fn get_booking(&self, req: &HttpRequest, booking_id: i64) -> ActixResult<HttpResponse> {
        get::get_booking(self, req, booking_id).await
    }

    pub async fn list_bookings(
        &self,
        req: &HttpRequest,
        query: BookingListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_bookings(self, req, query).await
    }

    // 教师审批：通过
    pub async fn confirm_booking(
        &self,
        req: &HttpRequest,
        booking_id: i64,
        decision: BookingDecisionRequest,
    ) -> ActixResult<HttpResponse> {
        decision::confirm_booking(self, req, booking_id, decision).await
    }

    // 教师审批：拒绝
    pub async fn decline_booking(
        &self,
        req: &HttpRequest,
        booking_id: i64,
        decision: BookingDecisionRequest,
    ) -> ActixResult<HttpResponse> {
        decision::decline_booking(self, req, booking_id, decision).await
    }

    pub async fn cancel_booking(
        &self,
        req: &HttpRequest,
        booking_id: i64,
        cancel_data: CancelBookingRequest,
    ) -> ActixResult<HttpResponse> {
        cancel::cancel_booking(self, req, booking_id, cancel_data).await
    }

    pub async fn mark_attended(
        &self,
        req: &HttpRequest,
        booking_id: i64,
        attend_data: MarkAttendedRequest,
    ) -> ActixResult<HttpResponse> {
        attend::mark_attended(self, req, booking_id, attend_data).await
    }
}

/// 预约相关存储错误到 HTTP 响应的统一映射
pub(crate) fn booking_error_response(e: &BookingSystemError) -> HttpResponse {
    match e {
        BookingSystemError::Validation(msg) => HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::InvalidParams, msg)),
        BookingSystemError::NotFound(msg) => HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::BookingNotFound, msg)),
        BookingSystemError::DuplicateBooking(msg) => HttpResponse::Conflict()
            .json(ApiResponse::error_empty(ErrorCode::DuplicateBooking, msg)),
        BookingSystemError::CapacityExceeded(msg) => HttpResponse::Conflict()
            .json(ApiResponse::error_empty(ErrorCode::CapacityExceeded, msg)),
        BookingSystemError::SessionFull(msg) => HttpResponse::Conflict()
            .json(ApiResponse::error_empty(ErrorCode::SessionFull, msg)),
        BookingSystemError::InsufficientNotice(msg) => HttpResponse::UnprocessableEntity()
            .json(ApiResponse::error_empty(ErrorCode::InsufficientNotice, msg)),
        BookingSystemError::InvalidTransition(msg) => HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::BookingTransitionInvalid, msg),
        ),
        _ => {
            tracing::error!("Booking operation failed: {}", e);
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                "Internal server error",
            ))
        }
    }
}
