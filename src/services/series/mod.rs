pub mod cancel;
pub mod create;
pub mod get;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::BookingSystemError;
use crate::models::series::requests::{CancelSeriesRequest, CreateSeriesRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct SeriesService {
    storage: Option<Arc<dyn Storage>>,
}

impl SeriesService {
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

    pub async fn create_series(
        &self,
        req: &HttpRequest,
        series_data: CreateSeriesRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_series(self, req, series_data).await
    }

    pub async fn get_series(&self, req: &HttpRequest, series_id: i64) -> ActixResult<HttpResponse> {
        get::get_series(self, req, series_id).await
    }

    pub async fn cancel_series(
        &self,
        req: &HttpRequest,
        series_id: i64,
        cancel_data: CancelSeriesRequest,
    ) -> ActixResult<HttpResponse> {
        cancel::cancel_series(self, req, series_id, cancel_data).await
    }
}

/// 系列相关存储错误到 HTTP 响应的统一映射
pub(crate) fn series_error_response(e: &BookingSystemError) -> HttpResponse {
    match e {
        BookingSystemError::Validation(msg) => HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::InvalidParams, msg)),
        BookingSystemError::NotFound(msg) => HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::SeriesNotFound, msg)),
        BookingSystemError::InsufficientNotice(msg) => HttpResponse::UnprocessableEntity()
            .json(ApiResponse::error_empty(ErrorCode::InsufficientNotice, msg)),
        BookingSystemError::InvalidTransition(msg) => HttpResponse::Conflict()
            .json(ApiResponse::error_empty(ErrorCode::SeriesCancelFailed, msg)),
        _ => {
            tracing::error!("Series operation failed: {}", e);
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                "Internal server error",
            ))
        }
    }
}
