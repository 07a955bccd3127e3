use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SeriesService, series_error_response};
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_series(
    service: &SeriesService,
    request: &HttpRequest,
    series_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_booking_series(series_id).await {
        Ok(Some(detail)) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(detail, "Series retrieved successfully"))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SeriesNotFound,
            format!("Series {series_id} not found"),
        ))),
        Err(e) => Ok(series_error_response(&e)),
    }
}
