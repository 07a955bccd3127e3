use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{SeriesService, series_error_response};
use crate::models::ApiResponse;
use crate::models::series::requests::CreateSeriesRequest;

pub async fn create_series(
    service: &SeriesService,
    request: &HttpRequest,
    series_data: CreateSeriesRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.create_booking_series(series_data).await {
        Ok(detail) => {
            info!(
                series_id = detail.series.id,
                occurrences = detail.items.len(),
                "Booking series created"
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(detail, "Series created successfully")))
        }
        Err(e) => Ok(series_error_response(&e)),
    }
}
