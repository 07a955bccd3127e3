use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{SeriesService, series_error_response};
use crate::models::ApiResponse;
use crate::models::series::requests::CancelSeriesRequest;

pub async fn cancel_series(
    service: &SeriesService,
    request: &HttpRequest,
    series_id: i64,
    cancel_data: CancelSeriesRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.cancel_booking_series(series_id, cancel_data).await {
        Ok(result) => {
            info!(
                series_id,
                cancelled = result.cancelled_occurrences,
                untouched = result.untouched_occurrences,
                "Booking series cancelled"
            );
            Ok(HttpResponse::Ok()
                .json(ApiResponse::success(result, "Series cancelled successfully")))
        }
        Err(e) => Ok(series_error_response(&e)),
    }
}
