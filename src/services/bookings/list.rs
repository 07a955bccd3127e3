use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{BookingService, booking_error_response};
use crate::models::ApiResponse;
use crate::models::bookings::requests::BookingListQuery;

pub async fn list_bookings(
    service: &BookingService,
    request: &HttpRequest,
    query: BookingListQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_bookings_with_pagination(query).await {
        Ok(list) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(list, "Bookings retrieved successfully"))),
        Err(e) => Ok(booking_error_response(&e)),
    }
}
