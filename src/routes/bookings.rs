use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::bookings::requests::{
    BookingDecisionRequest, BookingListQuery, CancelBookingRequest, CreateBookingRequest,
    MarkAttendedRequest,
};
use crate::services::BookingService;
use crate::utils::SafeBookingIdI64;

// 懒加载的全局 BOOKING_SERVICE 实例
static BOOKING_SERVICE: Lazy<BookingService> = Lazy::new(BookingService::new_lazy);

// HTTP处理程序
pub async fn list_bookings(
    req: HttpRequest,
    query: web::Query<BookingListQuery>,
) -> ActixResult<HttpResponse> {
    BOOKING_SERVICE.list_bookings(&req, query.into_inner()).await
}

pub async fn create_booking(
    req: HttpRequest,
    booking_data: web::Json<CreateBookingRequest>,
) -> ActixResult<HttpResponse> {
    BOOKING_SERVICE
        .create_booking(&req, booking_data.into_inner())
        .await
}

pub async fn get_booking(req: HttpRequest, booking_id: SafeBookingIdI64) -> ActixResult<HttpResponse> {
    BOOKING_SERVICE.get_booking(&req, booking_id.0).await
}

pub async fn confirm_booking(
    req: HttpRequest,
    booking_id: SafeBookingIdI64,
    decision: web::Json<BookingDecisionRequest>,
) -> ActixResult<HttpResponse> {
    BOOKING_SERVICE
        .confirm_booking(&req, booking_id.0, decision.into_inner())
        .await
}

pub async fn decline_booking(
    req: HttpRequest,
    booking_id: SafeBookingIdI64,
    decision: web::Json<BookingDecisionRequest>,
) -> ActixResult<HttpResponse> {
    BOOKING_SERVICE
        .decline_booking(&req, booking_id.0, decision.into_inner())
        .await
}

pub async fn cancel_booking(
    req: HttpRequest,
    booking_id: SafeBookingIdI64,
    cancel_data: web::Json<CancelBookingRequest>,
) -> ActixResult<HttpResponse> {
    BOOKING_SERVICE
        .cancel_booking(&req, booking_id.0, cancel_data.into_inner())
        .await
}

pub async fn mark_attended(
    req: HttpRequest,
    booking_id: SafeBookingIdI64,
    attend_data: web::Json<MarkAttendedRequest>,
) -> ActixResult<HttpResponse> {
    BOOKING_SERVICE
        .mark_attended(&req, booking_id.0, attend_data.into_inner())
        .await
}

// 配置路由
pub fn configure_bookings_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/bookings")
            .service(
                web::resource("")
                    .route(web::get().to(list_bookings))
                    .route(web::post().to(create_booking)),
            )
            .service(web::resource("/{booking_id}").route(web::get().to(get_booking)))
            .service(
                web::resource("/{booking_id}/confirm").route(web::post().to(confirm_booking)),
            )
            .service(
                web::resource("/{booking_id}/decline").route(web::post().to(decline_booking)),
            )
            .service(
                web::resource("/{booking_id}/cancel").route(web::post().to(cancel_booking)),
            )
            .service(
                web::resource("/{booking_id}/attend").route(web::post().to(mark_attended)),
            ),
    );
}
