use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::series::requests::{CancelSeriesRequest, CreateSeriesRequest};
use crate::services::SeriesService;
use crate::utils::SafeSeriesIdI64;

// 懒加载的全局 SERIES_SERVICE 实例
static SERIES_SERVICE: Lazy<SeriesService> = Lazy::new(SeriesService::new_lazy);

// HTTP处理程序
pub async fn create_series(
    req: HttpRequest,
    series_data: web::Json<CreateSeriesRequest>,
) -> ActixResult<HttpResponse> {
    SERIES_SERVICE
        .create_series(&req, series_data.into_inner())
        .await
}

pub async fn get_series(req: HttpRequest, series_id: SafeSeriesIdI64) -> ActixResult<HttpResponse> {
    SERIES_SERVICE.get_series(&req, series_id.0).await
}

pub async fn cancel_series(
    req: HttpRequest,
    series_id: SafeSeriesIdI64,
    cancel_data: web::Json<CancelSeriesRequest>,
) -> ActixResult<HttpResponse> {
    SERIES_SERVICE
        .cancel_series(&req, series_id.0, cancel_data.into_inner())
        .await
}

// 配置路由
pub fn configure_series_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/series")
            .service(web::resource("").route(web::post().to(create_series)))
            .service(web::resource("/{series_id}").route(web::get().to(get_series)))
            .service(
                web::resource("/{series_id}/cancel").route(web::post().to(cancel_series)),
            ),
    );
}
