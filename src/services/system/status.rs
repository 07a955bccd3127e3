use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use chrono::Utc;

use super::SystemService;
use crate::models::system::responses::SystemStatusResponse;
use crate::models::{ApiResponse, AppStartTime};

/// 运行状态：版本、环境与在线时长
pub async fn get_status(service: &SystemService, req: &HttpRequest) -> ActixResult<HttpResponse> {
    let config = service.get_config();

    let start_datetime = req
        .app_data::<web::Data<AppStartTime>>()
        .map(|t| t.start_datetime)
        .unwrap_or_else(Utc::now);

    let response = SystemStatusResponse {
        name: config.app.system_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: config.app.environment.clone(),
        start_time: start_datetime,
        uptime_seconds: (Utc::now() - start_datetime).num_seconds(),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Status retrieved successfully",
    )))
}
