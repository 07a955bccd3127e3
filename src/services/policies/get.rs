use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{PolicyService, policy_error_response};
use crate::models::ApiResponse;

pub async fn get_policy(
    service: &PolicyService,
    request: &HttpRequest,
    teacher_id: i64,
    course_id: Option<i64>,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 总会解析出一个策略，最差也有内置默认值
    match storage.get_booking_policy(teacher_id, course_id).await {
        Ok(policy) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(policy, "Policy retrieved successfully"))),
        Err(e) => Ok(policy_error_response(&e)),
    }
}
