use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{PolicyService, policy_error_response};
use crate::models::ApiResponse;
use crate::models::policies::requests::UpsertPolicyRequest;

pub async fn upsert_policy(
    service: &PolicyService,
    request: &HttpRequest,
    teacher_id: i64,
    policy_data: UpsertPolicyRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let course_id = policy_data.course_id;

    match storage.upsert_booking_policy(teacher_id, policy_data).await {
        Ok(policy) => {
            info!(teacher_id, ?course_id, "Booking policy upserted");
            Ok(HttpResponse::Ok()
                .json(ApiResponse::success(policy, "Policy saved successfully")))
        }
        Err(e) => Ok(policy_error_response(&e)),
    }
}
