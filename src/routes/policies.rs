use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::policies::requests::{PolicyQuery, UpsertPolicyRequest};
use crate::services::PolicyService;
use crate::utils::SafeTeacherIdI64;

// 懒加载的全局 POLICY_SERVICE 实例
static POLICY_SERVICE: Lazy<PolicyService> = Lazy::new(PolicyService::new_lazy);

// HTTP处理程序
pub async fn get_policy(
    req: HttpRequest,
    teacher_id: SafeTeacherIdI64,
    query: web::Query<PolicyQuery>,
) -> ActixResult<HttpResponse> {
    POLICY_SERVICE
        .get_policy(&req, teacher_id.0, query.course_id)
        .await
}

pub async fn upsert_policy(
    req: HttpRequest,
    teacher_id: SafeTeacherIdI64,
    policy_data: web::Json<UpsertPolicyRequest>,
) -> ActixResult<HttpResponse> {
    POLICY_SERVICE
        .upsert_policy(&req, teacher_id.0, policy_data.into_inner())
        .await
}

// 配置路由
pub fn configure_policies_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/policies").service(
            web::resource("/{teacher_id}")
                .route(web::get().to(get_policy))
                .route(web::put().to(upsert_policy)),
        ),
    );
}
