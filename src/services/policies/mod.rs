pub mod get;
pub mod upsert;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::BookingSystemError;
use crate::models::policies::requests::UpsertPolicyRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct PolicyService {
    storage: Option<Arc<dyn Storage>>,
}

impl PolicyService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 解析生效策略（课程级 > 教师默认 > 内置默认）
    pub async fn get_policy(
        &self,
        req: &HttpRequest,
        teacher_id: i64,
        course_id: Option<i64>,
    ) -> ActixResult<HttpResponse> {
        get::get_policy(self, req, teacher_id, course_id).await
    }

    pub async fn upsert_policy(
        &self,
        req: &HttpRequest,
        teacher_id: i64,
        policy_data: UpsertPolicyRequest,
    ) -> ActixResult<HttpResponse> {
        upsert::upsert_policy(self, req, teacher_id, policy_data).await
    }
}

/// 策略相关存储错误到 HTTP 响应的统一映射
pub(crate) fn policy_error_response(e: &BookingSystemError) -> HttpResponse {
    match e {
        BookingSystemError::Validation(msg) => HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::InvalidParams, msg)),
        BookingSystemError::NotFound(msg) => HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::PolicyNotFound, msg)),
        _ => {
            tracing::error!("Policy operation failed: {}", e);
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                "Internal server error",
            ))
        }
    }
}
