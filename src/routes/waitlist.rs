use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::waitlist::requests::{AcceptOfferRequest, LeaveWaitlistRequest};
use crate::services::WaitlistService;
use crate::utils::SafeSessionIdI64;

// 懒加载的全局 WAITLIST_SERVICE 实例
static WAITLIST_SERVICE: Lazy<WaitlistService> = Lazy::new(WaitlistService::new_lazy);

// HTTP处理程序
pub async fn list_waitlist(
    req: HttpRequest,
    session_id: SafeSessionIdI64,
) -> ActixResult<HttpResponse> {
    WAITLIST_SERVICE.list_waitlist(&req, session_id.0).await
}

pub async fn accept_offer(
    req: HttpRequest,
    session_id: SafeSessionIdI64,
    accept_data: web::Json<AcceptOfferRequest>,
) -> ActixResult<HttpResponse> {
    WAITLIST_SERVICE
        .accept_offer(&req, session_id.0, accept_data.into_inner())
        .await
}

pub async fn leave_waitlist(
    req: HttpRequest,
    session_id: SafeSessionIdI64,
    leave_data: web::Json<LeaveWaitlistRequest>,
) -> ActixResult<HttpResponse> {
    WAITLIST_SERVICE
        .leave_waitlist(&req, session_id.0, leave_data.into_inner())
        .await
}
