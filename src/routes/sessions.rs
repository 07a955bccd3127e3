use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::sessions::requests::{
    CancelSessionRequest, CreateSessionRequest, SessionListQuery,
};
use crate::routes::waitlist;
use crate::services::SessionService;
use crate::utils::SafeSessionIdI64;

// 懒加载的全局 SESSION_SERVICE 实例
static SESSION_SERVICE: Lazy<SessionService> = Lazy::new(SessionService::new_lazy);

// HTTP处理程序
pub async fn list_sessions(
    req: HttpRequest,
    query: web::Query<SessionListQuery>,
) -> ActixResult<HttpResponse> {
    SESSION_SERVICE.list_sessions(&req, query.into_inner()).await
}

pub async fn create_session(
    req: HttpRequest,
    session_data: web::Json<CreateSessionRequest>,
) -> ActixResult<HttpResponse> {
    SESSION_SERVICE
        .create_session(&req, session_data.into_inner())
        .await
}

pub async fn get_session(req: HttpRequest, session_id: SafeSessionIdI64) -> ActixResult<HttpResponse> {
    SESSION_SERVICE.get_session(&req, session_id.0).await
}

pub async fn cancel_session(
    req: HttpRequest,
    session_id: SafeSessionIdI64,
    cancel_data: web::Json<CancelSessionRequest>,
) -> ActixResult<HttpResponse> {
    SESSION_SERVICE
        .cancel_session(&req, session_id.0, cancel_data.into_inner())
        .await
}

// 配置路由
pub fn configure_sessions_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/sessions")
            .service(
                web::resource("")
                    .route(web::get().to(list_sessions))
                    .route(web::post().to(create_session)),
            )
            .service(web::resource("/{session_id}").route(web::get().to(get_session)))
            .service(
                web::resource("/{session_id}/cancel").route(web::post().to(cancel_session)),
            )
            // 候补名单挂在场次路径下
            .service(
                web::scope("/{session_id}/waitlist")
                    .service(web::resource("").route(web::get().to(waitlist::list_waitlist)))
                    .service(
                        web::resource("/accept").route(web::post().to(waitlist::accept_offer)),
                    )
                    .service(
                        web::resource("/leave").route(web::post().to(waitlist::leave_waitlist)),
                    ),
            ),
    );
}
