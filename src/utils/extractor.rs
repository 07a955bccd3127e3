//! 路径参数安全提取器
//!
//! 解析失败或非正数时直接返回 400，避免每个 handler 重复校验。

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{error, FromRequest, HttpRequest, HttpResponse};

use crate::models::{ApiResponse, ErrorCode};

macro_rules! safe_path_id {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
                let parsed = req
                    .match_info()
                    .get($param)
                    .and_then(|raw| raw.parse::<i64>().ok())
                    .filter(|id| *id > 0);

                ready(match parsed {
                    Some(id) => Ok($name(id)),
                    None => Err(error::InternalError::from_response(
                        concat!("invalid path parameter: ", $param),
                        HttpResponse::BadRequest().json(ApiResponse::error_empty(
                            ErrorCode::InvalidParams,
                            concat!("Invalid path parameter: ", $param),
                        )),
                    )
                    .into()),
                })
            }
        }
    };
}

safe_path_id!(SafeSessionIdI64, "session_id");
safe_path_id!(SafeBookingIdI64, "booking_id");
safe_path_id!(SafeSeriesIdI64, "series_id");
safe_path_id!(SafeTeacherIdI64, "teacher_id");
