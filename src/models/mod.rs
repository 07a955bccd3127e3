//! 数据模型定义
//!
//! requests 为入参模型，responses 为出参模型，entities 为业务实体。

pub mod common;

pub mod bookings;
pub mod policies;
pub mod series;
pub mod sessions;
pub mod system;
pub mod waitlist;

pub use common::error_code::ErrorCode;
pub use common::pagination::PaginationInfo;
pub use common::response::ApiResponse;
pub use common::AppStartTime;
