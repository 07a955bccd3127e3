pub mod extractor;
pub mod parameter_error_handler;
pub mod recurrence;
pub mod sql;
pub mod validate;

pub use extractor::{SafeBookingIdI64, SafeSeriesIdI64, SafeSessionIdI64, SafeTeacherIdI64};
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
pub use sql::escape_like_pattern;
