pub mod bookings;

pub mod policies;

pub mod series;

pub mod sessions;

pub mod system;

pub mod waitlist;

pub use bookings::configure_bookings_routes;
pub use policies::configure_policies_routes;
pub use series::configure_series_routes;
pub use sessions::configure_sessions_routes;
pub use system::configure_system_routes;
