pub mod bookings;
pub mod policies;
pub mod series;
pub mod sessions;
pub mod system;
pub mod waitlist;

pub use bookings::BookingService;
pub use policies::PolicyService;
pub use series::SeriesService;
pub use sessions::SessionService;
pub use system::SystemService;
pub use waitlist::WaitlistService;
