//! 预导入模块，方便使用

pub use super::booking_policies::{
    ActiveModel as BookingPolicyActiveModel, Entity as BookingPolicies,
    Model as BookingPolicyModel,
};
pub use super::booking_series::{
    ActiveModel as BookingSeriesActiveModel, Entity as BookingSeries, Model as BookingSeriesModel,
};
pub use super::booking_series_items::{
    ActiveModel as BookingSeriesItemActiveModel, Entity as BookingSeriesItems,
    Model as BookingSeriesItemModel,
};
pub use super::bookings::{
    ActiveModel as BookingActiveModel, Entity as Bookings, Model as BookingModel,
};
pub use super::sessions::{
    ActiveModel as SessionActiveModel, Entity as Sessions, Model as SessionModel,
};
pub use super::waitlist_entries::{
    ActiveModel as WaitlistEntryActiveModel, Entity as WaitlistEntries,
    Model as WaitlistEntryModel,
};
