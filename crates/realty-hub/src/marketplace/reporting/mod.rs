//! Admin dashboard aggregation.

pub mod filters;
pub mod reporter;
pub mod router;
pub mod views;

pub use filters::{DashboardFilters, DateRange};
pub use reporter::DashboardReporter;
pub use views::{
    AdvertisementStats, CountEntry, DashboardStats, FeedbackStats, PropertyStats, UserStats,
};
