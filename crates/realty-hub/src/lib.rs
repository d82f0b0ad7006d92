//! Lifecycle engine for a real-estate marketplace: property listings, advertisement
//! moderation, buyer favorites and dashboard reporting, with an axum HTTP surface.

pub mod config;
pub mod error;
pub mod marketplace;
pub mod telemetry;
