//! Advertisement request pipeline and the active-advertisement feed built from it.

pub mod domain;
pub mod feed;
pub mod router;
pub mod service;

pub use domain::{
    AdvertisementId, AdvertisementOverview, AdvertisementRequest, AdvertisementStatus,
    AdvertisementSubmission, AdvertisingAction, FeaturedListing, ModerationDecision,
    NewAdvertisementRequest,
};
pub use feed::ActiveAdvertisementFeed;
pub use service::AdvertisementPipeline;
