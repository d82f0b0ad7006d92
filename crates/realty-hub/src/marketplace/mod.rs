//! Cross-role listing and advertisement lifecycle engine.
//!
//! Every service takes the acting [`Actor`] explicitly and talks to storage through the
//! repository traits re-exported here. [`MemoryStore`] is the bundled implementation; it
//! performs each guarded check-and-write inside a single critical section so concurrent
//! moderation and submission calls serialize at the storage boundary.

pub mod advertisements;
pub mod clock;
mod error;
pub mod favorites;
pub mod feedback;
mod http;
pub mod identity;
pub mod memory;
pub mod properties;
pub mod reporting;
mod repository;
mod router;
pub mod users;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use crate::config::MarketplaceConfig;

pub use advertisements::{
    ActiveAdvertisementFeed, AdvertisementId, AdvertisementOverview, AdvertisementPipeline,
    AdvertisementRequest, AdvertisementStatus, AdvertisementSubmission, AdvertisingAction,
    FeaturedListing, ModerationDecision,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::MarketplaceError;
pub use favorites::{FavoriteEntry, FavoritesIndex, ToggleOutcome};
pub use feedback::{Feedback, FeedbackId, FeedbackLog, FeedbackSubmission};
pub use http::ACTOR_HEADER;
pub use identity::{Actor, Role, UserId};
pub use memory::MemoryStore;
pub use properties::{
    Property, PropertyAttributes, PropertyCriteria, PropertyId, PropertyRegistry, PropertyStatus,
    PropertyType,
};
pub use reporting::{DashboardFilters, DashboardReporter, DashboardStats, DateRange};
pub use repository::{
    AdvertisementRepository, FavoriteRepository, FeedbackRepository, MarketplaceStore,
    PropertyRepository, RepositoryError, UserRepository,
};
pub use router::marketplace_router;
pub use users::{User, UserDirectory, UserRegistration};

/// Facade wiring every marketplace service onto one shared store and clock.
pub struct Marketplace<S> {
    pub users: UserDirectory<S>,
    pub properties: PropertyRegistry<S>,
    pub advertisements: AdvertisementPipeline<S>,
    pub feed: ActiveAdvertisementFeed<S>,
    pub favorites: FavoritesIndex<S>,
    pub feedback: FeedbackLog<S>,
    pub reporting: DashboardReporter<S>,
    store: Arc<S>,
}

impl<S> Marketplace<S>
where
    S: MarketplaceStore,
{
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>, config: &MarketplaceConfig) -> Self {
        Self {
            users: UserDirectory::new(store.clone(), clock.clone()),
            properties: PropertyRegistry::new(
                store.clone(),
                clock.clone(),
                config.favorites_cleanup,
            ),
            advertisements: AdvertisementPipeline::new(store.clone(), clock.clone()),
            feed: ActiveAdvertisementFeed::new(store.clone()),
            favorites: FavoritesIndex::new(store.clone(), clock.clone()),
            feedback: FeedbackLog::new(store.clone(), clock),
            reporting: DashboardReporter::new(store.clone(), config.recent_limit),
            store,
        }
    }

    /// The shared backing store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }
}

impl Marketplace<MemoryStore> {
    /// In-memory marketplace on the system clock.
    pub fn in_memory(config: &MarketplaceConfig) -> Self {
        Self::new(
            Arc::new(MemoryStore::default()),
            Arc::new(SystemClock),
            config,
        )
    }
}
