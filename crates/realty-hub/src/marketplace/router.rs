use std::sync::Arc;

use axum::Router;

use super::advertisements::router::advertisement_router;
use super::favorites::router::favorites_router;
use super::feedback::router::feedback_router;
use super::properties::router::property_router;
use super::reporting::router::reporting_router;
use super::repository::MarketplaceStore;
use super::users::router::user_router;
use super::Marketplace;

/// Every marketplace endpoint on one router. The acting user is read from
/// [`ACTOR_HEADER`](super::ACTOR_HEADER) on routes that need one.
pub fn marketplace_router<S>(marketplace: Arc<Marketplace<S>>) -> Router
where
    S: MarketplaceStore,
{
    Router::new()
        .merge(user_router(marketplace.clone()))
        .merge(property_router(marketplace.clone()))
        .merge(advertisement_router(marketplace.clone()))
        .merge(favorites_router(marketplace.clone()))
        .merge(feedback_router(marketplace.clone()))
        .merge(reporting_router(marketplace))
}
