use std::cmp::Reverse;
use std::sync::Arc;

use tracing::debug;

use super::domain::{AdvertisementStatus, FeaturedListing};
use crate::marketplace::error::MarketplaceError;
use crate::marketplace::repository::{AdvertisementRepository, PropertyRepository};

/// Buyer-facing projection of approved requests. Recomputed on every read from the same
/// store the pipeline writes to, so a finished decision shows up immediately.
pub struct ActiveAdvertisementFeed<S> {
    store: Arc<S>,
}

impl<S> ActiveAdvertisementFeed<S>
where
    S: AdvertisementRepository + PropertyRepository,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Approved requests with their current property, most recently approved first.
    pub fn active_feed(&self) -> Result<Vec<FeaturedListing>, MarketplaceError> {
        let mut listings = Vec::new();
        for request in self.store.advertisements()? {
            if request.status != AdvertisementStatus::Approved {
                continue;
            }
            match self.store.fetch_property(request.property_id)? {
                Some(property) => listings.push(FeaturedListing { request, property }),
                None => debug!(
                    request_id = %request.id,
                    property_id = %request.property_id,
                    "skipping advertisement for missing property"
                ),
            }
        }

        listings.sort_by_key(|listing| {
            (
                Reverse(listing.request.decided_at),
                Reverse(listing.request.id),
            )
        });
        Ok(listings)
    }
}
