use std::cmp::Reverse;
use std::sync::Arc;

use tracing::debug;

use super::ToggleOutcome;
use crate::marketplace::clock::Clock;
use crate::marketplace::error::MarketplaceError;
use crate::marketplace::identity::{Actor, Role, UserId};
use crate::marketplace::properties::{Property, PropertyId};
use crate::marketplace::repository::{FavoriteRepository, PropertyRepository};

pub struct FavoritesIndex<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S> FavoritesIndex<S>
where
    S: FavoriteRepository + PropertyRepository,
{
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Adds the property to the buyer's favourites, or removes it if already there.
    pub fn toggle(
        &self,
        actor: &Actor,
        property_id: PropertyId,
    ) -> Result<ToggleOutcome, MarketplaceError> {
        actor.require(Role::Buyer, "favourite a property")?;
        let added = self
            .store
            .toggle_favorite(actor.user_id, property_id, self.clock.now())?;

        debug!(buyer_id = %actor.user_id, property_id = %property_id, added, "favourite toggled");
        Ok(ToggleOutcome { property_id, added })
    }

    /// The buyer's favourites as they read now, most recently added first. Entries whose
    /// property has since been deleted are skipped.
    pub fn list(&self, buyer_id: UserId) -> Result<Vec<Property>, MarketplaceError> {
        let mut entries = self.store.favorites_of(buyer_id)?;
        // Stored oldest first; reversing keeps later additions ahead on equal timestamps.
        entries.reverse();
        entries.sort_by_key(|entry| Reverse(entry.created_at));

        let mut properties = Vec::with_capacity(entries.len());
        for entry in entries {
            match self.store.fetch_property(entry.property_id)? {
                Some(property) => properties.push(property),
                None => debug!(
                    buyer_id = %buyer_id,
                    property_id = %entry.property_id,
                    "dropping dangling favourite"
                ),
            }
        }
        Ok(properties)
    }
}
