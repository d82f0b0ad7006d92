//! Per-buyer favourite properties.

pub mod index;
pub mod router;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::marketplace::identity::UserId;
use crate::marketplace::properties::PropertyId;

pub use index::FavoritesIndex;

/// One (buyer, property) pair. Holds the property id only; the listing is resolved on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FavoriteEntry {
    pub buyer_id: UserId,
    pub property_id: PropertyId,
    pub created_at: DateTime<Utc>,
}

/// Authoritative state of the pair after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToggleOutcome {
    pub property_id: PropertyId,
    pub added: bool,
}
