use chrono::{DateTime, Utc};

use super::advertisements::{AdvertisementId, AdvertisementRequest, NewAdvertisementRequest};
use super::favorites::FavoriteEntry;
use super::feedback::{Feedback, FeedbackSubmission};
use super::identity::UserId;
use super::properties::{NewProperty, Property, PropertyId};
use super::users::{User, UserRegistration};

/// Error enumeration for storage failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RepositoryError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Referenced(String),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` when the e-mail (case-insensitive) is already registered.
    fn insert_user(
        &self,
        registration: UserRegistration,
        created_at: DateTime<Utc>,
    ) -> Result<User, RepositoryError>;
    fn fetch_user(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
    fn users(&self) -> Result<Vec<User>, RepositoryError>;
}

pub trait PropertyRepository: Send + Sync {
    /// Allocates the id; the stored record starts out `available`.
    fn insert_property(&self, draft: NewProperty) -> Result<Property, RepositoryError>;
    fn fetch_property(&self, id: PropertyId) -> Result<Option<Property>, RepositoryError>;
    fn properties(&self) -> Result<Vec<Property>, RepositoryError>;

    /// Applies `apply` to a copy of the record and stores the copy only when `apply`
    /// succeeds. Read, check and write happen without interleaving other writers.
    fn update_property<E, F>(&self, id: PropertyId, apply: F) -> Result<Property, E>
    where
        F: FnOnce(&mut Property) -> Result<(), E>,
        E: From<RepositoryError>;

    /// Fails with `Referenced` while a pending or approved advertisement request points at
    /// the property. With `purge_favorites` set, favorites referencing it are dropped in the
    /// same step; the second field counts them.
    fn remove_property(
        &self,
        id: PropertyId,
        purge_favorites: bool,
    ) -> Result<(Property, usize), RepositoryError>;
}

pub trait AdvertisementRepository: Send + Sync {
    /// Inserts the request unless the property is missing (`NotFound`) or already has a
    /// pending or approved request (`Conflict`). The check and insert are one step.
    fn insert_advertisement(
        &self,
        draft: NewAdvertisementRequest,
    ) -> Result<AdvertisementRequest, RepositoryError>;
    fn fetch_advertisement(
        &self,
        id: AdvertisementId,
    ) -> Result<Option<AdvertisementRequest>, RepositoryError>;
    fn advertisements(&self) -> Result<Vec<AdvertisementRequest>, RepositoryError>;

    /// Same contract as [`PropertyRepository::update_property`].
    fn update_advertisement<E, F>(
        &self,
        id: AdvertisementId,
        apply: F,
    ) -> Result<AdvertisementRequest, E>
    where
        F: FnOnce(&mut AdvertisementRequest) -> Result<(), E>,
        E: From<RepositoryError>;
}

pub trait FavoriteRepository: Send + Sync {
    /// Flips the (buyer, property) pair and reports whether it is now present. Fails with
    /// `NotFound` when the property does not exist.
    fn toggle_favorite(
        &self,
        buyer_id: UserId,
        property_id: PropertyId,
        at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError>;
    fn favorites_of(&self, buyer_id: UserId) -> Result<Vec<FavoriteEntry>, RepositoryError>;
}

pub trait FeedbackRepository: Send + Sync {
    fn insert_feedback(
        &self,
        submission: FeedbackSubmission,
        created_at: DateTime<Utc>,
    ) -> Result<Feedback, RepositoryError>;
    fn feedback_entries(&self) -> Result<Vec<Feedback>, RepositoryError>;
}

/// Everything the marketplace facade and router need from storage.
pub trait MarketplaceStore:
    UserRepository
    + PropertyRepository
    + AdvertisementRepository
    + FavoriteRepository
    + FeedbackRepository
    + 'static
{
}

impl<T> MarketplaceStore for T where
    T: UserRepository
        + PropertyRepository
        + AdvertisementRepository
        + FavoriteRepository
        + FeedbackRepository
        + 'static
{
}
