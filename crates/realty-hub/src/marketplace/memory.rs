use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use super::advertisements::{AdvertisementId, AdvertisementRequest, NewAdvertisementRequest};
use super::favorites::FavoriteEntry;
use super::feedback::{Feedback, FeedbackId, FeedbackSubmission};
use super::identity::UserId;
use super::properties::{NewProperty, Property, PropertyId};
use super::repository::{
    AdvertisementRepository, FavoriteRepository, FeedbackRepository, PropertyRepository,
    RepositoryError, UserRepository,
};
use super::users::{User, UserRegistration};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    properties: BTreeMap<PropertyId, Property>,
    advertisements: BTreeMap<AdvertisementId, AdvertisementRequest>,
    /// Insertion order, oldest first.
    favorites: Vec<FavoriteEntry>,
    feedback: BTreeMap<FeedbackId, Feedback>,
    last_id: u64,
}

impl Tables {
    fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }

    fn has_active_advertisement(&self, property_id: PropertyId) -> bool {
        self.advertisements
            .values()
            .any(|request| request.property_id == property_id && request.status.is_active())
    }
}

/// Thread-safe in-memory store behind a single mutex.
///
/// Every guarded write (advertisement uniqueness, pending-only decisions, status
/// transitions, delete-while-advertised, favourite flips) checks and mutates under one
/// lock acquisition. Ids come from one shared counter.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, RepositoryError> {
        self.tables
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))
    }
}

impl UserRepository for MemoryStore {
    fn insert_user(
        &self,
        registration: UserRegistration,
        created_at: DateTime<Utc>,
    ) -> Result<User, RepositoryError> {
        let mut tables = self.lock()?;
        let taken = tables
            .users
            .values()
            .any(|user| user.email.eq_ignore_ascii_case(&registration.email));
        if taken {
            return Err(RepositoryError::Conflict(format!(
                "e-mail {} is already registered",
                registration.email
            )));
        }

        let id = UserId(tables.next_id());
        let user = User {
            id,
            name: registration.name,
            email: registration.email,
            role: registration.role,
            created_at,
        };
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    fn fetch_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.lock()?.users.get(&id).cloned())
    }

    fn users(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.lock()?.users.values().cloned().collect())
    }
}

impl PropertyRepository for MemoryStore {
    fn insert_property(&self, draft: NewProperty) -> Result<Property, RepositoryError> {
        let mut tables = self.lock()?;
        let id = PropertyId(tables.next_id());
        let property = Property::from_draft(id, draft);
        tables.properties.insert(id, property.clone());
        Ok(property)
    }

    fn fetch_property(&self, id: PropertyId) -> Result<Option<Property>, RepositoryError> {
        Ok(self.lock()?.properties.get(&id).cloned())
    }

    fn properties(&self) -> Result<Vec<Property>, RepositoryError> {
        Ok(self.lock()?.properties.values().cloned().collect())
    }

    fn update_property<E, F>(&self, id: PropertyId, apply: F) -> Result<Property, E>
    where
        F: FnOnce(&mut Property) -> Result<(), E>,
        E: From<RepositoryError>,
    {
        let mut tables = self.lock()?;
        let mut draft = tables
            .properties
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("property", id))?;
        apply(&mut draft)?;
        tables.properties.insert(id, draft.clone());
        Ok(draft)
    }

    fn remove_property(
        &self,
        id: PropertyId,
        purge_favorites: bool,
    ) -> Result<(Property, usize), RepositoryError> {
        let mut tables = self.lock()?;
        if !tables.properties.contains_key(&id) {
            return Err(RepositoryError::not_found("property", id));
        }
        if tables.has_active_advertisement(id) {
            return Err(RepositoryError::Referenced(format!(
                "property {id} has a pending or approved advertisement request"
            )));
        }
        let removed = tables
            .properties
            .remove(&id)
            .ok_or_else(|| RepositoryError::not_found("property", id))?;

        let mut purged = 0;
        if purge_favorites {
            let before = tables.favorites.len();
            tables.favorites.retain(|entry| entry.property_id != id);
            purged = before - tables.favorites.len();
        }
        Ok((removed, purged))
    }
}

impl AdvertisementRepository for MemoryStore {
    fn insert_advertisement(
        &self,
        draft: NewAdvertisementRequest,
    ) -> Result<AdvertisementRequest, RepositoryError> {
        let mut tables = self.lock()?;
        if !tables.properties.contains_key(&draft.property_id) {
            return Err(RepositoryError::not_found("property", draft.property_id));
        }
        if tables.has_active_advertisement(draft.property_id) {
            return Err(RepositoryError::Conflict(format!(
                "property {} already has a pending or approved advertisement request",
                draft.property_id
            )));
        }

        let id = AdvertisementId(tables.next_id());
        let request = AdvertisementRequest::from_draft(id, draft);
        tables.advertisements.insert(id, request.clone());
        Ok(request)
    }

    fn fetch_advertisement(
        &self,
        id: AdvertisementId,
    ) -> Result<Option<AdvertisementRequest>, RepositoryError> {
        Ok(self.lock()?.advertisements.get(&id).cloned())
    }

    fn advertisements(&self) -> Result<Vec<AdvertisementRequest>, RepositoryError> {
        Ok(self.lock()?.advertisements.values().cloned().collect())
    }

    fn update_advertisement<E, F>(
        &self,
        id: AdvertisementId,
        apply: F,
    ) -> Result<AdvertisementRequest, E>
    where
        F: FnOnce(&mut AdvertisementRequest) -> Result<(), E>,
        E: From<RepositoryError>,
    {
        let mut tables = self.lock()?;
        let mut draft = tables
            .advertisements
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("advertisement request", id))?;
        apply(&mut draft)?;
        tables.advertisements.insert(id, draft.clone());
        Ok(draft)
    }
}

impl FavoriteRepository for MemoryStore {
    fn toggle_favorite(
        &self,
        buyer_id: UserId,
        property_id: PropertyId,
        at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        let mut tables = self.lock()?;
        if !tables.properties.contains_key(&property_id) {
            return Err(RepositoryError::not_found("property", property_id));
        }

        let existing = tables
            .favorites
            .iter()
            .position(|entry| entry.buyer_id == buyer_id && entry.property_id == property_id);
        match existing {
            Some(index) => {
                tables.favorites.remove(index);
                Ok(false)
            }
            None => {
                tables.favorites.push(FavoriteEntry {
                    buyer_id,
                    property_id,
                    created_at: at,
                });
                Ok(true)
            }
        }
    }

    fn favorites_of(&self, buyer_id: UserId) -> Result<Vec<FavoriteEntry>, RepositoryError> {
        Ok(self
            .lock()?
            .favorites
            .iter()
            .filter(|entry| entry.buyer_id == buyer_id)
            .cloned()
            .collect())
    }
}

impl FeedbackRepository for MemoryStore {
    fn insert_feedback(
        &self,
        submission: FeedbackSubmission,
        created_at: DateTime<Utc>,
    ) -> Result<Feedback, RepositoryError> {
        let mut tables = self.lock()?;
        let id = FeedbackId(tables.next_id());
        let feedback = Feedback {
            id,
            name: submission.name,
            email: submission.email,
            message: submission.message,
            created_at,
        };
        tables.feedback.insert(id, feedback.clone());
        Ok(feedback)
    }

    fn feedback_entries(&self) -> Result<Vec<Feedback>, RepositoryError> {
        Ok(self.lock()?.feedback.values().cloned().collect())
    }
}
