use std::sync::Arc;

use tracing::info;

use super::domain::{User, UserRegistration};
use crate::marketplace::clock::Clock;
use crate::marketplace::error::MarketplaceError;
use crate::marketplace::identity::{Actor, Role, UserId};
use crate::marketplace::repository::UserRepository;

/// Registers users and resolves the acting identity for engine calls.
pub struct UserDirectory<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S> UserDirectory<S>
where
    S: UserRepository,
{
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn register(&self, registration: UserRegistration) -> Result<User, MarketplaceError> {
        let registration = registration.normalized()?;
        let user = self
            .store
            .insert_user(registration, self.clock.now())?;
        info!(user_id = %user.id, role = user.role.label(), "user registered");
        Ok(user)
    }

    pub fn get(&self, id: UserId) -> Result<User, MarketplaceError> {
        self.store
            .fetch_user(id)?
            .ok_or_else(|| MarketplaceError::not_found("user", id))
    }

    /// Looks up the stored role for `id`; this is the only way actors are minted from
    /// untrusted input.
    pub fn resolve(&self, id: UserId) -> Result<Actor, MarketplaceError> {
        self.get(id).map(|user| user.actor())
    }

    /// All users, oldest first. Admin only.
    pub fn list(&self, actor: &Actor) -> Result<Vec<User>, MarketplaceError> {
        actor.require(Role::Admin, "list users")?;
        let mut users = self.store.users()?;
        users.sort_by_key(|user| (user.created_at, user.id));
        Ok(users)
    }
}
