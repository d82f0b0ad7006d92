use std::sync::Arc;

use tracing::{debug, info};

use super::domain::{
    NewProperty, Property, PropertyAttributes, PropertyCriteria, PropertyId, PropertyStatus,
};
use crate::config::FavoritesCleanup;
use crate::marketplace::clock::Clock;
use crate::marketplace::error::MarketplaceError;
use crate::marketplace::identity::{Actor, Role, UserId};
use crate::marketplace::repository::PropertyRepository;

/// Owns property records and the status lifecycle available → pending → sold.
pub struct PropertyRegistry<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    favorites_cleanup: FavoritesCleanup,
}

impl<S> PropertyRegistry<S>
where
    S: PropertyRepository,
{
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>, favorites_cleanup: FavoritesCleanup) -> Self {
        Self {
            store,
            clock,
            favorites_cleanup,
        }
    }

    /// List a new property for the acting seller. Starts out `available`.
    pub fn create(
        &self,
        actor: &Actor,
        attributes: PropertyAttributes,
    ) -> Result<Property, MarketplaceError> {
        actor.require(Role::Seller, "list a property")?;
        attributes.validate()?;

        let property = self.store.insert_property(NewProperty {
            owner_id: actor.user_id,
            attributes,
            created_at: self.clock.now(),
        })?;

        info!(
            property_id = %property.id,
            owner_id = %property.owner_id,
            "property listed"
        );
        Ok(property)
    }

    pub fn get(&self, id: PropertyId) -> Result<Property, MarketplaceError> {
        self.store
            .fetch_property(id)?
            .ok_or_else(|| MarketplaceError::not_found("property", id))
    }

    /// Properties matching every present criterion, newest first.
    pub fn list_filtered(
        &self,
        criteria: &PropertyCriteria,
    ) -> Result<Vec<Property>, MarketplaceError> {
        criteria.validate()?;
        self.collect(|property| criteria.matches(property))
    }

    pub fn list_by_owner(&self, owner_id: UserId) -> Result<Vec<Property>, MarketplaceError> {
        self.collect(|property| property.is_owned_by(owner_id))
    }

    /// Properties the buyer has reserved or bought.
    pub fn list_purchased(&self, buyer_id: UserId) -> Result<Vec<Property>, MarketplaceError> {
        self.collect(|property| {
            property.buyer_id == Some(buyer_id) && property.status != PropertyStatus::Available
        })
    }

    /// Replace the seller-editable attributes. Status is never touched here.
    pub fn update(
        &self,
        actor: &Actor,
        id: PropertyId,
        attributes: PropertyAttributes,
    ) -> Result<Property, MarketplaceError> {
        attributes.validate()?;
        let now = self.clock.now();

        self.store.update_property(id, |property| {
            if !property.is_owned_by(actor.user_id) {
                return Err(forbidden(actor, property, "edit"));
            }
            property.attributes = attributes;
            property.updated_at = now;
            Ok(())
        })
    }

    /// Direct status change by the owner or an admin, checked against the transition table.
    pub fn set_status(
        &self,
        actor: &Actor,
        id: PropertyId,
        next: PropertyStatus,
    ) -> Result<Property, MarketplaceError> {
        let now = self.clock.now();
        let updated = self
            .store
            .update_property(id, |property| {
                ensure_can_manage(actor, property, "change the status of")?;
                property.transition(next, now)
            })
            .inspect_err(|err| debug!(property_id = %id, %err, "status change rejected"))?;

        info!(property_id = %id, status = next.label(), "property status changed");
        Ok(updated)
    }

    /// A buyer places a hold on an available property.
    pub fn reserve(&self, actor: &Actor, id: PropertyId) -> Result<Property, MarketplaceError> {
        actor.require(Role::Buyer, "reserve a property")?;
        let now = self.clock.now();

        let updated = self.store.update_property(id, |property| -> Result<(), MarketplaceError> {
            property.transition(PropertyStatus::Pending, now)?;
            property.buyer_id = Some(actor.user_id);
            Ok(())
        })?;

        info!(property_id = %id, buyer_id = %actor.user_id, "property reserved");
        Ok(updated)
    }

    /// The owner (or an admin) closes a pending reservation.
    pub fn complete_sale(
        &self,
        actor: &Actor,
        id: PropertyId,
    ) -> Result<Property, MarketplaceError> {
        let now = self.clock.now();

        let updated = self.store.update_property(id, |property| {
            ensure_can_manage(actor, property, "complete the sale of")?;
            require_reservation(property, PropertyStatus::Sold)?;
            property.transition(PropertyStatus::Sold, now)
        })?;

        info!(property_id = %id, buyer_id = ?updated.buyer_id, "property sold");
        Ok(updated)
    }

    /// Releases a pending reservation. Allowed for the reserving buyer, the owner, or an admin.
    pub fn cancel_reservation(
        &self,
        actor: &Actor,
        id: PropertyId,
    ) -> Result<Property, MarketplaceError> {
        let now = self.clock.now();

        let updated = self.store.update_property(id, |property| {
            let is_holder = property.buyer_id == Some(actor.user_id);
            if !is_holder {
                ensure_can_manage(actor, property, "cancel the reservation on")?;
            }
            require_reservation(property, PropertyStatus::Available)?;
            property.transition(PropertyStatus::Available, now)
        })?;

        info!(property_id = %id, "reservation cancelled");
        Ok(updated)
    }

    /// Remove a listing. Refused while a pending or approved advertisement request
    /// references it.
    pub fn delete(&self, actor: &Actor, id: PropertyId) -> Result<Property, MarketplaceError> {
        let property = self.get(id)?;
        ensure_can_manage(actor, &property, "delete")?;

        let eager = self.favorites_cleanup == FavoritesCleanup::Eager;
        let (removed, purged) = self.store.remove_property(id, eager)?;
        if eager {
            debug!(property_id = %id, purged, "favorites purged");
        }

        info!(property_id = %id, "property deleted");
        Ok(removed)
    }

    fn collect<F>(&self, keep: F) -> Result<Vec<Property>, MarketplaceError>
    where
        F: Fn(&Property) -> bool,
    {
        let mut properties: Vec<Property> = self
            .store
            .properties()?
            .into_iter()
            .filter(|property| keep(property))
            .collect();
        properties.sort_by_key(Property::recency_key);
        Ok(properties)
    }
}

fn ensure_can_manage(
    actor: &Actor,
    property: &Property,
    action: &str,
) -> Result<(), MarketplaceError> {
    if actor.is(Role::Admin) || (actor.is(Role::Seller) && property.is_owned_by(actor.user_id)) {
        Ok(())
    } else {
        Err(forbidden(actor, property, action))
    }
}

fn forbidden(actor: &Actor, property: &Property, action: &str) -> MarketplaceError {
    MarketplaceError::Forbidden(format!(
        "{} {} cannot {action} property {} owned by {}",
        actor.role.label(),
        actor.user_id,
        property.id,
        property.owner_id
    ))
}

fn require_reservation(property: &Property, next: PropertyStatus) -> Result<(), MarketplaceError> {
    if property.status == PropertyStatus::Pending {
        Ok(())
    } else {
        Err(MarketplaceError::InvalidTransition {
            entity: "reservation",
            from: property.status.label(),
            to: next.label(),
        })
    }
}
