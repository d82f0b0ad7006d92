use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{
    AdvertisementId, AdvertisementRequest, AdvertisementStatus, AdvertisementSubmission,
    AdvertisingAction, ModerationDecision, NewAdvertisementRequest,
};
use crate::marketplace::clock::Clock;
use crate::marketplace::error::MarketplaceError;
use crate::marketplace::identity::{Actor, Role, UserId};
use crate::marketplace::properties::PropertyId;
use crate::marketplace::repository::{AdvertisementRepository, PropertyRepository};

/// Seller submissions and employee moderation of advertisement requests.
pub struct AdvertisementPipeline<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S> AdvertisementPipeline<S>
where
    S: AdvertisementRepository + PropertyRepository,
{
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Files a pending request for a property the seller owns. At most one pending or
    /// approved request may exist per property; a rejected one can be retried.
    pub fn submit(
        &self,
        actor: &Actor,
        submission: AdvertisementSubmission,
    ) -> Result<AdvertisementRequest, MarketplaceError> {
        actor.require(Role::Seller, "request an advertisement")?;
        let currency = submission.validate()?;

        let property_id = submission.property_id;
        let property = self
            .store
            .fetch_property(property_id)?
            .ok_or_else(|| MarketplaceError::not_found("property", property_id))?;
        if !property.is_owned_by(actor.user_id) {
            return Err(MarketplaceError::Forbidden(format!(
                "seller {} does not own property {property_id}",
                actor.user_id
            )));
        }

        let request = self
            .store
            .insert_advertisement(NewAdvertisementRequest {
                property_id,
                seller_id: actor.user_id,
                amount: submission.amount,
                currency,
                title: property.attributes.title,
                created_at: self.clock.now(),
            })
            .inspect_err(|err| {
                warn!(property_id = %property_id, %err, "advertisement request refused")
            })?;

        info!(
            request_id = %request.id,
            property_id = %property_id,
            seller_id = %actor.user_id,
            "advertisement requested"
        );
        Ok(request)
    }

    /// Approves or rejects a pending request. Property status is left alone.
    pub fn decide(
        &self,
        actor: &Actor,
        id: AdvertisementId,
        decision: ModerationDecision,
    ) -> Result<AdvertisementRequest, MarketplaceError> {
        actor.require(Role::Employee, "moderate advertisement requests")?;
        let now = self.clock.now();

        let decided = self
            .store
            .update_advertisement(id, |request| request.decide(decision, actor.user_id, now))
            .inspect_err(|err| warn!(request_id = %id, %err, "moderation refused"))?;

        info!(
            request_id = %id,
            status = decided.status.label(),
            employee_id = %actor.user_id,
            "advertisement decided"
        );
        Ok(decided)
    }

    pub fn get(&self, id: AdvertisementId) -> Result<AdvertisementRequest, MarketplaceError> {
        self.store
            .fetch_advertisement(id)?
            .ok_or_else(|| MarketplaceError::not_found("advertisement request", id))
    }

    /// Status of the property's pending or approved request, if any.
    pub fn status_for_property(
        &self,
        property_id: PropertyId,
    ) -> Result<Option<AdvertisementStatus>, MarketplaceError> {
        Ok(self
            .list_for_property(property_id)?
            .into_iter()
            .map(|request| request.status)
            .find(|status| status.is_active()))
    }

    pub fn advertising_action(
        &self,
        property_id: PropertyId,
    ) -> Result<AdvertisingAction, MarketplaceError> {
        let history = self.list_for_property(property_id)?;
        Ok(AdvertisingAction::from_history(&history))
    }

    /// Every request ever filed for the property, newest first.
    pub fn list_for_property(
        &self,
        property_id: PropertyId,
    ) -> Result<Vec<AdvertisementRequest>, MarketplaceError> {
        self.collect(|request| request.property_id == property_id)
    }

    /// The seller's requests including rejected history, newest first.
    pub fn list_by_seller(
        &self,
        seller_id: UserId,
    ) -> Result<Vec<AdvertisementRequest>, MarketplaceError> {
        self.collect(|request| request.seller_id == seller_id)
    }

    pub fn list_all(&self, actor: &Actor) -> Result<Vec<AdvertisementRequest>, MarketplaceError> {
        actor.require_any(&[Role::Employee, Role::Admin], "list advertisement requests")?;
        self.collect(|_| true)
    }

    fn collect<F>(&self, keep: F) -> Result<Vec<AdvertisementRequest>, MarketplaceError>
    where
        F: Fn(&AdvertisementRequest) -> bool,
    {
        let mut requests: Vec<AdvertisementRequest> = self
            .store
            .advertisements()?
            .into_iter()
            .filter(|request| keep(request))
            .collect();
        requests.sort_by_key(AdvertisementRequest::recency_key);
        Ok(requests)
    }
}
