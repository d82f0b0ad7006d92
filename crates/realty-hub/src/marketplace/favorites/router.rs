use std::sync::Arc;

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};

use super::ToggleOutcome;
use crate::marketplace::error::MarketplaceError;
use crate::marketplace::http::{path_param, resolve_actor};
use crate::marketplace::identity::UserId;
use crate::marketplace::properties::{Property, PropertyId};
use crate::marketplace::repository::MarketplaceStore;
use crate::marketplace::Marketplace;

pub fn favorites_router<S>(marketplace: Arc<Marketplace<S>>) -> Router
where
    S: MarketplaceStore,
{
    Router::new()
        .route(
            "/api/v1/favorites/:property_id/toggle",
            post(toggle_handler::<S>),
        )
        .route(
            "/api/v1/buyers/:buyer_id/favorites",
            get(list_handler::<S>),
        )
        .with_state(marketplace)
}

pub(crate) async fn toggle_handler<S>(
    State(marketplace): State<Arc<Marketplace<S>>>,
    headers: HeaderMap,
    property_id: Result<Path<u64>, PathRejection>,
) -> Result<Json<ToggleOutcome>, MarketplaceError>
where
    S: MarketplaceStore,
{
    let property_id = path_param(property_id)?;
    let actor = resolve_actor(&marketplace.users, &headers)?;
    marketplace
        .favorites
        .toggle(&actor, PropertyId(property_id))
        .map(Json)
}

pub(crate) async fn list_handler<S>(
    State(marketplace): State<Arc<Marketplace<S>>>,
    headers: HeaderMap,
    buyer_id: Result<Path<u64>, PathRejection>,
) -> Result<Json<Vec<Property>>, MarketplaceError>
where
    S: MarketplaceStore,
{
    let buyer_id = path_param(buyer_id)?;
    let actor = resolve_actor(&marketplace.users, &headers)?;
    let buyer_id = UserId(buyer_id);
    actor.require_self_or_admin(buyer_id, "view another buyer's favourites")?;
    marketplace.favorites.list(buyer_id).map(Json)
}
