use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use super::domain::{Property, PropertyAttributes, PropertyCriteria, PropertyId, PropertyStatus};
use crate::marketplace::error::MarketplaceError;
use crate::marketplace::http::{json_body, path_param, query_params, resolve_actor};
use crate::marketplace::identity::UserId;
use crate::marketplace::repository::MarketplaceStore;
use crate::marketplace::Marketplace;

#[derive(Debug, Deserialize)]
pub(crate) struct StatusChange {
    pub(crate) status: PropertyStatus,
}

/// Listing CRUD, status changes and the reservation flow.
pub fn property_router<S>(marketplace: Arc<Marketplace<S>>) -> Router
where
    S: MarketplaceStore,
{
    Router::new()
        .route(
            "/api/v1/properties",
            post(create_handler::<S>).get(list_handler::<S>),
        )
        .route(
            "/api/v1/properties/:property_id",
            get(get_handler::<S>)
                .put(update_handler::<S>)
                .delete(delete_handler::<S>),
        )
        .route(
            "/api/v1/properties/:property_id/status",
            post(status_handler::<S>),
        )
        .route(
            "/api/v1/properties/:property_id/reserve",
            post(reserve_handler::<S>),
        )
        .route(
            "/api/v1/properties/:property_id/complete",
            post(complete_handler::<S>),
        )
        .route(
            "/api/v1/properties/:property_id/cancel",
            post(cancel_handler::<S>),
        )
        .route(
            "/api/v1/sellers/:seller_id/properties",
            get(owner_handler::<S>),
        )
        .route(
            "/api/v1/buyers/:buyer_id/purchases",
            get(purchases_handler::<S>),
        )
        .with_state(marketplace)
}

pub(crate) async fn create_handler<S>(
    State(marketplace): State<Arc<Marketplace<S>>>,
    headers: HeaderMap,
    payload: Result<Json<PropertyAttributes>, JsonRejection>,
) -> Result<(StatusCode, Json<Property>), MarketplaceError>
where
    S: MarketplaceStore,
{
    let actor = resolve_actor(&marketplace.users, &headers)?;
    let attributes = json_body(payload)?;
    let property = marketplace.properties.create(&actor, attributes)?;
    Ok((StatusCode::CREATED, Json(property)))
}

pub(crate) async fn list_handler<S>(
    State(marketplace): State<Arc<Marketplace<S>>>,
    criteria: Result<Query<PropertyCriteria>, QueryRejection>,
) -> Result<Json<Vec<Property>>, MarketplaceError>
where
    S: MarketplaceStore,
{
    let criteria = query_params(criteria)?;
    marketplace.properties.list_filtered(&criteria).map(Json)
}

pub(crate) async fn get_handler<S>(
    State(marketplace): State<Arc<Marketplace<S>>>,
    property_id: Result<Path<u64>, PathRejection>,
) -> Result<Json<Property>, MarketplaceError>
where
    S: MarketplaceStore,
{
    let property_id = path_param(property_id)?;
    marketplace.properties.get(PropertyId(property_id)).map(Json)
}

pub(crate) async fn update_handler<S>(
    State(marketplace): State<Arc<Marketplace<S>>>,
    headers: HeaderMap,
    property_id: Result<Path<u64>, PathRejection>,
    payload: Result<Json<PropertyAttributes>, JsonRejection>,
) -> Result<Json<Property>, MarketplaceError>
where
    S: MarketplaceStore,
{
    let property_id = path_param(property_id)?;
    let actor = resolve_actor(&marketplace.users, &headers)?;
    let attributes = json_body(payload)?;
    marketplace
        .properties
        .update(&actor, PropertyId(property_id), attributes)
        .map(Json)
}

pub(crate) async fn delete_handler<S>(
    State(marketplace): State<Arc<Marketplace<S>>>,
    headers: HeaderMap,
    property_id: Result<Path<u64>, PathRejection>,
) -> Result<StatusCode, MarketplaceError>
where
    S: MarketplaceStore,
{
    let property_id = path_param(property_id)?;
    let actor = resolve_actor(&marketplace.users, &headers)?;
    marketplace
        .properties
        .delete(&actor, PropertyId(property_id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn status_handler<S>(
    State(marketplace): State<Arc<Marketplace<S>>>,
    headers: HeaderMap,
    property_id: Result<Path<u64>, PathRejection>,
    payload: Result<Json<StatusChange>, JsonRejection>,
) -> Result<Json<Property>, MarketplaceError>
where
    S: MarketplaceStore,
{
    let property_id = path_param(property_id)?;
    let actor = resolve_actor(&marketplace.users, &headers)?;
    let change = json_body(payload)?;
    marketplace
        .properties
        .set_status(&actor, PropertyId(property_id), change.status)
        .map(Json)
}

pub(crate) async fn reserve_handler<S>(
    State(marketplace): State<Arc<Marketplace<S>>>,
    headers: HeaderMap,
    property_id: Result<Path<u64>, PathRejection>,
) -> Result<Json<Property>, MarketplaceError>
where
    S: MarketplaceStore,
{
    let property_id = path_param(property_id)?;
    let actor = resolve_actor(&marketplace.users, &headers)?;
    marketplace
        .properties
        .reserve(&actor, PropertyId(property_id))
        .map(Json)
}

pub(crate) async fn complete_handler<S>(
    State(marketplace): State<Arc<Marketplace<S>>>,
    headers: HeaderMap,
    property_id: Result<Path<u64>, PathRejection>,
) -> Result<Json<Property>, MarketplaceError>
where
    S: MarketplaceStore,
{
    let property_id = path_param(property_id)?;
    let actor = resolve_actor(&marketplace.users, &headers)?;
    marketplace
        .properties
        .complete_sale(&actor, PropertyId(property_id))
        .map(Json)
}

pub(crate) async fn cancel_handler<S>(
    State(marketplace): State<Arc<Marketplace<S>>>,
    headers: HeaderMap,
    property_id: Result<Path<u64>, PathRejection>,
) -> Result<Json<Property>, MarketplaceError>
where
    S: MarketplaceStore,
{
    let property_id = path_param(property_id)?;
    let actor = resolve_actor(&marketplace.users, &headers)?;
    marketplace
        .properties
        .cancel_reservation(&actor, PropertyId(property_id))
        .map(Json)
}

pub(crate) async fn owner_handler<S>(
    State(marketplace): State<Arc<Marketplace<S>>>,
    seller_id: Result<Path<u64>, PathRejection>,
) -> Result<Json<Vec<Property>>, MarketplaceError>
where
    S: MarketplaceStore,
{
    let seller_id = path_param(seller_id)?;
    marketplace
        .properties
        .list_by_owner(UserId(seller_id))
        .map(Json)
}

pub(crate) async fn purchases_handler<S>(
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
    actor.require_self_or_admin(buyer_id, "view another buyer's purchases")?;
    marketplace.properties.list_purchased(buyer_id).map(Json)
}
