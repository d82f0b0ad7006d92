use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use super::domain::{
    AdvertisementId, AdvertisementOverview, AdvertisementRequest, AdvertisementSubmission,
    FeaturedListing, ModerationDecision,
};
use crate::marketplace::error::MarketplaceError;
use crate::marketplace::http::{json_body, path_param, resolve_actor};
use crate::marketplace::identity::UserId;
use crate::marketplace::properties::PropertyId;
use crate::marketplace::repository::MarketplaceStore;
use crate::marketplace::Marketplace;

#[derive(Debug, Deserialize)]
pub(crate) struct DecisionPayload {
    pub(crate) decision: ModerationDecision,
}

/// Submission, moderation and the public feed of approved advertisements.
pub fn advertisement_router<S>(marketplace: Arc<Marketplace<S>>) -> Router
where
    S: MarketplaceStore,
{
    Router::new()
        .route(
            "/api/v1/advertisements",
            post(submit_handler::<S>).get(list_handler::<S>),
        )
        .route("/api/v1/advertisements/active", get(feed_handler::<S>))
        .route(
            "/api/v1/advertisements/:request_id",
            get(get_handler::<S>),
        )
        .route(
            "/api/v1/advertisements/:request_id/decision",
            post(decide_handler::<S>),
        )
        .route(
            "/api/v1/properties/:property_id/advertisement",
            get(overview_handler::<S>),
        )
        .route(
            "/api/v1/sellers/:seller_id/advertisements",
            get(seller_handler::<S>),
        )
        .with_state(marketplace)
}

pub(crate) async fn submit_handler<S>(
    State(marketplace): State<Arc<Marketplace<S>>>,
    headers: HeaderMap,
    payload: Result<Json<AdvertisementSubmission>, JsonRejection>,
) -> Result<(StatusCode, Json<AdvertisementRequest>), MarketplaceError>
where
    S: MarketplaceStore,
{
    let actor = resolve_actor(&marketplace.users, &headers)?;
    let submission = json_body(payload)?;
    let request = marketplace.advertisements.submit(&actor, submission)?;
    Ok((StatusCode::CREATED, Json(request)))
}

pub(crate) async fn list_handler<S>(
    State(marketplace): State<Arc<Marketplace<S>>>,
    headers: HeaderMap,
) -> Result<Json<Vec<AdvertisementRequest>>, MarketplaceError>
where
    S: MarketplaceStore,
{
    let actor = resolve_actor(&marketplace.users, &headers)?;
    marketplace.advertisements.list_all(&actor).map(Json)
}

pub(crate) async fn feed_handler<S>(
    State(marketplace): State<Arc<Marketplace<S>>>,
) -> Result<Json<Vec<FeaturedListing>>, MarketplaceError>
where
    S: MarketplaceStore,
{
    marketplace.feed.active_feed().map(Json)
}

pub(crate) async fn get_handler<S>(
    State(marketplace): State<Arc<Marketplace<S>>>,
    request_id: Result<Path<u64>, PathRejection>,
) -> Result<Json<AdvertisementRequest>, MarketplaceError>
where
    S: MarketplaceStore,
{
    let request_id = path_param(request_id)?;
    marketplace
        .advertisements
        .get(AdvertisementId(request_id))
        .map(Json)
}

pub(crate) async fn decide_handler<S>(
    State(marketplace): State<Arc<Marketplace<S>>>,
    headers: HeaderMap,
    request_id: Result<Path<u64>, PathRejection>,
    payload: Result<Json<DecisionPayload>, JsonRejection>,
) -> Result<Json<AdvertisementRequest>, MarketplaceError>
where
    S: MarketplaceStore,
{
    let request_id = path_param(request_id)?;
    let actor = resolve_actor(&marketplace.users, &headers)?;
    let payload = json_body(payload)?;
    marketplace
        .advertisements
        .decide(&actor, AdvertisementId(request_id), payload.decision)
        .map(Json)
}

pub(crate) async fn overview_handler<S>(
    State(marketplace): State<Arc<Marketplace<S>>>,
    property_id: Result<Path<u64>, PathRejection>,
) -> Result<Json<AdvertisementOverview>, MarketplaceError>
where
    S: MarketplaceStore,
{
    let property_id = path_param(property_id)?;
    let property_id = PropertyId(property_id);
    marketplace.properties.get(property_id)?;

    let status = marketplace.advertisements.status_for_property(property_id)?;
    let action = marketplace.advertisements.advertising_action(property_id)?;
    Ok(Json(AdvertisementOverview {
        property_id,
        status,
        action,
    }))
}

pub(crate) async fn seller_handler<S>(
    State(marketplace): State<Arc<Marketplace<S>>>,
    seller_id: Result<Path<u64>, PathRejection>,
) -> Result<Json<Vec<AdvertisementRequest>>, MarketplaceError>
where
    S: MarketplaceStore,
{
    let seller_id = path_param(seller_id)?;
    marketplace
        .advertisements
        .list_by_seller(UserId(seller_id))
        .map(Json)
}
