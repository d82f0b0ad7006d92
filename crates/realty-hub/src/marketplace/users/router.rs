use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};

use super::domain::{User, UserRegistration};
use crate::marketplace::error::MarketplaceError;
use crate::marketplace::http::{json_body, resolve_actor};
use crate::marketplace::repository::MarketplaceStore;
use crate::marketplace::Marketplace;

/// Registration is public; listing is for admins.
pub fn user_router<S>(marketplace: Arc<Marketplace<S>>) -> Router
where
    S: MarketplaceStore,
{
    Router::new()
        .route(
            "/api/v1/users",
            post(register_handler::<S>).get(list_handler::<S>),
        )
        .with_state(marketplace)
}

pub(crate) async fn register_handler<S>(
    State(marketplace): State<Arc<Marketplace<S>>>,
    payload: Result<Json<UserRegistration>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), MarketplaceError>
where
    S: MarketplaceStore,
{
    let registration = json_body(payload)?;
    let user = marketplace.users.register(registration)?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub(crate) async fn list_handler<S>(
    State(marketplace): State<Arc<Marketplace<S>>>,
    headers: HeaderMap,
) -> Result<Json<Vec<User>>, MarketplaceError>
where
    S: MarketplaceStore,
{
    let actor = resolve_actor(&marketplace.users, &headers)?;
    marketplace.users.list(&actor).map(Json)
}
