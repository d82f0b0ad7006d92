use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};

use super::{Feedback, FeedbackSubmission};
use crate::marketplace::error::MarketplaceError;
use crate::marketplace::http::{json_body, resolve_actor};
use crate::marketplace::repository::MarketplaceStore;
use crate::marketplace::Marketplace;

pub fn feedback_router<S>(marketplace: Arc<Marketplace<S>>) -> Router
where
    S: MarketplaceStore,
{
    Router::new()
        .route(
            "/api/v1/feedback",
            post(submit_handler::<S>).get(list_handler::<S>),
        )
        .with_state(marketplace)
}

pub(crate) async fn submit_handler<S>(
    State(marketplace): State<Arc<Marketplace<S>>>,
    payload: Result<Json<FeedbackSubmission>, JsonRejection>,
) -> Result<(StatusCode, Json<Feedback>), MarketplaceError>
where
    S: MarketplaceStore,
{
    let submission = json_body(payload)?;
    let feedback = marketplace.feedback.submit(submission)?;
    Ok((StatusCode::CREATED, Json(feedback)))
}

pub(crate) async fn list_handler<S>(
    State(marketplace): State<Arc<Marketplace<S>>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Feedback>>, MarketplaceError>
where
    S: MarketplaceStore,
{
    let actor = resolve_actor(&marketplace.users, &headers)?;
    marketplace.feedback.list(&actor).map(Json)
}
