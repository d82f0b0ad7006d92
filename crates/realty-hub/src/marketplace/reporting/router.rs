use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};

use super::filters::DashboardFilters;
use super::views::DashboardStats;
use crate::marketplace::error::MarketplaceError;
use crate::marketplace::http::{query_params, resolve_actor};
use crate::marketplace::repository::MarketplaceStore;
use crate::marketplace::Marketplace;

pub fn reporting_router<S>(marketplace: Arc<Marketplace<S>>) -> Router
where
    S: MarketplaceStore,
{
    Router::new()
        .route("/api/v1/admin/dashboard", get(dashboard_handler::<S>))
        .with_state(marketplace)
}

pub(crate) async fn dashboard_handler<S>(
    State(marketplace): State<Arc<Marketplace<S>>>,
    headers: HeaderMap,
    filters: Result<Query<DashboardFilters>, QueryRejection>,
) -> Result<Json<DashboardStats>, MarketplaceError>
where
    S: MarketplaceStore,
{
    let actor = resolve_actor(&marketplace.users, &headers)?;
    let filters = query_params(filters)?;
    marketplace
        .reporting
        .dashboard_stats(&actor, &filters)
        .map(Json)
}
