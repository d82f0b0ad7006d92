use std::fmt::Display;
use std::str::FromStr;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Deserializer};

use super::error::MarketplaceError;
use super::identity::{Actor, UserId};
use super::repository::UserRepository;
use super::users::UserDirectory;

/// Header carrying the acting user's id on every authenticated request.
pub const ACTOR_HEADER: &str = "x-actor-id";

pub(crate) fn resolve_actor<S>(
    users: &UserDirectory<S>,
    headers: &HeaderMap,
) -> Result<Actor, MarketplaceError>
where
    S: UserRepository,
{
    let raw = headers.get(ACTOR_HEADER).ok_or_else(|| {
        MarketplaceError::Unauthenticated(format!("missing {ACTOR_HEADER} header"))
    })?;

    let id = raw
        .to_str()
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .ok_or_else(|| {
            MarketplaceError::Unauthenticated(format!("{ACTOR_HEADER} must be a numeric user id"))
        })?;

    users.resolve(UserId(id)).map_err(|err| match err {
        MarketplaceError::NotFound { .. } => {
            MarketplaceError::Unauthenticated(format!("unknown actor {id}"))
        }
        other => other,
    })
}

/// Unwraps a JSON body, reporting malformed payloads as validation errors.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, MarketplaceError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| MarketplaceError::validation(rejection.body_text()))
}

pub(crate) fn query_params<T>(
    params: Result<Query<T>, QueryRejection>,
) -> Result<T, MarketplaceError> {
    params
        .map(|Query(value)| value)
        .map_err(|rejection| MarketplaceError::validation(rejection.body_text()))
}

/// Unwraps a path segment; a non-numeric id is a validation error, not a plain-text 400.
pub(crate) fn path_param<T>(
    segment: Result<Path<T>, PathRejection>,
) -> Result<T, MarketplaceError> {
    segment
        .map(|Path(value)| value)
        .map_err(|rejection| MarketplaceError::validation(rejection.body_text()))
}

/// Treats missing and blank query values alike so empty form fields impose no constraint.
pub(crate) fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
