//! Bearer-session authentication extractors and access checks

use axum::async_trait;
use axum::extract::{FromRequestParts, Query};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use serde::Deserialize;

use crate::api::error::{ApiError, ApiResult};
use crate::api::routes::AppState;
use crate::db::models::User;
use crate::subscription::{effective_capabilities, require, AccessState, Capability};

/// Token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Authenticated user; rejects with 401
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

/// User when a valid token is present
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

async fn resolve(parts: &Parts, state: &AppState) -> ApiResult<Option<User>> {
    match bearer_token(&parts.headers) {
        Some(token) => Ok(state.auth.authenticate(state.db.pool(), token).await?),
        None => Ok(None),
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if bearer_token(&parts.headers).is_none() {
            return Err(ApiError::Unauthorized("Missing bearer token".to_string()));
        }
        resolve(parts, state)
            .await?
            .map(AuthUser)
            .ok_or_else(|| ApiError::Unauthorized("Invalid or expired session".to_string()))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(resolve(parts, state).await?))
    }
}

pub fn require_admin(user: &User) -> ApiResult<()> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Administrator role required".to_string()))
    }
}

/// Check that the user's subscription grants `capability`
///
/// Administrators are never gated. Fails with 402 otherwise.
pub async fn require_capability(
    state: &AppState,
    user: &User,
    capability: Capability,
) -> ApiResult<AccessState> {
    let access = state
        .subscriptions
        .access_state(state.db.pool(), &user.id, chrono::Utc::now())
        .await?;
    if user.is_admin() {
        return Ok(access);
    }
    require(access, capability)?;
    Ok(access)
}

#[derive(Debug, Default, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// Token from the `Authorization` header, else from `?token=`
///
/// Browsers cannot set headers on a WebSocket handshake.
pub fn handshake_token(parts: &Parts) -> Option<String> {
    if let Some(token) = bearer_token(&parts.headers) {
        return Some(token.to_string());
    }
    Query::<TokenQuery>::try_from_uri(&parts.uri)
        .ok()
        .and_then(|Query(query)| query.token)
        .filter(|token| !token.trim().is_empty())
}

/// WebSocket client entitled to real-time updates
///
/// Rejects with 401 without a valid session and 402 when the plan lacks
/// `realtime_updates`. Runs before the upgrade.
#[derive(Debug, Clone)]
pub struct RealtimeClient {
    pub user: User,
    /// Whether `port_proximity` events may be forwarded
    pub port_insights: bool,
}

impl RealtimeClient {
    pub fn new(user: User, access: AccessState) -> Self {
        let port_insights = user.is_admin() || effective_capabilities(access).port_insights;
        Self { user, port_insights }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for RealtimeClient {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = handshake_token(parts)
            .ok_or_else(|| ApiError::Unauthorized("Missing session token".to_string()))?;
        let user = state
            .auth
            .authenticate(state.db.pool(), &token)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("Invalid or expired session".to_string()))?;

        let access = require_capability(state, &user, Capability::RealtimeUpdates).await?;
        Ok(RealtimeClient::new(user, access))
    }
}
