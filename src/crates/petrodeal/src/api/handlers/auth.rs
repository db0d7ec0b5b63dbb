//! Account registration and session handlers

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};

use crate::api::{
    error::{ApiError, ApiResult},
    middleware::{bearer_token, AuthUser},
    models::{LoginRequest, LoginResponse, RegisterRequest},
    response,
    routes::AppState,
};

/// Register a new account
///
/// POST /api/v1/auth/register
pub async fn register(
    State(app_state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    req.validate()?;

    let user = app_state
        .auth
        .register(app_state.db.pool(), req.into_registration())
        .await?;

    Ok(response::created(user))
}

/// Exchange credentials for a bearer token
///
/// POST /api/v1/auth/login
pub async fn login(
    State(app_state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    req.validate()?;

    let (session, user) = app_state
        .auth
        .login(app_state.db.pool(), req.login.trim(), &req.password)
        .await?;

    Ok(response::ok(LoginResponse {
        token: session.id,
        token_type: "Bearer".to_string(),
        expires_at: session.expires_at,
        user,
    }))
}

/// End the current session
///
/// POST /api/v1/auth/logout
pub async fn logout(
    State(app_state): State<AppState>,
    AuthUser(user): AuthUser,
    headers: HeaderMap,
) -> ApiResult<impl axum::response::IntoResponse> {
    let token = bearer_token(&headers)
        .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;

    app_state.auth.logout(app_state.db.pool(), token).await?;

    tracing::info!(user_id = %user.id, "User {} logged out", user.username);
    Ok(StatusCode::NO_CONTENT)
}

/// The authenticated user
///
/// GET /api/v1/auth/me
pub async fn me(AuthUser(user): AuthUser) -> impl axum::response::IntoResponse {
    response::ok(user)
}
