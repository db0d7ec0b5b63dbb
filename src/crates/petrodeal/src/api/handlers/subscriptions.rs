//! Plan catalogue and subscription lifecycle handlers

use axum::{extract::State, Json};
use chrono::Utc;

use crate::api::{
    error::ApiResult,
    middleware::AuthUser,
    models::{ChangePlanRequest, SubscriptionResponse},
    response,
    routes::AppState,
};
use crate::subscription::{evaluate_access, plan_catalogue};

/// Available plans and what they grant
///
/// GET /api/v1/plans
pub async fn list_plans() -> impl axum::response::IntoResponse {
    response::ok(plan_catalogue())
}

/// Start the free trial
///
/// POST /api/v1/subscriptions/trial
pub async fn start_trial(
    State(app_state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ApiResult<impl axum::response::IntoResponse> {
    let now = Utc::now();
    let subscription = app_state
        .subscriptions
        .start_trial(app_state.db.pool(), &user.id, now)
        .await?;

    let access = evaluate_access(Some(&subscription), now);
    Ok(response::created(SubscriptionResponse::new(Some(subscription), access)))
}

/// Current subscription, access state and capabilities
///
/// GET /api/v1/subscriptions/me
pub async fn my_subscription(
    State(app_state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ApiResult<impl axum::response::IntoResponse> {
    let (subscription, access) = app_state
        .subscriptions
        .current(app_state.db.pool(), &user.id, Utc::now())
        .await?;

    Ok(response::ok(SubscriptionResponse::new(subscription, access)))
}

/// Move onto a paid plan
///
/// POST /api/v1/subscriptions/me/plan
pub async fn change_plan(
    State(app_state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<ChangePlanRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let plan = req.plan()?;
    let now = Utc::now();

    let subscription = app_state
        .subscriptions
        .change_plan(app_state.db.pool(), &user.id, plan, now)
        .await?;

    let access = evaluate_access(Some(&subscription), now);
    Ok(response::ok(SubscriptionResponse::new(Some(subscription), access)))
}

/// Cancel; access lasts until the current period ends
///
/// POST /api/v1/subscriptions/me/cancel
pub async fn cancel_subscription(
    State(app_state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ApiResult<impl axum::response::IntoResponse> {
    let now = Utc::now();
    let subscription = app_state
        .subscriptions
        .cancel(app_state.db.pool(), &user.id, now)
        .await?;

    let access = evaluate_access(Some(&subscription), now);
    Ok(response::ok(SubscriptionResponse::new(Some(subscription), access)))
}
