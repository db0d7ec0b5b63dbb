//! Refinery endpoint handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::api::{
    error::{ApiError, ApiResult},
    handlers::{paginate, page_params, resolve_radius},
    middleware::{require_admin, require_capability, validation::validate_uuid, AuthUser},
    models::{
        CreateRefineryRequest, NearbyQuery, NearbyVesselsResponse, ReferenceListQuery,
        UpdateRefineryRequest,
    },
    response,
    routes::AppState,
};
use crate::db::repositories::{RefineryRepository, VesselRepository};
use crate::geo::find_nearby;
use crate::subscription::Capability;

/// List refineries with filtering and pagination
///
/// GET /api/v1/refineries
pub async fn list_refineries(
    State(app_state): State<AppState>,
    Query(query): Query<ReferenceListQuery>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let (page, per_page) = page_params(query.page, query.per_page)?;

    let refineries = RefineryRepository::list(app_state.db.pool()).await?;
    let filtered: Vec<_> = refineries
        .into_iter()
        .filter(|r| query.matches(&r.name, Some(&r.country), Some(&r.region)))
        .collect();

    let (data, total) = paginate(filtered, page, per_page);
    Ok(response::paginated(data, page, per_page, total))
}

/// Get a single refinery by ID
///
/// GET /api/v1/refineries/:id
pub async fn get_refinery(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    validate_uuid(&id)?;

    let refinery = RefineryRepository::get_by_id(app_state.db.pool(), &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Refinery not found: {}", id)))?;

    Ok(response::ok(refinery))
}

/// Create a refinery
///
/// POST /api/v1/refineries
pub async fn create_refinery(
    State(app_state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreateRefineryRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    require_admin(&user)?;
    req.validate()?;

    let refinery_id = Uuid::new_v4().to_string();
    let created = RefineryRepository::create(app_state.db.pool(), &refinery_id, req.into_new()).await?;

    tracing::info!("Created refinery: {} ({})", created.id, created.name);
    Ok(response::created(created))
}

/// Update a refinery
///
/// PUT /api/v1/refineries/:id
pub async fn update_refinery(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    AuthUser(user): AuthUser,
    Json(req): Json<UpdateRefineryRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    require_admin(&user)?;
    validate_uuid(&id)?;

    if !req.has_updates() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }
    req.validate()?;

    let refinery = RefineryRepository::update(app_state.db.pool(), &id, req.into_update())
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Refinery not found: {}", id)))?;

    tracing::info!("Updated refinery: {}", refinery.id);
    Ok(response::ok(refinery))
}

/// Delete a refinery
///
/// DELETE /api/v1/refineries/:id
pub async fn delete_refinery(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    AuthUser(user): AuthUser,
) -> ApiResult<impl axum::response::IntoResponse> {
    require_admin(&user)?;
    validate_uuid(&id)?;

    RefineryRepository::delete(app_state.db.pool(), &id).await?;

    tracing::info!("Deleted refinery: {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Vessels within a radius of a refinery; needs refinery access
///
/// GET /api/v1/refineries/:id/nearby-vessels?radius_km=&limit=
pub async fn refinery_nearby_vessels(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    AuthUser(user): AuthUser,
    Query(query): Query<NearbyQuery>,
) -> ApiResult<impl axum::response::IntoResponse> {
    require_capability(&app_state, &user, Capability::RefineryAccess).await?;
    validate_uuid(&id)?;
    let radius_km = resolve_radius(&app_state, query.radius_km)?;

    let pool = app_state.db.pool();
    let refinery = RefineryRepository::get_by_id(pool, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Refinery not found: {}", id)))?;

    let vessels = VesselRepository::list_positioned(pool).await?;
    let nearby = find_nearby(refinery.coordinates(), &vessels, radius_km, query.limit);

    Ok(response::ok(NearbyVesselsResponse {
        origin_id: refinery.id,
        origin_name: refinery.name,
        radius_km,
        count: nearby.len(),
        vessels: nearby,
    }))
}
