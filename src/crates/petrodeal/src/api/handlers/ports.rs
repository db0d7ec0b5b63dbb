//! Port endpoint handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::api::{
    error::{ApiError, ApiResult},
    handlers::{paginate, page_params, resolve_radius},
    middleware::{require_admin, validation::validate_uuid, AuthUser},
    models::{CreatePortRequest, NearbyQuery, NearbyVesselsResponse, ReferenceListQuery, UpdatePortRequest},
    response,
    routes::AppState,
};
use crate::db::repositories::{PortRepository, VesselRepository};
use crate::geo::find_nearby;

/// List ports with filtering and pagination
///
/// GET /api/v1/ports
pub async fn list_ports(
    State(app_state): State<AppState>,
    Query(query): Query<ReferenceListQuery>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let (page, per_page) = page_params(query.page, query.per_page)?;

    let ports = PortRepository::list(app_state.db.pool()).await?;
    let filtered: Vec<_> = ports
        .into_iter()
        .filter(|p| query.matches(&p.name, Some(&p.country), Some(&p.region)))
        .collect();

    let (data, total) = paginate(filtered, page, per_page);
    Ok(response::paginated(data, page, per_page, total))
}

/// Get a single port by ID
///
/// GET /api/v1/ports/:id
pub async fn get_port(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    validate_uuid(&id)?;

    let port = PortRepository::get_by_id(app_state.db.pool(), &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Port not found: {}", id)))?;

    Ok(response::ok(port))
}

/// Create a port
///
/// POST /api/v1/ports
pub async fn create_port(
    State(app_state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreatePortRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    require_admin(&user)?;
    req.validate()?;

    let port_id = Uuid::new_v4().to_string();
    let created = PortRepository::create(app_state.db.pool(), &port_id, req.into_new()).await?;

    tracing::info!("Created port: {} ({})", created.id, created.name);
    Ok(response::created(created))
}

/// Update a port
///
/// PUT /api/v1/ports/:id
pub async fn update_port(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    AuthUser(user): AuthUser,
    Json(req): Json<UpdatePortRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    require_admin(&user)?;
    validate_uuid(&id)?;

    if !req.has_updates() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }
    req.validate()?;

    let port = PortRepository::update(app_state.db.pool(), &id, req.into_update())
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Port not found: {}", id)))?;

    tracing::info!("Updated port: {}", port.id);
    Ok(response::ok(port))
}

/// Delete a port
///
/// DELETE /api/v1/ports/:id
pub async fn delete_port(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    AuthUser(user): AuthUser,
) -> ApiResult<impl axum::response::IntoResponse> {
    require_admin(&user)?;
    validate_uuid(&id)?;

    PortRepository::delete(app_state.db.pool(), &id).await?;

    tracing::info!("Deleted port: {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Vessels within a radius of a port, nearest first
///
/// GET /api/v1/ports/:id/nearby-vessels?radius_km=&limit=
pub async fn port_nearby_vessels(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<NearbyQuery>,
) -> ApiResult<impl axum::response::IntoResponse> {
    validate_uuid(&id)?;
    let radius_km = resolve_radius(&app_state, query.radius_km)?;

    let pool = app_state.db.pool();
    let port = PortRepository::get_by_id(pool, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Port not found: {}", id)))?;

    let vessels = VesselRepository::list_positioned(pool).await?;
    let nearby = find_nearby(port.coordinates(), &vessels, radius_km, query.limit);

    Ok(response::ok(NearbyVesselsResponse {
        origin_id: port.id,
        origin_name: port.name,
        radius_km,
        count: nearby.len(),
        vessels: nearby,
    }))
}
