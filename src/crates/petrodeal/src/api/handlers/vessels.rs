//! Vessel endpoint handlers
//!
//! Reads are public; writes need an administrator. Voyage progress is public
//! but the written narrative needs the `ai_insights` capability.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::api::{
    error::{ApiError, ApiResult},
    handlers::{page_params, total_u32},
    middleware::{require_admin, require_capability, validation::validate_uuid, AuthUser, MaybeUser},
    models::{CreateVesselRequest, ProgressQuery, UpdateVesselRequest, VesselListQuery},
    response,
    routes::AppState,
    ws::VesselPosition,
};
use crate::db::models::{Port, Vessel};
use crate::db::repositories::{CompanyRepository, PageWindow, PortRepository, VesselRepository};
use crate::db::DatabasePool;
use crate::subscription::Capability;
use crate::voyage::{narrate_or_template, VoyageContext, VoyageProgress};

async fn find_vessel(pool: &DatabasePool, id: &str) -> ApiResult<Vessel> {
    VesselRepository::get_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Vessel not found: {}", id)))
}

async fn optional_port(pool: &DatabasePool, id: Option<&str>) -> ApiResult<Option<Port>> {
    match id {
        Some(id) => Ok(PortRepository::get_by_id(pool, id).await?),
        None => Ok(None),
    }
}

/// Referenced ports and company must exist
async fn check_references(
    pool: &DatabasePool,
    departure_port_id: Option<&str>,
    destination_port_id: Option<&str>,
    company_id: Option<&str>,
) -> ApiResult<()> {
    for (field, id) in [
        ("departure_port_id", departure_port_id),
        ("destination_port_id", destination_port_id),
    ] {
        if let Some(id) = id {
            if PortRepository::get_by_id(pool, id).await?.is_none() {
                return Err(ApiError::ValidationError(format!("{} refers to unknown port {}", field, id)));
            }
        }
    }
    if let Some(id) = company_id {
        if CompanyRepository::get_by_id(pool, id).await?.is_none() {
            return Err(ApiError::ValidationError(format!("company_id refers to unknown company {}", id)));
        }
    }
    Ok(())
}

/// List vessels with filtering and pagination
///
/// GET /api/v1/vessels
pub async fn list_vessels(
    State(app_state): State<AppState>,
    Query(query): Query<VesselListQuery>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let (page, per_page) = page_params(query.page, query.per_page)?;
    let filter = query.filter();

    let pool = app_state.db.pool();
    let vessels = VesselRepository::list(pool, &filter, PageWindow::new(page, per_page)).await?;
    let total = VesselRepository::count_filtered(pool, &filter).await?;

    Ok(response::paginated(vessels, page, per_page, total_u32(total)))
}

/// Current position of every tracked vessel
///
/// GET /api/v1/vessels/positions
pub async fn vessel_positions(
    State(app_state): State<AppState>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let vessels = VesselRepository::list_positioned(app_state.db.pool()).await?;
    Ok(response::ok(VesselPosition::snapshot(&vessels)))
}

/// Get a single vessel by ID
///
/// GET /api/v1/vessels/:id
pub async fn get_vessel(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    validate_uuid(&id)?;
    let vessel = find_vessel(app_state.db.pool(), &id).await?;
    Ok(response::ok(vessel))
}

/// Voyage progress, optionally with a written narrative
///
/// GET /api/v1/vessels/:id/progress?narrative=true
pub async fn vessel_progress(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ProgressQuery>,
    MaybeUser(user): MaybeUser,
) -> ApiResult<impl axum::response::IntoResponse> {
    validate_uuid(&id)?;
    let pool = app_state.db.pool();

    let vessel = find_vessel(pool, &id).await?;
    let departure = optional_port(pool, vessel.departure_port_id.as_deref()).await?;
    let destination = optional_port(pool, vessel.destination_port_id.as_deref()).await?;

    let mut progress =
        VoyageProgress::build(&vessel, departure.as_ref(), destination.as_ref(), chrono::Utc::now());

    if query.narrative {
        let user = user.ok_or_else(|| {
            ApiError::Unauthorized("Sign in to request a voyage narrative".to_string())
        })?;
        require_capability(&app_state, &user, Capability::AiInsights).await?;

        let context = VoyageContext::new(&vessel, departure.as_ref(), destination.as_ref(), &progress);
        progress.narrative = Some(narrate_or_template(app_state.narrator.as_deref(), &context).await);
    }

    Ok(response::ok(progress))
}

/// Register a vessel
///
/// POST /api/v1/vessels
pub async fn create_vessel(
    State(app_state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreateVesselRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    require_admin(&user)?;
    req.validate()?;

    let pool = app_state.db.pool();
    if VesselRepository::get_by_imo(pool, &req.imo).await?.is_some() {
        return Err(ApiError::Conflict(format!("Vessel with IMO {} already exists", req.imo)));
    }
    check_references(
        pool,
        req.departure_port_id.as_deref(),
        req.destination_port_id.as_deref(),
        req.company_id.as_deref(),
    )
    .await?;

    let vessel_id = Uuid::new_v4().to_string();
    let created = VesselRepository::create(pool, &vessel_id, req.into_new()).await?;

    tracing::info!("Created vessel: {} ({})", created.id, created.imo);
    Ok(response::created(created))
}

/// Update a vessel
///
/// PUT /api/v1/vessels/:id
pub async fn update_vessel(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    AuthUser(user): AuthUser,
    Json(req): Json<UpdateVesselRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    require_admin(&user)?;
    validate_uuid(&id)?;

    if !req.has_updates() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }
    req.validate()?;

    let pool = app_state.db.pool();
    check_references(
        pool,
        req.departure_port_id.as_deref(),
        req.destination_port_id.as_deref(),
        req.company_id.as_deref(),
    )
    .await?;

    let vessel = VesselRepository::update(pool, &id, req.into_update())
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Vessel not found: {}", id)))?;

    tracing::info!("Updated vessel: {}", vessel.id);
    Ok(response::ok(vessel))
}

/// Delete a vessel
///
/// DELETE /api/v1/vessels/:id
pub async fn delete_vessel(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    AuthUser(user): AuthUser,
) -> ApiResult<impl axum::response::IntoResponse> {
    require_admin(&user)?;
    validate_uuid(&id)?;

    VesselRepository::delete(app_state.db.pool(), &id).await?;

    tracing::info!("Deleted vessel: {}", id);
    Ok(StatusCode::NO_CONTENT)
}
