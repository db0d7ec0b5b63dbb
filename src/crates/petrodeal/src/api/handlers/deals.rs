//! Broker deal handlers
//!
//! All routes need the `broker_deals` capability. Brokers only ever see their
//! own deals; a deal owned by someone else reads as not found. Administrators
//! see every deal.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::api::{
    error::{ApiError, ApiResult},
    handlers::{page_params, total_u32},
    middleware::{require_capability, validation::validate_uuid, AuthUser},
    models::{CreateDealRequest, DealListQuery, DealResponse, UpdateDealRequest},
    response,
    routes::AppState,
};
use crate::db::models::{Deal, User};
use crate::db::repositories::{
    CompanyRepository, DealRepository, PageWindow, RefineryRepository, VesselRepository,
};
use crate::db::DatabasePool;
use crate::subscription::Capability;

/// Load a deal the user may see
async fn visible_deal(pool: &DatabasePool, user: &User, id: &str) -> ApiResult<Deal> {
    DealRepository::get_by_id(pool, id)
        .await?
        .filter(|deal| user.is_admin() || deal.broker_id == user.id)
        .ok_or_else(|| ApiError::NotFound(format!("Deal not found: {}", id)))
}

/// Referenced vessel, refinery and companies must exist
async fn check_references(
    pool: &DatabasePool,
    vessel_id: Option<&str>,
    refinery_id: Option<&str>,
    company_ids: [Option<&str>; 2],
) -> ApiResult<()> {
    if let Some(id) = vessel_id {
        if VesselRepository::get_by_id(pool, id).await?.is_none() {
            return Err(ApiError::ValidationError(format!("vessel_id refers to unknown vessel {}", id)));
        }
    }
    if let Some(id) = refinery_id {
        if RefineryRepository::get_by_id(pool, id).await?.is_none() {
            return Err(ApiError::ValidationError(format!("refinery_id refers to unknown refinery {}", id)));
        }
    }
    for id in company_ids.into_iter().flatten() {
        if CompanyRepository::get_by_id(pool, id).await?.is_none() {
            return Err(ApiError::ValidationError(format!("Unknown company {}", id)));
        }
    }
    Ok(())
}

/// List deals
///
/// GET /api/v1/deals
pub async fn list_deals(
    State(app_state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<DealListQuery>,
) -> ApiResult<impl axum::response::IntoResponse> {
    require_capability(&app_state, &user, Capability::BrokerDeals).await?;
    let (page, per_page) = page_params(query.page, query.per_page)?;

    let broker_id = (!user.is_admin()).then(|| user.id.clone());
    let filter = query.filter(broker_id);

    let pool = app_state.db.pool();
    let deals = DealRepository::list(pool, &filter, PageWindow::new(page, per_page)).await?;
    let total = DealRepository::count_filtered(pool, &filter).await?;

    let data: Vec<DealResponse> = deals.into_iter().map(DealResponse::from).collect();
    Ok(response::paginated(data, page, per_page, total_u32(total)))
}

/// Open a deal brokered by the caller
///
/// POST /api/v1/deals
pub async fn create_deal(
    State(app_state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreateDealRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    require_capability(&app_state, &user, Capability::BrokerDeals).await?;
    req.validate()?;

    let pool = app_state.db.pool();
    check_references(
        pool,
        req.vessel_id.as_deref(),
        req.refinery_id.as_deref(),
        [req.seller_company_id.as_deref(), req.buyer_company_id.as_deref()],
    )
    .await?;

    let deal_id = Uuid::new_v4().to_string();
    let created = DealRepository::create(pool, &deal_id, req.into_new(user.id.clone())).await?;

    tracing::info!(broker_id = %user.id, "Created deal: {}", created.id);
    Ok(response::created(DealResponse::from(created)))
}

/// Get a single deal by ID
///
/// GET /api/v1/deals/:id
pub async fn get_deal(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    AuthUser(user): AuthUser,
) -> ApiResult<impl axum::response::IntoResponse> {
    require_capability(&app_state, &user, Capability::BrokerDeals).await?;
    validate_uuid(&id)?;

    let deal = visible_deal(app_state.db.pool(), &user, &id).await?;
    Ok(response::ok(DealResponse::from(deal)))
}

/// Update a deal
///
/// PUT /api/v1/deals/:id
pub async fn update_deal(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    AuthUser(user): AuthUser,
    Json(req): Json<UpdateDealRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    require_capability(&app_state, &user, Capability::BrokerDeals).await?;
    validate_uuid(&id)?;

    if !req.has_updates() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }
    req.validate()?;

    let pool = app_state.db.pool();
    visible_deal(pool, &user, &id).await?;
    check_references(
        pool,
        req.vessel_id.as_deref(),
        req.refinery_id.as_deref(),
        [req.seller_company_id.as_deref(), req.buyer_company_id.as_deref()],
    )
    .await?;

    let deal = match req.status_only().map(str::to_string) {
        Some(status) => DealRepository::update_status(pool, &id, &status).await?,
        None => DealRepository::update(pool, &id, req.into_update())
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Deal not found: {}", id)))?,
    };

    tracing::info!("Updated deal: {} ({})", deal.id, deal.status);
    Ok(response::ok(DealResponse::from(deal)))
}

/// Delete a deal
///
/// DELETE /api/v1/deals/:id
pub async fn delete_deal(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    AuthUser(user): AuthUser,
) -> ApiResult<impl axum::response::IntoResponse> {
    require_capability(&app_state, &user, Capability::BrokerDeals).await?;
    validate_uuid(&id)?;

    let pool = app_state.db.pool();
    visible_deal(pool, &user, &id).await?;
    DealRepository::delete(pool, &id).await?;

    tracing::info!("Deleted deal: {}", id);
    Ok(StatusCode::NO_CONTENT)
}
