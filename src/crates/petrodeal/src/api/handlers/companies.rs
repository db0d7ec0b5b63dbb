//! Company endpoint handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::api::{
    error::{ApiError, ApiResult},
    handlers::{paginate, page_params},
    middleware::{require_admin, validation::validate_uuid, AuthUser},
    models::{CreateCompanyRequest, ReferenceListQuery, UpdateCompanyRequest},
    response,
    routes::AppState,
};
use crate::db::repositories::{CompanyRepository, VesselRepository};

/// List companies with filtering and pagination
///
/// GET /api/v1/companies
pub async fn list_companies(
    State(app_state): State<AppState>,
    Query(query): Query<ReferenceListQuery>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let (page, per_page) = page_params(query.page, query.per_page)?;

    let companies = CompanyRepository::list(app_state.db.pool()).await?;
    let filtered: Vec<_> = companies
        .into_iter()
        .filter(|c| query.matches(&c.name, c.country.as_deref(), c.region.as_deref()))
        .collect();

    let (data, total) = paginate(filtered, page, per_page);
    Ok(response::paginated(data, page, per_page, total))
}

/// Get a single company by ID
///
/// GET /api/v1/companies/:id
pub async fn get_company(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    validate_uuid(&id)?;

    let company = CompanyRepository::get_by_id(app_state.db.pool(), &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Company not found: {}", id)))?;

    Ok(response::ok(company))
}

/// Create a company
///
/// POST /api/v1/companies
pub async fn create_company(
    State(app_state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreateCompanyRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    require_admin(&user)?;
    req.validate()?;

    let pool = app_state.db.pool();
    if CompanyRepository::get_by_name(pool, &req.name).await?.is_some() {
        return Err(ApiError::Conflict(format!("Company already exists: {}", req.name)));
    }

    let company_id = Uuid::new_v4().to_string();
    let created = CompanyRepository::create(pool, &company_id, req.into_new()).await?;

    tracing::info!("Created company: {} ({})", created.id, created.name);
    Ok(response::created(created))
}

/// Update a company
///
/// PUT /api/v1/companies/:id
pub async fn update_company(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    AuthUser(user): AuthUser,
    Json(req): Json<UpdateCompanyRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    require_admin(&user)?;
    validate_uuid(&id)?;

    if !req.has_updates() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }
    req.validate()?;

    let company = CompanyRepository::update(app_state.db.pool(), &id, req.into_update())
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Company not found: {}", id)))?;

    tracing::info!("Updated company: {}", company.id);
    Ok(response::ok(company))
}

/// Delete a company; its vessels are kept with no owner
///
/// DELETE /api/v1/companies/:id
pub async fn delete_company(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    AuthUser(user): AuthUser,
) -> ApiResult<impl axum::response::IntoResponse> {
    require_admin(&user)?;
    validate_uuid(&id)?;

    CompanyRepository::delete(app_state.db.pool(), &id).await?;

    tracing::info!("Deleted company: {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Fleet of one company
///
/// GET /api/v1/companies/:id/vessels
pub async fn company_vessels(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    validate_uuid(&id)?;

    let pool = app_state.db.pool();
    if CompanyRepository::get_by_id(pool, &id).await?.is_none() {
        return Err(ApiError::NotFound(format!("Company not found: {}", id)));
    }

    let vessels = VesselRepository::list_by_company(pool, &id).await?;
    Ok(response::ok(vessels))
}
