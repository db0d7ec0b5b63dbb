//! Vessel document handlers; all need `document_access`

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::api::{
    error::{ApiError, ApiResult},
    middleware::{require_capability, validation::validate_uuid, AuthUser},
    models::CreateDocumentRequest,
    response,
    routes::AppState,
};
use crate::db::repositories::{DocumentRepository, VesselRepository};
use crate::subscription::Capability;

/// Documents attached to a vessel
///
/// GET /api/v1/vessels/:id/documents
pub async fn list_vessel_documents(
    State(app_state): State<AppState>,
    Path(vessel_id): Path<String>,
    AuthUser(user): AuthUser,
) -> ApiResult<impl axum::response::IntoResponse> {
    require_capability(&app_state, &user, Capability::DocumentAccess).await?;
    validate_uuid(&vessel_id)?;

    let pool = app_state.db.pool();
    if VesselRepository::get_by_id(pool, &vessel_id).await?.is_none() {
        return Err(ApiError::NotFound(format!("Vessel not found: {}", vessel_id)));
    }

    let documents = DocumentRepository::list_by_vessel(pool, &vessel_id).await?;
    Ok(response::ok(documents))
}

/// Attach a document to a vessel
///
/// POST /api/v1/vessels/:id/documents
pub async fn create_document(
    State(app_state): State<AppState>,
    Path(vessel_id): Path<String>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreateDocumentRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    require_capability(&app_state, &user, Capability::DocumentAccess).await?;
    validate_uuid(&vessel_id)?;
    req.validate()?;

    let pool = app_state.db.pool();
    if VesselRepository::get_by_id(pool, &vessel_id).await?.is_none() {
        return Err(ApiError::NotFound(format!("Vessel not found: {}", vessel_id)));
    }

    let document_id = Uuid::new_v4().to_string();
    let created = DocumentRepository::create(pool, &document_id, req.into_new(vessel_id)).await?;

    tracing::info!("Created document: {} for vessel {}", created.id, created.vessel_id);
    Ok(response::created(created))
}

/// Get a single document by ID
///
/// GET /api/v1/documents/:id
pub async fn get_document(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    AuthUser(user): AuthUser,
) -> ApiResult<impl axum::response::IntoResponse> {
    require_capability(&app_state, &user, Capability::DocumentAccess).await?;
    validate_uuid(&id)?;

    let document = DocumentRepository::get_by_id(app_state.db.pool(), &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Document not found: {}", id)))?;

    Ok(response::ok(document))
}

/// Delete a document
///
/// DELETE /api/v1/documents/:id
pub async fn delete_document(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    AuthUser(user): AuthUser,
) -> ApiResult<impl axum::response::IntoResponse> {
    require_capability(&app_state, &user, Capability::DocumentAccess).await?;
    validate_uuid(&id)?;

    DocumentRepository::delete(app_state.db.pool(), &id).await?;

    tracing::info!("Deleted document: {}", id);
    Ok(StatusCode::NO_CONTENT)
}
