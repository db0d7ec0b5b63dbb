//! Port proximity handler

use axum::extract::{Query, State};

use crate::api::{
    error::ApiResult,
    handlers::resolve_radius,
    middleware::{require_capability, AuthUser},
    models::ProximityQuery,
    response,
    routes::AppState,
};
use crate::db::repositories::{PortRepository, VesselRepository};
use crate::geo::port_proximity;
use crate::subscription::Capability;

/// Vessels near every port; needs port insights
///
/// GET /api/v1/proximity/ports?radius_km=
pub async fn ports_proximity(
    State(app_state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<ProximityQuery>,
) -> ApiResult<impl axum::response::IntoResponse> {
    require_capability(&app_state, &user, Capability::PortInsights).await?;
    let radius_km = resolve_radius(&app_state, query.radius_km)?;

    let pool = app_state.db.pool();
    let ports = PortRepository::list(pool).await?;
    let vessels = VesselRepository::list_positioned(pool).await?;

    Ok(response::ok(port_proximity(&ports, &vessels, radius_km)))
}
