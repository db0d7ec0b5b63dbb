//! Server status and dashboard count handlers

use axum::extract::State;

use crate::api::error::ApiResult;
use crate::api::models::{CountEntry, StatsResponse, StatusResponse};
use crate::api::response;
use crate::api::routes::AppState;
use crate::db::repositories::{
    CompanyRepository, ConfigurationRepository, DealRepository, PortRepository,
    RefineryRepository, SubscriptionRepository, VesselRepository,
};

/// Get server status
///
/// GET /api/status
pub async fn status(State(app_state): State<AppState>) -> impl axum::response::IntoResponse {
    let pool = app_state.db.pool();

    // Name and id are persisted so they survive restarts
    let name = ConfigurationRepository::get_or_insert(pool, "server.name", &app_state.config.server.name)
        .await
        .unwrap_or_else(|_| app_state.config.server.name.clone());
    let uuid = ConfigurationRepository::get_or_insert(pool, "server.uuid", &uuid::Uuid::new_v4().to_string())
        .await
        .unwrap_or_else(|_| "unknown".to_string());

    let database = match app_state.db.health_check().await {
        Ok(_) => "connected".to_string(),
        Err(_) => "disconnected".to_string(),
    };

    let narrator = app_state
        .narrator
        .as_ref()
        .map(|n| n.name().to_string())
        .unwrap_or_else(|| "template".to_string());

    let status = StatusResponse {
        name,
        uuid,
        version: crate::version::VERSION.to_string(),
        status: "running".to_string(),
        uptime_secs: app_state.started_at.elapsed().as_secs(),
        database,
        database_pool: app_state.db.get_pool_statistics(),
        simulation_enabled: app_state.config.simulation.enabled,
        narrator,
        websocket: app_state.metrics.snapshot(),
        websocket_pool: app_state.connections.stats(),
    };

    response::ok(status)
}

/// Dashboard counts
///
/// GET /api/v1/stats
pub async fn stats(State(app_state): State<AppState>) -> ApiResult<impl axum::response::IntoResponse> {
    let pool = app_state.db.pool();

    let stats = StatsResponse {
        vessels: VesselRepository::count(pool).await?,
        ports: PortRepository::count(pool).await?,
        refineries: RefineryRepository::count(pool).await?,
        companies: CompanyRepository::count(pool).await?,
        deals: DealRepository::count(pool).await?,
        vessels_by_status: CountEntry::from_rows(VesselRepository::count_by_status(pool).await?),
        vessels_by_region: CountEntry::from_rows(VesselRepository::count_by_region(pool).await?),
        deals_by_status: CountEntry::from_rows(DealRepository::count_by_status(pool).await?),
        subscriptions_by_plan: CountEntry::from_rows(SubscriptionRepository::count_by_plan(pool).await?),
    };

    Ok(response::ok(stats))
}
