//! Health check endpoint handler
//!
//! Provides health status check endpoints for the API.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::api::{models::HealthResponse, response, routes::AppState};

/// Handler for GET /health
///
/// Returns basic health status without database check.
pub async fn health() -> impl axum::response::IntoResponse {
    let health = HealthResponse::new("ok", "unknown");
    response::ok(health)
}

/// Handler for GET /api/v1/system/health
///
/// Returns detailed health status including database connectivity.
pub async fn health_detailed(
    State(app_state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    match app_state.db.health_check().await {
        Ok(()) => {
            let health = HealthResponse::new("ok", "connected");
            (StatusCode::OK, Json(health))
        }
        Err(e) => {
            tracing::warn!("Database health check failed: {}", e);
            let health = HealthResponse::new("error", "error");
            (StatusCode::SERVICE_UNAVAILABLE, Json(health))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::db::DatabaseConnection;

    #[tokio::test]
    async fn test_health_detailed_reports_connected_database() {
        let db = DatabaseConnection::in_memory().await.unwrap();
        let state = AppState::new(db, ServerConfig::default());

        let (status, Json(body)) = health_detailed(State(state)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.database, "connected");
    }
}
