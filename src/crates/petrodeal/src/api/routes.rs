//! API route definitions
//!
//! Defines all API routes and the shared state their handlers receive.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Instant;

use crate::api::middleware::{cors_layer, logging_layer};
use crate::api::ws::{BroadcastState, ConnectionPool, WebSocketMetrics};
use crate::api::{handlers, ws};
use crate::config::ServerConfig;
use crate::db::DatabaseConnection;
use crate::services::{AuthService, SubscriptionService};
use crate::voyage::VoyageNarrator;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub broadcast: BroadcastState,
    pub connections: Arc<ConnectionPool>,
    pub metrics: WebSocketMetrics,
    pub config: Arc<ServerConfig>,
    pub auth: AuthService,
    pub subscriptions: SubscriptionService,
    /// Narrative writer; `None` means only the template is used
    pub narrator: Option<Arc<dyn VoyageNarrator>>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: ServerConfig) -> Self {
        Self {
            db,
            broadcast: BroadcastState::new(),
            connections: Arc::new(ConnectionPool::new(config.server.max_ws_connections)),
            metrics: WebSocketMetrics::new(),
            auth: AuthService::new(config.session.ttl_hours),
            subscriptions: SubscriptionService::new(config.subscription.trial_days),
            config: Arc::new(config),
            narrator: None,
            started_at: Instant::now(),
        }
    }

    pub fn with_narrator(mut self, narrator: Arc<dyn VoyageNarrator>) -> Self {
        self.narrator = Some(narrator);
        self
    }

    pub fn with_broadcast(mut self, broadcast: BroadcastState) -> Self {
        self.broadcast = broadcast;
        self
    }
}

/// Build the complete API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health and status
        .route("/health", get(handlers::health))
        .route("/api/v1/system/health", get(handlers::health_detailed))
        .route("/api/status", get(handlers::status))
        .route("/api/v1/stats", get(handlers::stats))
        // Accounts
        .route("/api/v1/auth/register", post(handlers::register))
        .route("/api/v1/auth/login", post(handlers::login))
        .route("/api/v1/auth/logout", post(handlers::logout))
        .route("/api/v1/auth/me", get(handlers::me))
        // Vessels
        .route(
            "/api/v1/vessels",
            get(handlers::list_vessels).post(handlers::create_vessel),
        )
        .route("/api/v1/vessels/positions", get(handlers::vessel_positions))
        .route(
            "/api/v1/vessels/:id",
            get(handlers::get_vessel)
                .put(handlers::update_vessel)
                .delete(handlers::delete_vessel),
        )
        .route("/api/v1/vessels/:id/progress", get(handlers::vessel_progress))
        .route(
            "/api/v1/vessels/:id/documents",
            get(handlers::list_vessel_documents).post(handlers::create_document),
        )
        // Ports
        .route(
            "/api/v1/ports",
            get(handlers::list_ports).post(handlers::create_port),
        )
        .route(
            "/api/v1/ports/:id",
            get(handlers::get_port)
                .put(handlers::update_port)
                .delete(handlers::delete_port),
        )
        .route("/api/v1/ports/:id/nearby-vessels", get(handlers::port_nearby_vessels))
        // Refineries
        .route(
            "/api/v1/refineries",
            get(handlers::list_refineries).post(handlers::create_refinery),
        )
        .route(
            "/api/v1/refineries/:id",
            get(handlers::get_refinery)
                .put(handlers::update_refinery)
                .delete(handlers::delete_refinery),
        )
        .route(
            "/api/v1/refineries/:id/nearby-vessels",
            get(handlers::refinery_nearby_vessels),
        )
        // Companies
        .route(
            "/api/v1/companies",
            get(handlers::list_companies).post(handlers::create_company),
        )
        .route(
            "/api/v1/companies/:id",
            get(handlers::get_company)
                .put(handlers::update_company)
                .delete(handlers::delete_company),
        )
        .route("/api/v1/companies/:id/vessels", get(handlers::company_vessels))
        // Proximity
        .route("/api/v1/proximity/ports", get(handlers::ports_proximity))
        // Plans and subscriptions
        .route("/api/v1/plans", get(handlers::list_plans))
        .route("/api/v1/subscriptions/trial", post(handlers::start_trial))
        .route("/api/v1/subscriptions/me", get(handlers::my_subscription))
        .route("/api/v1/subscriptions/me/plan", post(handlers::change_plan))
        .route("/api/v1/subscriptions/me/cancel", post(handlers::cancel_subscription))
        // Deals
        .route(
            "/api/v1/deals",
            get(handlers::list_deals).post(handlers::create_deal),
        )
        .route(
            "/api/v1/deals/:id",
            get(handlers::get_deal)
                .put(handlers::update_deal)
                .delete(handlers::delete_deal),
        )
        // Documents
        .route(
            "/api/v1/documents/:id",
            get(handlers::get_document).delete(handlers::delete_document),
        )
        // Real-time feed
        .route("/ws", get(ws::ws_handler))
        .layer(logging_layer())
        .layer(cors_layer())
        .with_state(state)
}
