//! PetroDealHub API server
//!
//! Maritime oil-trading backend: vessel, port, refinery and company
//! reference data, proximity queries, voyage progress with written
//! narratives, subscription plan gating, broker deals and a simulated live
//! vessel feed over WebSocket.

pub mod api;
pub mod config;
pub mod db;
pub mod geo;
pub mod services;
pub mod simulation;
pub mod subscription;
pub mod version;
pub mod voyage;

pub use api::{create_router, AppState};
pub use config::ServerConfig;
pub use db::DatabaseConnection;
pub use simulation::BackgroundTasks;

/// Get version information
pub fn version() -> &'static str {
    version::VERSION
}
