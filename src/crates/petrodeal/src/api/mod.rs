//! REST API layer for the PetroDealHub server
//!
//! Provides HTTP/REST endpoints for:
//! - Vessel, port, refinery and company reference data
//! - Proximity queries and voyage progress
//! - Accounts, sessions and subscriptions
//! - Broker deals and vessel documents
//! - WebSocket real-time vessel feed

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;
pub mod ws;

pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use response::{PaginatedResponse, SuccessResponse};
pub use routes::{create_router, AppState};

/// Re-export commonly used items
pub mod prelude {
    pub use crate::api::error::{ApiError, ApiResult};
    pub use crate::api::models::*;
    pub use crate::api::response::*;
}
