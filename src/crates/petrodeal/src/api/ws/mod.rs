//! WebSocket API support
//!
//! Streams simulated vessel positions and port proximity snapshots to
//! connected clients.

pub mod error;
pub mod events;
pub mod handler;
pub mod metrics;
pub mod pool;

pub use error::{WsError, WsResult};
pub use events::{ClientMessage, VesselPosition, WsEvent};
pub use handler::{ws_handler, BroadcastState};
pub use metrics::{MetricsSnapshot, WebSocketMetrics};
pub use pool::{ConnectionPool, PoolEntry, PoolStats};
