//! WebSocket error handling

use thiserror::Error;

/// WebSocket error types
#[derive(Debug, Error)]
pub enum WsError {
    /// Pool is full
    #[error("Connection limit reached: {max} connections")]
    ConnectionLimit { max: usize },

    /// Client sent something that is not a known command
    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    /// Subscription target does not exist
    #[error("Port not found: {0}")]
    UnknownPort(String),

    /// Event could not be encoded
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Socket write failed; the client is gone
    #[error("Send failed: {0}")]
    Send(String),

    /// Lookup behind a client command failed
    #[error("Server error: {0}")]
    Server(String),
}

impl WsError {
    /// Machine-readable code carried in `error` events
    pub fn code(&self) -> &'static str {
        match self {
            WsError::ConnectionLimit { .. } => "CONNECTION_LIMIT",
            WsError::InvalidMessage(_) => "INVALID_MESSAGE",
            WsError::UnknownPort(_) => "PORT_NOT_FOUND",
            WsError::Serialization(_) | WsError::Send(_) | WsError::Server(_) => "SERVER_ERROR",
        }
    }

    /// Whether the connection should be dropped after this error
    pub fn is_fatal(&self) -> bool {
        matches!(self, WsError::ConnectionLimit { .. } | WsError::Send(_))
    }
}

impl From<crate::db::DatabaseError> for WsError {
    fn from(err: crate::db::DatabaseError) -> Self {
        WsError::Server(err.to_string())
    }
}

/// Result type for WebSocket operations
pub type WsResult<T> = Result<T, WsError>;
