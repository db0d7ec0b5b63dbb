//! Session model for database persistence
//!
//! A session is an opaque bearer token issued at login.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents an authenticated API session
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Session token (also the bearer credential)
    pub id: String,

    /// Owning user
    pub user_id: String,

    /// Creation timestamp (RFC 3339 string)
    pub created_at: String,

    /// Expiry timestamp (RFC 3339 string)
    pub expires_at: String,

    /// Last request seen with this token (RFC 3339 string)
    pub last_seen_at: String,
}
