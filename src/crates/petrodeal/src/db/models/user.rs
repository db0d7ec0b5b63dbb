//! User model for database persistence

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered account
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier (UUID string)
    pub id: String,

    pub username: String,

    pub email: String,

    /// Argon2 PHC string; never serialized to clients
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// user, broker, admin
    pub role: String,

    /// Creation timestamp (RFC 3339 string)
    pub created_at: String,

    /// Last update timestamp (RFC 3339 string)
    pub updated_at: String,

    pub last_login_at: Option<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}
