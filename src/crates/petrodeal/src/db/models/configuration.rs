//! Configuration model for database persistence
//!
//! Key-value server metadata such as the advertised server name and the
//! instance UUID generated on first start.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents a configuration entry in the database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Configuration {
    /// Configuration key (unique identifier)
    pub key: String,

    /// Configuration value
    pub value: String,

    /// Type of the value: string, integer, float, boolean, json
    pub value_type: String,

    /// Optional description of the configuration
    pub description: Option<String>,

    /// Whether this is a secret value (0 = no, 1 = yes)
    pub is_secret: i32,

    /// Creation timestamp (RFC 3339 string)
    pub created_at: String,

    /// Last update timestamp (RFC 3339 string)
    pub updated_at: String,
}

impl Configuration {
    /// Whether the value must be hidden from API output
    pub fn is_secret(&self) -> bool {
        self.is_secret != 0
    }
}
