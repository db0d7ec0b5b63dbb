//! Company model for database persistence

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Company types accepted by the schema
pub const COMPANY_TYPES: &[&str] = &["shipping", "trading", "refining", "producer", "broker"];

/// A shipping, trading, refining or brokerage company
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Company {
    /// Unique company identifier (UUID string)
    pub id: String,

    /// Company name (unique)
    pub name: String,

    pub country: Option<String>,

    pub region: Option<String>,

    /// shipping, trading, refining, producer, broker
    pub company_type: String,

    pub website: Option<String>,

    pub description: Option<String>,

    /// Declared fleet size; the tracked fleet is counted from `vessels`
    pub fleet_size: i64,

    /// Creation timestamp (RFC 3339 string)
    pub created_at: String,

    /// Last update timestamp (RFC 3339 string)
    pub updated_at: String,
}
