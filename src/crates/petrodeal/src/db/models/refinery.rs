//! Refinery model for database persistence

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::geo::Coordinates;

/// Refinery status values accepted by the schema
pub const REFINERY_STATUSES: &[&str] = &["operational", "maintenance", "offline"];

/// An oil refinery
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Refinery {
    /// Unique refinery identifier (UUID string)
    pub id: String,

    pub name: String,

    pub country: String,

    pub region: String,

    pub lat: f64,

    pub lng: f64,

    /// Crude distillation capacity in barrels per day
    pub capacity_bpd: Option<i64>,

    pub operator: Option<String>,

    /// operational, maintenance, offline
    pub status: String,

    pub description: Option<String>,

    /// Creation timestamp (RFC 3339 string)
    pub created_at: String,

    /// Last update timestamp (RFC 3339 string)
    pub updated_at: String,
}

impl Refinery {
    /// Refinery position
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }
}
