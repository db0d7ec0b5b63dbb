//! Port model for database persistence

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::geo::Coordinates;

/// Port types accepted by the schema
pub const PORT_TYPES: &[&str] = &["oil", "commercial", "lng", "mixed"];

/// Port status values accepted by the schema
pub const PORT_STATUSES: &[&str] = &["operational", "limited", "closed"];

/// An oil or commercial port
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Port {
    /// Unique port identifier (UUID string)
    pub id: String,

    pub name: String,

    pub country: String,

    pub region: String,

    pub lat: f64,

    pub lng: f64,

    /// oil, commercial, lng, mixed
    pub port_type: String,

    /// Annual throughput capacity in tonnes
    pub capacity: Option<i64>,

    /// operational, limited, closed
    pub status: String,

    pub description: Option<String>,

    /// Creation timestamp (RFC 3339 string)
    pub created_at: String,

    /// Last update timestamp (RFC 3339 string)
    pub updated_at: String,
}

impl Port {
    /// Port position
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }
}
