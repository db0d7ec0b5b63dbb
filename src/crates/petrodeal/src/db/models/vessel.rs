//! Vessel model for database persistence

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::geo::Coordinates;

/// Vessel status values accepted by the schema
pub const VESSEL_STATUSES: &[&str] = &[
    "underway",
    "at_port",
    "moored",
    "anchored",
    "loading",
    "discharging",
    "maintenance",
];

/// A tracked tanker or cargo vessel
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vessel {
    /// Unique vessel identifier (UUID string)
    pub id: String,

    pub name: String,

    /// IMO number (unique)
    pub imo: String,

    pub mmsi: Option<String>,

    /// e.g. VLCC, Suezmax, Aframax, Product Tanker, LNG Carrier
    pub vessel_type: String,

    pub flag: Option<String>,

    /// Year built
    pub built: Option<i64>,

    /// Deadweight tonnage
    pub deadweight: Option<i64>,

    pub current_lat: Option<f64>,

    pub current_lng: Option<f64>,

    pub current_region: Option<String>,

    pub speed_knots: f64,

    /// One of [`VESSEL_STATUSES`]
    pub status: String,

    pub cargo_type: Option<String>,

    /// Cargo capacity in barrels
    pub cargo_capacity: Option<i64>,

    pub departure_port_id: Option<String>,

    pub destination_port_id: Option<String>,

    /// RFC 3339 departure timestamp
    pub departure_date: Option<String>,

    /// RFC 3339 estimated time of arrival
    pub eta: Option<String>,

    pub company_id: Option<String>,

    /// Creation timestamp (RFC 3339 string)
    pub created_at: String,

    /// Last update timestamp (RFC 3339 string)
    pub updated_at: String,
}

impl Vessel {
    /// Current position, when one is recorded
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.current_lat, self.current_lng) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            _ => None,
        }
    }

    /// Whether the simulator should move this vessel
    pub fn is_underway(&self) -> bool {
        self.status == "underway"
    }
}
