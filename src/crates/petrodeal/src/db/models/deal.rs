//! Deal model for database persistence

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Deal status values accepted by the schema
pub const DEAL_STATUSES: &[&str] = &["pending", "negotiating", "active", "completed", "cancelled"];

/// A broker's cargo deal
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Deal {
    pub id: String,

    /// Broker (user) who owns the deal
    pub broker_id: String,

    pub vessel_id: Option<String>,

    pub refinery_id: Option<String>,

    pub seller_company_id: Option<String>,

    pub buyer_company_id: Option<String>,

    pub cargo_type: String,

    pub quantity: f64,

    /// bbl, mt
    pub unit: String,

    pub price_per_unit: f64,

    pub currency: String,

    /// One of [`DEAL_STATUSES`]
    pub status: String,

    pub notes: Option<String>,

    /// Creation timestamp (RFC 3339 string)
    pub created_at: String,

    /// Last update timestamp (RFC 3339 string)
    pub updated_at: String,
}

impl Deal {
    /// Quantity times unit price
    pub fn total_value(&self) -> f64 {
        self.quantity * self.price_per_unit
    }
}
