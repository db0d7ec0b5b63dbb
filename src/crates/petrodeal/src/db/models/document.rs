//! Vessel document model for database persistence

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Document types accepted by the schema
pub const DOCUMENT_TYPES: &[&str] = &[
    "bill_of_lading",
    "certificate_of_origin",
    "quality_certificate",
    "quantity_certificate",
    "invoice",
    "charter_party",
    "other",
];

/// Document status values accepted by the schema
pub const DOCUMENT_STATUSES: &[&str] = &["active", "expired", "revoked"];

/// A trade document attached to a vessel
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Document {
    pub id: String,

    pub vessel_id: String,

    pub title: String,

    /// One of [`DOCUMENT_TYPES`]
    pub document_type: String,

    pub content: String,

    /// active, expired, revoked
    pub status: String,

    pub issued_at: Option<String>,

    pub expires_at: Option<String>,

    /// Creation timestamp (RFC 3339 string)
    pub created_at: String,

    /// Last update timestamp (RFC 3339 string)
    pub updated_at: String,
}
