//! Vessel document API models and DTOs

use serde::{Deserialize, Serialize};

use crate::api::error::ApiResult;
use crate::api::middleware::validation::{
    validate_one_of, validate_string_length, validate_timestamp,
};
use crate::db::models::document::DOCUMENT_TYPES;
use crate::db::repositories::NewDocument;

/// Request to attach a document to a vessel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDocumentRequest {
    pub title: String,
    pub document_type: String,
    #[serde(default)]
    pub content: String,
    pub issued_at: Option<String>,
    pub expires_at: Option<String>,
}

impl CreateDocumentRequest {
    pub fn validate(&self) -> ApiResult<()> {
        validate_string_length(&self.title, "title", 1, 255)?;
        validate_one_of(&self.document_type, "document_type", DOCUMENT_TYPES)?;
        if let Some(issued) = &self.issued_at {
            validate_timestamp(issued, "issued_at")?;
        }
        if let Some(expires) = &self.expires_at {
            validate_timestamp(expires, "expires_at")?;
        }
        Ok(())
    }

    pub fn into_new(self, vessel_id: String) -> NewDocument {
        NewDocument {
            vessel_id,
            title: self.title,
            document_type: self.document_type,
            content: self.content,
            status: "active".to_string(),
            issued_at: self.issued_at,
            expires_at: self.expires_at,
        }
    }
}
