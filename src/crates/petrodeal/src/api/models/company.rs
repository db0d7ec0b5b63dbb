//! Company API models and DTOs

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::middleware::validation::{validate_one_of, validate_string_length};
use crate::db::models::company::COMPANY_TYPES;
use crate::db::repositories::{CompanyUpdate, NewCompany};

/// Request to create a company
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCompanyRequest {
    pub name: String,
    pub country: Option<String>,
    pub region: Option<String>,
    /// Defaults to "shipping"
    pub company_type: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub fleet_size: i64,
}

impl CreateCompanyRequest {
    pub fn validate(&self) -> ApiResult<()> {
        validate_string_length(&self.name, "name", 1, 255)?;
        if let Some(company_type) = &self.company_type {
            validate_one_of(company_type, "company_type", COMPANY_TYPES)?;
        }
        if self.fleet_size < 0 {
            return Err(ApiError::ValidationError("fleet_size cannot be negative".to_string()));
        }
        Ok(())
    }

    pub fn into_new(self) -> NewCompany {
        NewCompany {
            name: self.name,
            country: self.country,
            region: self.region,
            company_type: self.company_type.unwrap_or_else(|| "shipping".to_string()),
            website: self.website,
            description: self.description,
            fleet_size: self.fleet_size,
        }
    }
}

/// Request to update a company; absent fields are kept
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCompanyRequest {
    pub name: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub company_type: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub fleet_size: Option<i64>,
}

impl UpdateCompanyRequest {
    pub fn has_updates(&self) -> bool {
        self.name.is_some()
            || self.country.is_some()
            || self.region.is_some()
            || self.company_type.is_some()
            || self.website.is_some()
            || self.description.is_some()
            || self.fleet_size.is_some()
    }

    pub fn validate(&self) -> ApiResult<()> {
        if let Some(name) = &self.name {
            validate_string_length(name, "name", 1, 255)?;
        }
        if let Some(company_type) = &self.company_type {
            validate_one_of(company_type, "company_type", COMPANY_TYPES)?;
        }
        if matches!(self.fleet_size, Some(n) if n < 0) {
            return Err(ApiError::ValidationError("fleet_size cannot be negative".to_string()));
        }
        Ok(())
    }

    pub fn into_update(self) -> CompanyUpdate {
        CompanyUpdate {
            name: self.name,
            country: self.country,
            region: self.region,
            company_type: self.company_type,
            website: self.website,
            description: self.description,
            fleet_size: self.fleet_size,
        }
    }
}
