//! Refinery API models and DTOs

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::middleware::validation::{
    validate_coordinates, validate_not_empty, validate_one_of, validate_string_length,
};
use crate::db::models::refinery::REFINERY_STATUSES;
use crate::db::repositories::{NewRefinery, RefineryUpdate};

fn validate_capacity(capacity: Option<i64>) -> ApiResult<()> {
    match capacity {
        Some(c) if c < 0 => Err(ApiError::ValidationError(
            "capacity_bpd cannot be negative".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Request to create a refinery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRefineryRequest {
    pub name: String,
    pub country: String,
    pub region: String,
    pub lat: f64,
    pub lng: f64,
    /// Barrels per day
    pub capacity_bpd: Option<i64>,
    pub operator: Option<String>,
    /// Defaults to "operational"
    pub status: Option<String>,
    pub description: Option<String>,
}

impl CreateRefineryRequest {
    pub fn validate(&self) -> ApiResult<()> {
        validate_string_length(&self.name, "name", 1, 255)?;
        validate_not_empty(&self.country, "country")?;
        validate_not_empty(&self.region, "region")?;
        validate_coordinates(self.lat, self.lng)?;
        validate_capacity(self.capacity_bpd)?;
        if let Some(status) = &self.status {
            validate_one_of(status, "status", REFINERY_STATUSES)?;
        }
        Ok(())
    }

    pub fn into_new(self) -> NewRefinery {
        NewRefinery {
            name: self.name,
            country: self.country,
            region: self.region,
            lat: self.lat,
            lng: self.lng,
            capacity_bpd: self.capacity_bpd,
            operator: self.operator,
            status: self.status.unwrap_or_else(|| "operational".to_string()),
            description: self.description,
        }
    }
}

/// Request to update a refinery; absent fields are kept
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRefineryRequest {
    pub name: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub capacity_bpd: Option<i64>,
    pub operator: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
}

impl UpdateRefineryRequest {
    pub fn has_updates(&self) -> bool {
        self.name.is_some()
            || self.country.is_some()
            || self.region.is_some()
            || self.lat.is_some()
            || self.lng.is_some()
            || self.capacity_bpd.is_some()
            || self.operator.is_some()
            || self.status.is_some()
            || self.description.is_some()
    }

    pub fn validate(&self) -> ApiResult<()> {
        if let Some(name) = &self.name {
            validate_string_length(name, "name", 1, 255)?;
        }
        if self.lat.is_some() || self.lng.is_some() {
            validate_coordinates(self.lat.unwrap_or(0.0), self.lng.unwrap_or(0.0))?;
        }
        validate_capacity(self.capacity_bpd)?;
        if let Some(status) = &self.status {
            validate_one_of(status, "status", REFINERY_STATUSES)?;
        }
        Ok(())
    }

    pub fn into_update(self) -> RefineryUpdate {
        RefineryUpdate {
            name: self.name,
            country: self.country,
            region: self.region,
            lat: self.lat,
            lng: self.lng,
            capacity_bpd: self.capacity_bpd,
            operator: self.operator,
            status: self.status,
            description: self.description,
        }
    }
}
