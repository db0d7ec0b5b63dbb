//! Port API models and DTOs

use serde::{Deserialize, Serialize};

use crate::api::error::ApiResult;
use crate::api::middleware::validation::{
    validate_coordinates, validate_not_empty, validate_one_of, validate_string_length,
};
use crate::db::models::port::{PORT_STATUSES, PORT_TYPES};
use crate::db::repositories::{NewPort, PortUpdate};

/// Request to create a port
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePortRequest {
    pub name: String,
    pub country: String,
    pub region: String,
    pub lat: f64,
    pub lng: f64,
    /// Defaults to "oil"
    pub port_type: Option<String>,
    pub capacity: Option<i64>,
    /// Defaults to "operational"
    pub status: Option<String>,
    pub description: Option<String>,
}

impl CreatePortRequest {
    pub fn validate(&self) -> ApiResult<()> {
        validate_string_length(&self.name, "name", 1, 255)?;
        validate_not_empty(&self.country, "country")?;
        validate_not_empty(&self.region, "region")?;
        validate_coordinates(self.lat, self.lng)?;
        if let Some(port_type) = &self.port_type {
            validate_one_of(port_type, "port_type", PORT_TYPES)?;
        }
        if let Some(status) = &self.status {
            validate_one_of(status, "status", PORT_STATUSES)?;
        }
        Ok(())
    }

    pub fn into_new(self) -> NewPort {
        NewPort {
            name: self.name,
            country: self.country,
            region: self.region,
            lat: self.lat,
            lng: self.lng,
            port_type: self.port_type.unwrap_or_else(|| "oil".to_string()),
            capacity: self.capacity,
            status: self.status.unwrap_or_else(|| "operational".to_string()),
            description: self.description,
        }
    }
}

/// Request to update a port; absent fields are kept
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePortRequest {
    pub name: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub port_type: Option<String>,
    pub capacity: Option<i64>,
    pub status: Option<String>,
    pub description: Option<String>,
}

impl UpdatePortRequest {
    pub fn has_updates(&self) -> bool {
        self.name.is_some()
            || self.country.is_some()
            || self.region.is_some()
            || self.lat.is_some()
            || self.lng.is_some()
            || self.port_type.is_some()
            || self.capacity.is_some()
            || self.status.is_some()
            || self.description.is_some()
    }

    pub fn validate(&self) -> ApiResult<()> {
        if let Some(name) = &self.name {
            validate_string_length(name, "name", 1, 255)?;
        }
        // A lone coordinate is checked against a neutral partner
        if self.lat.is_some() || self.lng.is_some() {
            validate_coordinates(self.lat.unwrap_or(0.0), self.lng.unwrap_or(0.0))?;
        }
        if let Some(port_type) = &self.port_type {
            validate_one_of(port_type, "port_type", PORT_TYPES)?;
        }
        if let Some(status) = &self.status {
            validate_one_of(status, "status", PORT_STATUSES)?;
        }
        Ok(())
    }

    pub fn into_update(self) -> PortUpdate {
        PortUpdate {
            name: self.name,
            country: self.country,
            region: self.region,
            lat: self.lat,
            lng: self.lng,
            port_type: self.port_type,
            capacity: self.capacity,
            status: self.status,
            description: self.description,
        }
    }
}

/// Query for `GET /api/v1/ports/:id/nearby-vessels`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NearbyQuery {
    /// Defaults to the configured radius
    pub radius_km: Option<f64>,
    pub limit: Option<usize>,
}

/// Query for `GET /api/v1/proximity/ports`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProximityQuery {
    pub radius_km: Option<f64>,
}

/// Vessels near one port or refinery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyVesselsResponse {
    pub origin_id: String,
    pub origin_name: String,
    pub radius_km: f64,
    pub count: usize,
    pub vessels: Vec<crate::geo::NearbyVessel>,
}
