//! Vessel API models and DTOs

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::middleware::validation::{
    validate_coordinates, validate_not_empty, validate_one_of, validate_optional_uuid,
    validate_string_length, validate_timestamp,
};
use crate::db::models::vessel::VESSEL_STATUSES;
use crate::db::repositories::{NewVessel, VesselFilter, VesselUpdate};

/// IMO numbers are seven digits
fn validate_imo(imo: &str) -> ApiResult<()> {
    if imo.len() != 7 || !imo.chars().all(|c| c.is_ascii_digit()) {
        return Err(ApiError::ValidationError(format!("Invalid IMO number: {}", imo)));
    }
    Ok(())
}

fn validate_position(lat: Option<f64>, lng: Option<f64>) -> ApiResult<()> {
    match (lat, lng) {
        (Some(lat), Some(lng)) => validate_coordinates(lat, lng),
        (None, None) => Ok(()),
        _ => Err(ApiError::ValidationError(
            "current_lat and current_lng must be given together".to_string(),
        )),
    }
}

fn validate_speed(speed: Option<f64>) -> ApiResult<()> {
    match speed {
        Some(s) if !(s.is_finite() && (0.0..=60.0).contains(&s)) => Err(ApiError::ValidationError(
            "speed_knots must be between 0 and 60".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Request to register a vessel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVesselRequest {
    pub name: String,
    /// Seven-digit IMO number (unique)
    pub imo: String,
    pub mmsi: Option<String>,
    pub vessel_type: String,
    pub flag: Option<String>,
    pub built: Option<i64>,
    pub deadweight: Option<i64>,
    pub current_lat: Option<f64>,
    pub current_lng: Option<f64>,
    pub current_region: Option<String>,
    /// Defaults to 0
    pub speed_knots: Option<f64>,
    /// Defaults to "at_port"
    pub status: Option<String>,
    pub cargo_type: Option<String>,
    pub cargo_capacity: Option<i64>,
    pub departure_port_id: Option<String>,
    pub destination_port_id: Option<String>,
    pub departure_date: Option<String>,
    pub eta: Option<String>,
    pub company_id: Option<String>,
}

impl CreateVesselRequest {
    pub fn validate(&self) -> ApiResult<()> {
        validate_not_empty(&self.name, "name")?;
        validate_string_length(&self.name, "name", 1, 255)?;
        validate_imo(&self.imo)?;
        validate_not_empty(&self.vessel_type, "vessel_type")?;
        validate_position(self.current_lat, self.current_lng)?;
        validate_speed(self.speed_knots)?;
        if let Some(status) = &self.status {
            validate_one_of(status, "status", VESSEL_STATUSES)?;
        }
        validate_optional_uuid(self.departure_port_id.as_deref())?;
        validate_optional_uuid(self.destination_port_id.as_deref())?;
        validate_optional_uuid(self.company_id.as_deref())?;
        if let Some(departure) = &self.departure_date {
            validate_timestamp(departure, "departure_date")?;
        }
        if let Some(eta) = &self.eta {
            validate_timestamp(eta, "eta")?;
        }
        Ok(())
    }

    pub fn into_new(self) -> NewVessel {
        NewVessel {
            name: self.name,
            imo: self.imo,
            mmsi: self.mmsi,
            vessel_type: self.vessel_type,
            flag: self.flag,
            built: self.built,
            deadweight: self.deadweight,
            current_lat: self.current_lat,
            current_lng: self.current_lng,
            current_region: self.current_region,
            speed_knots: self.speed_knots.unwrap_or(0.0),
            status: self.status.unwrap_or_else(|| "at_port".to_string()),
            cargo_type: self.cargo_type,
            cargo_capacity: self.cargo_capacity,
            departure_port_id: self.departure_port_id,
            destination_port_id: self.destination_port_id,
            departure_date: self.departure_date,
            eta: self.eta,
            company_id: self.company_id,
        }
    }
}

/// Request to update a vessel; absent fields are kept
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateVesselRequest {
    pub name: Option<String>,
    pub mmsi: Option<String>,
    pub vessel_type: Option<String>,
    pub flag: Option<String>,
    pub deadweight: Option<i64>,
    pub current_lat: Option<f64>,
    pub current_lng: Option<f64>,
    pub current_region: Option<String>,
    pub speed_knots: Option<f64>,
    pub status: Option<String>,
    pub cargo_type: Option<String>,
    pub cargo_capacity: Option<i64>,
    pub departure_port_id: Option<String>,
    pub destination_port_id: Option<String>,
    pub departure_date: Option<String>,
    pub eta: Option<String>,
    pub company_id: Option<String>,
}

impl UpdateVesselRequest {
    pub fn has_updates(&self) -> bool {
        self.name.is_some()
            || self.mmsi.is_some()
            || self.vessel_type.is_some()
            || self.flag.is_some()
            || self.deadweight.is_some()
            || self.current_lat.is_some()
            || self.current_lng.is_some()
            || self.current_region.is_some()
            || self.speed_knots.is_some()
            || self.status.is_some()
            || self.cargo_type.is_some()
            || self.cargo_capacity.is_some()
            || self.departure_port_id.is_some()
            || self.destination_port_id.is_some()
            || self.departure_date.is_some()
            || self.eta.is_some()
            || self.company_id.is_some()
    }

    pub fn validate(&self) -> ApiResult<()> {
        if let Some(name) = &self.name {
            validate_string_length(name, "name", 1, 255)?;
        }
        validate_position(self.current_lat, self.current_lng)?;
        validate_speed(self.speed_knots)?;
        if let Some(status) = &self.status {
            validate_one_of(status, "status", VESSEL_STATUSES)?;
        }
        validate_optional_uuid(self.departure_port_id.as_deref())?;
        validate_optional_uuid(self.destination_port_id.as_deref())?;
        validate_optional_uuid(self.company_id.as_deref())?;
        if let Some(departure) = &self.departure_date {
            validate_timestamp(departure, "departure_date")?;
        }
        if let Some(eta) = &self.eta {
            validate_timestamp(eta, "eta")?;
        }
        Ok(())
    }

    pub fn into_update(self) -> VesselUpdate {
        VesselUpdate {
            name: self.name,
            mmsi: self.mmsi,
            vessel_type: self.vessel_type,
            flag: self.flag,
            deadweight: self.deadweight,
            current_lat: self.current_lat,
            current_lng: self.current_lng,
            current_region: self.current_region,
            speed_knots: self.speed_knots,
            status: self.status,
            cargo_type: self.cargo_type,
            cargo_capacity: self.cargo_capacity,
            departure_port_id: self.departure_port_id,
            destination_port_id: self.destination_port_id,
            departure_date: self.departure_date,
            eta: self.eta,
            company_id: self.company_id,
        }
    }
}

/// Query parameters for listing vessels
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VesselListQuery {
    pub region: Option<String>,
    pub status: Option<String>,
    pub vessel_type: Option<String>,
    pub company_id: Option<String>,
    /// Matches name or IMO
    pub search: Option<String>,
    /// Current page (0-indexed, default 0)
    pub page: Option<u32>,
    /// Items per page (default 20, max 100)
    pub per_page: Option<u32>,
}

impl VesselListQuery {
    pub fn filter(&self) -> VesselFilter {
        VesselFilter {
            region: self.region.clone(),
            status: self.status.clone(),
            vessel_type: self.vessel_type.clone(),
            company_id: self.company_id.clone(),
            search: self.search.clone().filter(|s| !s.trim().is_empty()),
        }
    }
}

/// Query parameters for voyage progress
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressQuery {
    /// Ask for a written narrative (needs AI insights)
    #[serde(default)]
    pub narrative: bool,
}
