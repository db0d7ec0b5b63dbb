//! Request validation helpers
//!
//! Every helper fails with `ApiError::ValidationError` (422).

use crate::api::error::{ApiError, ApiResult};
use crate::geo::Coordinates;

/// Validate that a required string field is not empty
pub fn validate_not_empty(value: &str, field_name: &str) -> ApiResult<()> {
    if value.is_empty() {
        return Err(ApiError::ValidationError(format!("{} cannot be empty", field_name)));
    }
    Ok(())
}

/// Validate string length constraints
pub fn validate_string_length(value: &str, field_name: &str, min: usize, max: usize) -> ApiResult<()> {
    if value.len() < min || value.len() > max {
        return Err(ApiError::ValidationError(
            format!("{} must be between {} and {} characters", field_name, min, max)
        ));
    }
    Ok(())
}

/// Validate pagination parameters
pub fn validate_pagination(_page: u32, per_page: u32, max_per_page: u32) -> ApiResult<()> {
    if per_page == 0 {
        return Err(ApiError::ValidationError("per_page must be greater than 0".to_string()));
    }
    if per_page > max_per_page {
        return Err(ApiError::ValidationError(
            format!("per_page cannot exceed {}", max_per_page)
        ));
    }
    Ok(())
}

/// Validate UUID format
pub fn validate_uuid(value: &str) -> ApiResult<uuid::Uuid> {
    uuid::Uuid::parse_str(value)
        .map_err(|_| ApiError::ValidationError(format!("Invalid UUID: {}", value)))
}

/// Validate an optional UUID reference in a request body
pub fn validate_optional_uuid(value: Option<&str>) -> ApiResult<()> {
    if let Some(value) = value {
        validate_uuid(value)?;
    }
    Ok(())
}

/// Validate a latitude/longitude pair
pub fn validate_coordinates(lat: f64, lng: f64) -> ApiResult<()> {
    if !Coordinates::new(lat, lng).is_valid() {
        return Err(ApiError::ValidationError(format!(
            "Invalid coordinates: lat {} lng {}",
            lat, lng
        )));
    }
    Ok(())
}

/// Validate a proximity radius; must be finite, positive and at most `max_km`
pub fn validate_radius(radius_km: f64, max_km: f64) -> ApiResult<f64> {
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(ApiError::ValidationError(
            "radius_km must be a positive number".to_string(),
        ));
    }
    if radius_km > max_km {
        return Err(ApiError::ValidationError(format!(
            "radius_km cannot exceed {}",
            max_km
        )));
    }
    Ok(radius_km)
}

/// Validate that a value is one of an allowed set
pub fn validate_one_of(value: &str, field_name: &str, allowed: &[&str]) -> ApiResult<()> {
    if !allowed.contains(&value) {
        return Err(ApiError::ValidationError(format!(
            "{} must be one of: {}",
            field_name,
            allowed.join(", ")
        )));
    }
    Ok(())
}

/// Validate an RFC 3339 timestamp
pub fn validate_timestamp(value: &str, field_name: &str) -> ApiResult<()> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|_| ())
        .map_err(|_| ApiError::ValidationError(format!("{} must be an RFC 3339 timestamp", field_name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_empty_valid() {
        assert!(validate_not_empty("hello", "name").is_ok());
    }

    #[test]
    fn test_validate_not_empty_empty() {
        assert!(validate_not_empty("", "name").is_err());
    }

    #[test]
    fn test_validate_string_length_valid() {
        assert!(validate_string_length("hello", "name", 1, 10).is_ok());
    }

    #[test]
    fn test_validate_string_length_too_short() {
        assert!(validate_string_length("hi", "name", 5, 10).is_err());
    }

    #[test]
    fn test_validate_string_length_too_long() {
        assert!(validate_string_length("very long string", "name", 1, 5).is_err());
    }

    #[test]
    fn test_validate_pagination_valid() {
        assert!(validate_pagination(0, 10, 100).is_ok());
    }

    #[test]
    fn test_validate_pagination_zero_per_page() {
        assert!(validate_pagination(0, 0, 100).is_err());
    }

    #[test]
    fn test_validate_pagination_exceeds_max() {
        assert!(validate_pagination(0, 150, 100).is_err());
    }

    #[test]
    fn test_validate_uuid_valid() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        assert!(validate_uuid(uuid_str).is_ok());
    }

    #[test]
    fn test_validate_uuid_invalid() {
        assert!(validate_uuid("invalid-uuid").is_err());
        assert!(validate_optional_uuid(Some("nope")).is_err());
        assert!(validate_optional_uuid(None).is_ok());
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(51.9, 4.1).is_ok());
        assert!(validate_coordinates(91.0, 0.0).is_err());
        assert!(validate_coordinates(0.0, f64::NAN).is_err());
    }

    #[test]
    fn test_validate_radius() {
        assert_eq!(validate_radius(50.0, 2000.0).unwrap(), 50.0);
        assert!(validate_radius(0.0, 2000.0).is_err());
        assert!(validate_radius(-1.0, 2000.0).is_err());
        assert!(validate_radius(f64::INFINITY, 2000.0).is_err());
        assert!(validate_radius(2500.0, 2000.0).is_err());
    }

    #[test]
    fn test_validate_one_of_and_timestamp() {
        assert!(validate_one_of("oil", "port_type", &["oil", "lng"]).is_ok());
        assert!(validate_one_of("gas", "port_type", &["oil", "lng"]).is_err());
        assert!(validate_timestamp("2025-03-01T12:00:00Z", "eta").is_ok());
        assert!(validate_timestamp("tomorrow", "eta").is_err());
    }
}
