//! API request handlers
//!
//! Provides handler functions for all API endpoints organized by resource.

pub mod auth;
pub mod companies;
pub mod deals;
pub mod documents;
pub mod health;
pub mod ports;
pub mod proximity;
pub mod refineries;
pub mod subscriptions;
pub mod system;
pub mod vessels;

pub use auth::{login, logout, me, register};
pub use companies::{company_vessels, create_company, delete_company, get_company, list_companies, update_company};
pub use deals::{create_deal, delete_deal, get_deal, list_deals, update_deal};
pub use documents::{create_document, delete_document, get_document, list_vessel_documents};
pub use health::{health, health_detailed};
pub use ports::{create_port, delete_port, get_port, list_ports, port_nearby_vessels, update_port};
pub use proximity::ports_proximity;
pub use refineries::{
    create_refinery, delete_refinery, get_refinery, list_refineries, refinery_nearby_vessels,
    update_refinery,
};
pub use subscriptions::{cancel_subscription, change_plan, list_plans, my_subscription, start_trial};
pub use system::{stats, status};
pub use vessels::{
    create_vessel, delete_vessel, get_vessel, list_vessels, update_vessel, vessel_positions,
    vessel_progress,
};

use crate::api::error::ApiResult;
use crate::api::middleware::validation::{validate_pagination, validate_radius};
use crate::api::routes::AppState;

pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

/// Page and page size with defaults applied
pub(crate) fn page_params(page: Option<u32>, per_page: Option<u32>) -> ApiResult<(u32, u32)> {
    let page = page.unwrap_or(0);
    let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE);
    validate_pagination(page, per_page, MAX_PER_PAGE)?;
    Ok((page, per_page))
}

/// One page of an in-memory list, plus the unpaged total
pub(crate) fn paginate<T>(items: Vec<T>, page: u32, per_page: u32) -> (Vec<T>, u32) {
    let total = total_u32(items.len() as i64);
    let offset = (page as usize).saturating_mul(per_page as usize);
    let data = items.into_iter().skip(offset).take(per_page as usize).collect();
    (data, total)
}

pub(crate) fn total_u32(total: i64) -> u32 {
    u32::try_from(total.max(0)).unwrap_or(u32::MAX)
}

/// Requested radius, or the configured default, capped by the configured maximum
pub(crate) fn resolve_radius(state: &AppState, radius_km: Option<f64>) -> ApiResult<f64> {
    let proximity = &state.config.proximity;
    validate_radius(radius_km.unwrap_or(proximity.default_radius_km), proximity.max_radius_km)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_params_defaults_and_limits() {
        assert_eq!(page_params(None, None).unwrap(), (0, DEFAULT_PER_PAGE));
        assert_eq!(page_params(Some(2), Some(50)).unwrap(), (2, 50));
        assert!(page_params(None, Some(0)).is_err());
        assert!(page_params(None, Some(MAX_PER_PAGE + 1)).is_err());
    }

    #[test]
    fn test_paginate_slices_in_memory() {
        let items: Vec<u32> = (0..25).collect();
        let (page, total) = paginate(items.clone(), 1, 10);
        assert_eq!(total, 25);
        assert_eq!(page, (10..20).collect::<Vec<_>>());

        let (page, total) = paginate(items, 5, 10);
        assert_eq!(total, 25);
        assert!(page.is_empty());
    }

    #[test]
    fn test_total_clamps_negative() {
        assert_eq!(total_u32(-3), 0);
        assert_eq!(total_u32(42), 42);
    }
}
