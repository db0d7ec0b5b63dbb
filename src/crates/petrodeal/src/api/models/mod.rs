//! API data transfer objects (DTOs) and response models
//!
//! Request structures carry their own validation; database models are
//! returned as-is where they need no reshaping.

pub mod auth;
pub mod company;
pub mod deal;
pub mod document;
pub mod port;
pub mod refinery;
pub mod subscription;
pub mod vessel;

pub use auth::{LoginRequest, LoginResponse, RegisterRequest};
pub use company::{CreateCompanyRequest, UpdateCompanyRequest};
pub use deal::{CreateDealRequest, DealListQuery, DealResponse, UpdateDealRequest};
pub use document::CreateDocumentRequest;
pub use port::{CreatePortRequest, NearbyQuery, NearbyVesselsResponse, ProximityQuery, UpdatePortRequest};
pub use refinery::{CreateRefineryRequest, UpdateRefineryRequest};
pub use subscription::{ChangePlanRequest, SubscriptionResponse};
pub use vessel::{CreateVesselRequest, ProgressQuery, UpdateVesselRequest, VesselListQuery};

use serde::{Deserialize, Serialize};

/// Query parameters for ports, refineries and companies
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceListQuery {
    pub region: Option<String>,
    pub country: Option<String>,
    /// Case-insensitive substring of the name
    pub search: Option<String>,
    /// Current page (0-indexed, default 0)
    pub page: Option<u32>,
    /// Items per page (default 20, max 100)
    pub per_page: Option<u32>,
}

impl ReferenceListQuery {
    /// Whether a row with these attributes passes the filters
    pub fn matches(&self, name: &str, country: Option<&str>, region: Option<&str>) -> bool {
        if let Some(wanted) = &self.region {
            if !region.is_some_and(|r| r.eq_ignore_ascii_case(wanted)) {
                return false;
            }
        }
        if let Some(wanted) = &self.country {
            if !country.is_some_and(|c| c.eq_ignore_ascii_case(wanted)) {
                return false;
            }
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            if !name.to_lowercase().contains(&search.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

/// System health response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status
    pub status: String,

    /// Database connection status
    pub database: String,

    /// API version
    pub version: String,

    /// Current timestamp
    pub timestamp: String,
}

impl HealthResponse {
    pub fn new(status: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            database: database.into(),
            version: crate::version::VERSION.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Server status response
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub name: String,
    /// Stable server id, persisted in configurations
    pub uuid: String,
    pub version: String,
    pub status: String,
    pub uptime_secs: u64,
    pub database: String,
    pub database_pool: crate::db::PoolStatistics,
    pub simulation_enabled: bool,
    pub narrator: String,
    pub websocket: crate::api::ws::MetricsSnapshot,
    pub websocket_pool: crate::api::ws::PoolStats,
}

/// A labelled count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountEntry {
    pub key: String,
    pub count: i64,
}

impl CountEntry {
    pub fn from_rows(rows: Vec<(String, i64)>) -> Vec<Self> {
        rows.into_iter()
            .map(|(key, count)| CountEntry { key, count })
            .collect()
    }
}

/// Public dashboard counts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub vessels: i64,
    pub ports: i64,
    pub refineries: i64,
    pub companies: i64,
    pub deals: i64,
    pub vessels_by_status: Vec<CountEntry>,
    pub vessels_by_region: Vec<CountEntry>,
    pub deals_by_status: Vec<CountEntry>,
    pub subscriptions_by_plan: Vec<CountEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response() {
        let health = HealthResponse::new("ok", "connected");
        assert_eq!(health.status, "ok");
        assert_eq!(health.database, "connected");
        assert!(!health.version.is_empty());
        assert!(!health.timestamp.is_empty());
    }

    #[test]
    fn test_reference_query_matching() {
        let query = ReferenceListQuery {
            region: Some("asia".to_string()),
            search: Some("JAM".to_string()),
            ..Default::default()
        };
        assert!(query.matches("Jamnagar", Some("India"), Some("Asia")));
        assert!(!query.matches("Jamnagar", Some("India"), Some("Europe")));
        assert!(!query.matches("Ruwais", Some("UAE"), Some("Asia")));
        assert!(!query.matches("Jamnagar", Some("India"), None));
        assert!(ReferenceListQuery::default().matches("Anything", None, None));
    }

    #[test]
    fn test_count_entries() {
        let entries = CountEntry::from_rows(vec![("underway".to_string(), 3)]);
        assert_eq!(entries, vec![CountEntry { key: "underway".to_string(), count: 3 }]);
    }
}
