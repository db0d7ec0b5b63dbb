//! Repository pattern implementations for database access
//!
//! One repository struct per table, each a set of associated async functions
//! taking the connection pool.

pub mod company_repo;
pub mod configuration_repo;
pub mod deal_repo;
pub mod document_repo;
pub mod port_repo;
pub mod refinery_repo;
pub mod session_repo;
pub mod subscription_repo;
pub mod user_repo;
pub mod vessel_repo;

// Re-export all repositories for convenient access
pub use company_repo::{CompanyRepository, CompanyUpdate, NewCompany};
pub use configuration_repo::ConfigurationRepository;
pub use deal_repo::{DealFilter, DealRepository, DealUpdate, NewDeal};
pub use document_repo::{DocumentRepository, NewDocument};
pub use port_repo::{NewPort, PortRepository, PortUpdate};
pub use refinery_repo::{NewRefinery, RefineryRepository, RefineryUpdate};
pub use session_repo::SessionRepository;
pub use subscription_repo::SubscriptionRepository;
pub use user_repo::{NewUser, UserRepository};
pub use vessel_repo::{NewVessel, VesselFilter, VesselRepository, VesselUpdate};

/// Limit/offset window for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: i64,
    pub offset: i64,
}

impl PageWindow {
    /// Window for a 0-indexed page
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            limit: i64::from(per_page),
            offset: i64::from(page) * i64::from(per_page),
        }
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self::new(0, 20)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_window_offsets() {
        assert_eq!(PageWindow::new(0, 20).offset, 0);
        assert_eq!(PageWindow::new(3, 25), PageWindow { limit: 25, offset: 75 });
    }
}
