//! Subscription API models and DTOs

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::db::models::Subscription;
use crate::subscription::{effective_capabilities, AccessState, Capabilities, Plan};

/// Request to move onto a paid plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePlanRequest {
    pub plan: String,
}

impl ChangePlanRequest {
    pub fn plan(&self) -> ApiResult<Plan> {
        self.plan
            .parse::<Plan>()
            .map_err(|_| ApiError::ValidationError(format!("Unknown plan: {}", self.plan)))
    }
}

/// A user's subscription and what it currently grants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionResponse {
    pub subscription: Option<Subscription>,
    pub access: AccessState,
    pub capabilities: Capabilities,
}

impl SubscriptionResponse {
    pub fn new(subscription: Option<Subscription>, access: AccessState) -> Self {
        Self {
            subscription,
            access,
            capabilities: effective_capabilities(access),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_plan_parsing() {
        let req = ChangePlanRequest {
            plan: "professional".to_string(),
        };
        assert_eq!(req.plan().unwrap(), Plan::Professional);

        let req = ChangePlanRequest {
            plan: "platinum".to_string(),
        };
        assert!(req.plan().is_err());
    }

    #[test]
    fn test_response_capabilities_follow_access() {
        let resp = SubscriptionResponse::new(None, AccessState::TrialExpired);
        assert!(resp.capabilities.vessel_tracking);
        assert!(!resp.capabilities.broker_deals);
    }
}
