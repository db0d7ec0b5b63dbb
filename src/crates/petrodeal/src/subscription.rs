//! Plan tiers and feature gating
//!
//! A subscription row is reduced to an [`AccessState`] at request time and
//! the state decides which [`Capabilities`] the user has.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::models::Subscription;

/// Subscription plan tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Trial,
    Basic,
    Professional,
    Enterprise,
}

impl Plan {
    pub const ALL: [Plan; 4] = [Plan::Trial, Plan::Basic, Plan::Professional, Plan::Enterprise];

    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Trial => "trial",
            Plan::Basic => "basic",
            Plan::Professional => "professional",
            Plan::Enterprise => "enterprise",
        }
    }

    /// Whether a user can move onto this plan directly
    pub fn is_paid(&self) -> bool {
        !matches!(self, Plan::Trial)
    }

    /// List price in whole USD per month
    pub fn monthly_price_usd(&self) -> u32 {
        match self {
            Plan::Trial => 0,
            Plan::Basic => 99,
            Plan::Professional => 299,
            Plan::Enterprise => 999,
        }
    }

    /// Features granted by this tier
    pub fn capabilities(&self) -> Capabilities {
        if *self == Plan::Trial {
            return Plan::Professional.capabilities();
        }

        let mut caps = Capabilities::tracking_only();
        caps.port_insights = true;
        caps.realtime_updates = true;
        if *self == Plan::Professional || *self == Plan::Enterprise {
            caps.refinery_access = true;
            caps.broker_deals = true;
            caps.document_access = true;
        }
        if *self == Plan::Enterprise {
            caps.ai_insights = true;
        }
        caps
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Plan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trial" => Ok(Plan::Trial),
            "basic" => Ok(Plan::Basic),
            "professional" => Ok(Plan::Professional),
            "enterprise" => Ok(Plan::Enterprise),
            other => Err(format!("unknown plan '{}'", other)),
        }
    }
}

/// Lifecycle status of a subscription row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Trialing,
    Active,
    PastDue,
    Canceled,
    Expired,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Trialing => "trialing",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Canceled => "canceled",
            SubscriptionStatus::Expired => "expired",
        }
    }
}

impl FromStr for SubscriptionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trialing" => Ok(SubscriptionStatus::Trialing),
            "active" => Ok(SubscriptionStatus::Active),
            "past_due" => Ok(SubscriptionStatus::PastDue),
            "canceled" => Ok(SubscriptionStatus::Canceled),
            "expired" => Ok(SubscriptionStatus::Expired),
            other => Err(format!("unknown subscription status '{}'", other)),
        }
    }
}

/// A single gated feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    VesselTracking,
    PortInsights,
    RefineryAccess,
    BrokerDeals,
    DocumentAccess,
    AiInsights,
    RealtimeUpdates,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::VesselTracking => "vessel_tracking",
            Capability::PortInsights => "port_insights",
            Capability::RefineryAccess => "refinery_access",
            Capability::BrokerDeals => "broker_deals",
            Capability::DocumentAccess => "document_access",
            Capability::AiInsights => "ai_insights",
            Capability::RealtimeUpdates => "realtime_updates",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Feature flags for a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub vessel_tracking: bool,
    pub port_insights: bool,
    pub refinery_access: bool,
    pub broker_deals: bool,
    pub document_access: bool,
    pub ai_insights: bool,
    pub realtime_updates: bool,
}

impl Capabilities {
    /// What an unentitled user may do
    pub fn tracking_only() -> Self {
        Self {
            vessel_tracking: true,
            port_insights: false,
            refinery_access: false,
            broker_deals: false,
            document_access: false,
            ai_insights: false,
            realtime_updates: false,
        }
    }

    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::VesselTracking => self.vessel_tracking,
            Capability::PortInsights => self.port_insights,
            Capability::RefineryAccess => self.refinery_access,
            Capability::BrokerDeals => self.broker_deals,
            Capability::DocumentAccess => self.document_access,
            Capability::AiInsights => self.ai_insights,
            Capability::RealtimeUpdates => self.realtime_updates,
        }
    }
}

/// Entitlement derived from a subscription at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AccessState {
    Active { plan: Plan },
    Trialing { days_left: i64 },
    TrialExpired,
    Inactive,
    NoSubscription,
}

fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn trial_state(trial_end: Option<DateTime<Utc>>, now: DateTime<Utc>) -> AccessState {
    match trial_end {
        Some(end) if now <= end => {
            let seconds = (end - now).num_seconds();
            AccessState::Trialing {
                days_left: (seconds + 86_399) / 86_400,
            }
        }
        _ => AccessState::TrialExpired,
    }
}

/// Reduce a subscription row to an access state at `now`
///
/// Unknown plan or status strings are treated as inactive.
pub fn evaluate_access(subscription: Option<&Subscription>, now: DateTime<Utc>) -> AccessState {
    let Some(sub) = subscription else {
        return AccessState::NoSubscription;
    };
    let (Ok(plan), Ok(status)) = (
        sub.plan.parse::<Plan>(),
        sub.status.parse::<SubscriptionStatus>(),
    ) else {
        return AccessState::Inactive;
    };

    let trial_end = parse_timestamp(sub.trial_end.as_deref());
    let period_end = parse_timestamp(sub.current_period_end.as_deref());

    match status {
        SubscriptionStatus::Trialing => trial_state(trial_end, now),
        SubscriptionStatus::Active if plan == Plan::Trial => trial_state(trial_end, now),
        SubscriptionStatus::Active => AccessState::Active { plan },
        SubscriptionStatus::Canceled if plan == Plan::Trial => match trial_state(trial_end, now) {
            AccessState::TrialExpired => AccessState::Inactive,
            state => state,
        },
        SubscriptionStatus::Canceled => match period_end {
            Some(end) if now < end => AccessState::Active { plan },
            _ => AccessState::Inactive,
        },
        SubscriptionStatus::Expired if plan == Plan::Trial => AccessState::TrialExpired,
        SubscriptionStatus::Expired | SubscriptionStatus::PastDue => AccessState::Inactive,
    }
}

/// Capabilities granted by an access state
pub fn effective_capabilities(state: AccessState) -> Capabilities {
    match state {
        AccessState::Active { plan } => plan.capabilities(),
        AccessState::Trialing { .. } => Plan::Trial.capabilities(),
        _ => Capabilities::tracking_only(),
    }
}

/// A gated feature was requested without entitlement
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{reason}")]
pub struct AccessDenied {
    pub capability: Capability,
    pub state: AccessState,
    pub reason: String,
}

/// Check that `state` grants `capability`
pub fn require(state: AccessState, capability: Capability) -> Result<(), AccessDenied> {
    if effective_capabilities(state).allows(capability) {
        return Ok(());
    }

    let reason = match state {
        AccessState::TrialExpired => {
            format!("Trial has expired; upgrade to use {}", capability)
        }
        AccessState::NoSubscription => {
            format!("A subscription is required to use {}", capability)
        }
        AccessState::Inactive => format!("Subscription is not active; {} unavailable", capability),
        AccessState::Active { plan } => {
            format!("The {} plan does not include {}", plan, capability)
        }
        AccessState::Trialing { .. } => format!("The trial does not include {}", capability),
    };

    Err(AccessDenied {
        capability,
        state,
        reason,
    })
}

/// Public description of a plan
#[derive(Debug, Clone, Serialize)]
pub struct PlanInfo {
    pub plan: Plan,
    pub monthly_price_usd: u32,
    pub capabilities: Capabilities,
}

/// Catalogue of every plan
pub fn plan_catalogue() -> Vec<PlanInfo> {
    Plan::ALL
        .iter()
        .map(|plan| PlanInfo {
            plan: *plan,
            monthly_price_usd: plan.monthly_price_usd(),
            capabilities: plan.capabilities(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn subscription(plan: &str, status: &str) -> Subscription {
        Subscription {
            id: "s-1".to_string(),
            user_id: "u-1".to_string(),
            plan: plan.to_string(),
            status: status.to_string(),
            trial_start: None,
            trial_end: None,
            current_period_start: None,
            current_period_end: None,
            canceled_at: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_tier_rules() {
        let basic = Plan::Basic.capabilities();
        assert!(basic.vessel_tracking && basic.port_insights && basic.realtime_updates);
        assert!(!basic.broker_deals && !basic.refinery_access);

        let pro = Plan::Professional.capabilities();
        assert!(pro.broker_deals && pro.document_access && pro.refinery_access);
        assert!(!pro.ai_insights);

        assert!(Plan::Enterprise.capabilities().ai_insights);
        assert_eq!(Plan::Trial.capabilities(), pro);
    }

    #[test]
    fn test_plan_round_trip_names() {
        for plan in Plan::ALL {
            assert_eq!(plan.as_str().parse::<Plan>().unwrap(), plan);
        }
        assert!("platinum".parse::<Plan>().is_err());
    }

    #[test]
    fn test_trial_days_left_rounds_up() {
        let mut sub = subscription("trial", "trialing");
        sub.trial_end = Some((now() + Duration::hours(30)).to_rfc3339());
        assert_eq!(
            evaluate_access(Some(&sub), now()),
            AccessState::Trialing { days_left: 2 }
        );
    }

    #[test]
    fn test_expired_trial_blocks_deals() {
        let mut sub = subscription("trial", "trialing");
        sub.trial_end = Some((now() - Duration::seconds(1)).to_rfc3339());
        let state = evaluate_access(Some(&sub), now());
        assert_eq!(state, AccessState::TrialExpired);

        let denied = require(state, Capability::BrokerDeals).unwrap_err();
        assert_eq!(denied.capability, Capability::BrokerDeals);
        assert!(denied.reason.contains("expired"));
        assert!(require(state, Capability::VesselTracking).is_ok());
    }

    #[test]
    fn test_canceled_keeps_access_until_period_end() {
        let mut sub = subscription("professional", "canceled");
        sub.current_period_end = Some((now() + Duration::days(3)).to_rfc3339());
        assert_eq!(
            evaluate_access(Some(&sub), now()),
            AccessState::Active {
                plan: Plan::Professional
            }
        );

        sub.current_period_end = Some((now() - Duration::days(1)).to_rfc3339());
        assert_eq!(evaluate_access(Some(&sub), now()), AccessState::Inactive);
    }

    #[test]
    fn test_missing_and_malformed_subscriptions() {
        assert_eq!(evaluate_access(None, now()), AccessState::NoSubscription);
        assert_eq!(
            evaluate_access(Some(&subscription("gold", "active")), now()),
            AccessState::Inactive
        );
        assert_eq!(
            evaluate_access(Some(&subscription("basic", "past_due")), now()),
            AccessState::Inactive
        );
    }

    #[test]
    fn test_basic_plan_lacks_deals() {
        let state = evaluate_access(Some(&subscription("basic", "active")), now());
        let denied = require(state, Capability::BrokerDeals).unwrap_err();
        assert!(denied.reason.contains("basic"));
        assert!(require(state, Capability::PortInsights).is_ok());
    }

    #[test]
    fn test_access_state_serialization() {
        let json = serde_json::to_value(AccessState::Trialing { days_left: 3 }).unwrap();
        assert_eq!(json["state"], "trialing");
        assert_eq!(json["days_left"], 3);
    }

    #[test]
    fn test_catalogue_lists_every_plan() {
        let catalogue = plan_catalogue();
        assert_eq!(catalogue.len(), 4);
        assert_eq!(catalogue[3].monthly_price_usd, 999);
    }
}
