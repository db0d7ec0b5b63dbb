//! Subscription model for database persistence

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user's plan subscription
///
/// `plan` and `status` hold the wire names of
/// [`Plan`](crate::subscription::Plan) and
/// [`SubscriptionStatus`](crate::subscription::SubscriptionStatus).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subscription {
    pub id: String,

    /// Owning user (one subscription per user)
    pub user_id: String,

    /// trial, basic, professional, enterprise
    pub plan: String,

    /// trialing, active, past_due, canceled, expired
    pub status: String,

    pub trial_start: Option<String>,

    pub trial_end: Option<String>,

    pub current_period_start: Option<String>,

    pub current_period_end: Option<String>,

    pub canceled_at: Option<String>,

    /// Creation timestamp (RFC 3339 string)
    pub created_at: String,

    /// Last update timestamp (RFC 3339 string)
    pub updated_at: String,
}
