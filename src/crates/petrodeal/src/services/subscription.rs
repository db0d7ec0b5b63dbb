//! Subscription lifecycle: trials, plan changes, cancellation

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::db::models::Subscription;
use crate::db::repositories::SubscriptionRepository;
use crate::db::{DatabaseError, DatabasePool};
use crate::subscription::{evaluate_access, AccessState, Plan, SubscriptionStatus};

/// Length of a paid billing period
pub const BILLING_PERIOD_DAYS: i64 = 30;

#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("User already has a subscription")]
    AlreadySubscribed,

    #[error("No subscription for user")]
    NotFound,

    #[error("Plan '{0}' cannot be selected directly")]
    PlanNotSelectable(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Manages one subscription row per user
#[derive(Debug, Clone)]
pub struct SubscriptionService {
    trial_days: i64,
}

impl SubscriptionService {
    pub fn new(trial_days: i64) -> Self {
        Self { trial_days }
    }

    /// Start the one free trial a user gets
    pub async fn start_trial(
        &self,
        pool: &DatabasePool,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Subscription, SubscriptionError> {
        if SubscriptionRepository::get_by_user(pool, user_id).await?.is_some() {
            return Err(SubscriptionError::AlreadySubscribed);
        }

        let subscription = SubscriptionRepository::create_trial(
            pool,
            &Uuid::new_v4().to_string(),
            user_id,
            now,
            now + Duration::days(self.trial_days),
        )
        .await
        .map_err(|e| {
            if e.is_constraint_violation() {
                SubscriptionError::AlreadySubscribed
            } else {
                SubscriptionError::Database(e)
            }
        })?;

        info!(user_id, trial_end = ?subscription.trial_end, "Started trial");
        Ok(subscription)
    }

    /// Current subscription and the access it grants at `now`
    ///
    /// A lapsed trial still marked `trialing` is rewritten to `expired`.
    pub async fn current(
        &self,
        pool: &DatabasePool,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<(Option<Subscription>, AccessState), SubscriptionError> {
        let Some(mut subscription) = SubscriptionRepository::get_by_user(pool, user_id).await? else {
            return Ok((None, AccessState::NoSubscription));
        };

        let state = evaluate_access(Some(&subscription), now);
        if state == AccessState::TrialExpired
            && subscription.status == SubscriptionStatus::Trialing.as_str()
        {
            SubscriptionRepository::update_status(pool, user_id, SubscriptionStatus::Expired.as_str())
                .await?;
            subscription.status = SubscriptionStatus::Expired.as_str().to_string();
            info!(user_id, "Trial expired");
        }

        Ok((Some(subscription), state))
    }

    /// Access state only
    pub async fn access_state(
        &self,
        pool: &DatabasePool,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<AccessState, SubscriptionError> {
        let subscription = SubscriptionRepository::get_by_user(pool, user_id).await?;
        Ok(evaluate_access(subscription.as_ref(), now))
    }

    /// Move onto a paid plan, starting a new billing period at `now`
    pub async fn change_plan(
        &self,
        pool: &DatabasePool,
        user_id: &str,
        plan: Plan,
        now: DateTime<Utc>,
    ) -> Result<Subscription, SubscriptionError> {
        if !plan.is_paid() {
            return Err(SubscriptionError::PlanNotSelectable(plan.to_string()));
        }

        if SubscriptionRepository::get_by_user(pool, user_id).await?.is_none() {
            // Record a zero-length trial so the user cannot start one later
            SubscriptionRepository::create_trial(pool, &Uuid::new_v4().to_string(), user_id, now, now)
                .await?;
        }

        let subscription = SubscriptionRepository::update_plan(
            pool,
            user_id,
            plan.as_str(),
            now,
            now + Duration::days(BILLING_PERIOD_DAYS),
        )
        .await?;

        info!(user_id, plan = %plan, "Plan changed");
        Ok(subscription)
    }

    /// Cancel; paid access runs until the end of the current period
    pub async fn cancel(
        &self,
        pool: &DatabasePool,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Subscription, SubscriptionError> {
        if SubscriptionRepository::get_by_user(pool, user_id).await?.is_none() {
            return Err(SubscriptionError::NotFound);
        }
        let subscription = SubscriptionRepository::cancel(pool, user_id, now).await?;
        info!(user_id, "Subscription canceled");
        Ok(subscription)
    }
}
