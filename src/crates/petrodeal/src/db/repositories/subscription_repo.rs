//! Subscription repository for database operations

use crate::db::connection::DatabasePool;
use crate::db::error::{DatabaseError, DbResult};
use crate::db::models::Subscription;
use chrono::{DateTime, Utc};

/// Subscription repository; one row per user
pub struct SubscriptionRepository;

impl SubscriptionRepository {
    /// Start a trial running from `start` to `end`
    pub async fn create_trial(
        pool: &DatabasePool,
        id: &str,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Subscription> {
        let now = Utc::now().to_rfc3339();
        let subscription = sqlx::query_as::<_, Subscription>(
            "INSERT INTO subscriptions (id, user_id, plan, status, trial_start, trial_end,
                 created_at, updated_at)
             VALUES (?, ?, 'trial', 'trialing', ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(id)
        .bind(user_id)
        .bind(start.to_rfc3339())
        .bind(end.to_rfc3339())
        .bind(&now)
        .bind(&now)
        .fetch_one(pool)
        .await?;

        Ok(subscription)
    }

    /// Get the subscription of a user
    pub async fn get_by_user(pool: &DatabasePool, user_id: &str) -> DbResult<Option<Subscription>> {
        let subscription =
            sqlx::query_as::<_, Subscription>("SELECT * FROM subscriptions WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(pool)
                .await?;
        Ok(subscription)
    }

    /// Move a user onto a paid plan for the period `[start, end)`
    pub async fn update_plan(
        pool: &DatabasePool,
        user_id: &str,
        plan: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Subscription> {
        let subscription = sqlx::query_as::<_, Subscription>(
            "UPDATE subscriptions SET
                 plan = ?, status = 'active',
                 current_period_start = ?, current_period_end = ?,
                 canceled_at = NULL, updated_at = ?
             WHERE user_id = ?
             RETURNING *",
        )
        .bind(plan)
        .bind(start.to_rfc3339())
        .bind(end.to_rfc3339())
        .bind(Utc::now().to_rfc3339())
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        subscription.ok_or_else(|| DatabaseError::not_found(format!("subscription for {}", user_id)))
    }

    /// Set the status column only
    pub async fn update_status(pool: &DatabasePool, user_id: &str, status: &str) -> DbResult<()> {
        let result =
            sqlx::query("UPDATE subscriptions SET status = ?, updated_at = ? WHERE user_id = ?")
                .bind(status)
                .bind(Utc::now().to_rfc3339())
                .bind(user_id)
                .execute(pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found(format!("subscription for {}", user_id)));
        }
        Ok(())
    }

    /// Cancel the subscription at `at`
    pub async fn cancel(
        pool: &DatabasePool,
        user_id: &str,
        at: DateTime<Utc>,
    ) -> DbResult<Subscription> {
        let subscription = sqlx::query_as::<_, Subscription>(
            "UPDATE subscriptions SET status = 'canceled', canceled_at = ?, updated_at = ?
             WHERE user_id = ?
             RETURNING *",
        )
        .bind(at.to_rfc3339())
        .bind(Utc::now().to_rfc3339())
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        subscription.ok_or_else(|| DatabaseError::not_found(format!("subscription for {}", user_id)))
    }

    /// Count subscriptions grouped by plan
    pub async fn count_by_plan(pool: &DatabasePool) -> DbResult<Vec<(String, i64)>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT plan, COUNT(*) FROM subscriptions GROUP BY plan ORDER BY plan",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{NewUser, UserRepository};
    use crate::db::DatabaseConnection;
    use chrono::Duration;

    async fn setup() -> DatabaseConnection {
        let db = DatabaseConnection::in_memory().await.unwrap();
        UserRepository::create(
            db.pool(),
            "u-1",
            NewUser {
                username: "trader".to_string(),
                email: "trader@example.com".to_string(),
                password_hash: "hash".to_string(),
                role: "user".to_string(),
            },
        )
        .await
        .unwrap();
        db
    }

    #[tokio::test]
    async fn test_trial_then_upgrade_then_cancel() {
        let db = setup().await;
        let start = Utc::now();
        let trial = SubscriptionRepository::create_trial(
            db.pool(),
            "s-1",
            "u-1",
            start,
            start + Duration::days(5),
        )
        .await
        .unwrap();
        assert_eq!(trial.plan, "trial");
        assert_eq!(trial.status, "trialing");

        let upgraded = SubscriptionRepository::update_plan(
            db.pool(),
            "u-1",
            "professional",
            start,
            start + Duration::days(30),
        )
        .await
        .unwrap();
        assert_eq!(upgraded.plan, "professional");
        assert_eq!(upgraded.status, "active");

        let canceled = SubscriptionRepository::cancel(db.pool(), "u-1", Utc::now())
            .await
            .unwrap();
        assert_eq!(canceled.status, "canceled");
        assert!(canceled.canceled_at.is_some());
    }

    #[tokio::test]
    async fn test_one_subscription_per_user() {
        let db = setup().await;
        let now = Utc::now();
        SubscriptionRepository::create_trial(db.pool(), "s-1", "u-1", now, now)
            .await
            .unwrap();
        let err = SubscriptionRepository::create_trial(db.pool(), "s-2", "u-1", now, now)
            .await
            .unwrap_err();
        assert!(err.is_constraint_violation());
    }

    #[tokio::test]
    async fn test_update_missing_subscription() {
        let db = setup().await;
        let err = SubscriptionRepository::update_status(db.pool(), "u-1", "expired")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
