//! Session repository for database operations

use crate::db::connection::DatabasePool;
use crate::db::error::DbResult;
use crate::db::models::Session;
use chrono::{DateTime, Utc};

/// Session repository for managing bearer-token sessions
pub struct SessionRepository;

impl SessionRepository {
    /// Create a new session expiring at `expires_at`
    pub async fn create(
        pool: &DatabasePool,
        id: &str,
        user_id: &str,
        expires_at: DateTime<Utc>,
    ) -> DbResult<Session> {
        let now = Utc::now().to_rfc3339();
        let session = sqlx::query_as::<_, Session>(
            "INSERT INTO sessions (id, user_id, created_at, expires_at, last_seen_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(id)
        .bind(user_id)
        .bind(&now)
        .bind(expires_at.to_rfc3339())
        .bind(&now)
        .fetch_one(pool)
        .await?;

        Ok(session)
    }

    /// Get a session by token regardless of expiry
    pub async fn get_by_id(pool: &DatabasePool, id: &str) -> DbResult<Option<Session>> {
        let session = sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(session)
    }

    /// Get a session by token if it has not expired at `now`
    pub async fn get_valid(
        pool: &DatabasePool,
        id: &str,
        now: DateTime<Utc>,
    ) -> DbResult<Option<Session>> {
        let session = Self::get_by_id(pool, id).await?;
        Ok(session.filter(|s| {
            DateTime::parse_from_rfc3339(&s.expires_at)
                .map(|exp| exp.with_timezone(&Utc) > now)
                .unwrap_or(false)
        }))
    }

    /// Record activity on a session
    pub async fn touch(pool: &DatabasePool, id: &str) -> DbResult<()> {
        sqlx::query("UPDATE sessions SET last_seen_at = ? WHERE id = ?")
            .bind(Utc::now().to_rfc3339())
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Delete a session (logout); returns whether a row was removed
    pub async fn delete(pool: &DatabasePool, id: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Purge sessions that expired before `now`
    pub async fn delete_expired(pool: &DatabasePool, now: DateTime<Utc>) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at < ?")
            .bind(now.to_rfc3339())
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Count sessions
    pub async fn count(pool: &DatabasePool) -> DbResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sessions")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
