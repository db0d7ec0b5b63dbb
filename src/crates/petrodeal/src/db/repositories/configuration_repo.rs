//! Configuration repository for database operations

use crate::db::connection::DatabasePool;
use crate::db::error::DbResult;
use crate::db::models::Configuration;
use chrono::Utc;

/// Configuration repository for managing key/value server metadata
pub struct ConfigurationRepository;

impl ConfigurationRepository {
    /// Create or update a configuration entry
    pub async fn set(
        pool: &DatabasePool,
        key: &str,
        value: &str,
        value_type: &str,
    ) -> DbResult<Configuration> {
        let now = Utc::now().to_rfc3339();

        let config = sqlx::query_as::<_, Configuration>(
            "INSERT INTO configurations (key, value, value_type, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                 value_type = excluded.value_type, updated_at = excluded.updated_at
             RETURNING *",
        )
        .bind(key)
        .bind(value)
        .bind(value_type)
        .bind(&now)
        .bind(&now)
        .fetch_one(pool)
        .await?;

        Ok(config)
    }

    /// Get a configuration by key
    pub async fn get(pool: &DatabasePool, key: &str) -> DbResult<Option<Configuration>> {
        let config =
            sqlx::query_as::<_, Configuration>("SELECT * FROM configurations WHERE key = ?")
                .bind(key)
                .fetch_optional(pool)
                .await?;
        Ok(config)
    }

    /// Get a value, inserting `default` when the key is missing
    pub async fn get_or_insert(pool: &DatabasePool, key: &str, default: &str) -> DbResult<String> {
        if let Some(existing) = Self::get(pool, key).await? {
            return Ok(existing.value);
        }
        Ok(Self::set(pool, key, default, "string").await?.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DatabaseConnection;

    #[tokio::test]
    async fn test_set_overwrites() {
        let db = DatabaseConnection::in_memory().await.unwrap();
        ConfigurationRepository::set(db.pool(), "server.name", "a", "string")
            .await
            .unwrap();
        let updated = ConfigurationRepository::set(db.pool(), "server.name", "b", "string")
            .await
            .unwrap();
        assert_eq!(updated.value, "b");
        assert!(!updated.is_secret());
    }

    #[tokio::test]
    async fn test_get_or_insert_keeps_existing() {
        let db = DatabaseConnection::in_memory().await.unwrap();
        let first = ConfigurationRepository::get_or_insert(db.pool(), "server.uuid", "one")
            .await
            .unwrap();
        let second = ConfigurationRepository::get_or_insert(db.pool(), "server.uuid", "two")
            .await
            .unwrap();
        assert_eq!(first, "one");
        assert_eq!(second, "one");
    }
}
