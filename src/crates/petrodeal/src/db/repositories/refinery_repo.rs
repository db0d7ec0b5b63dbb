//! Refinery repository for database operations

use crate::db::connection::DatabasePool;
use crate::db::error::{DatabaseError, DbResult};
use crate::db::models::Refinery;
use chrono::Utc;

/// Fields for inserting a refinery
#[derive(Debug, Clone, Default)]
pub struct NewRefinery {
    pub name: String,
    pub country: String,
    pub region: String,
    pub lat: f64,
    pub lng: f64,
    pub capacity_bpd: Option<i64>,
    pub operator: Option<String>,
    pub status: String,
    pub description: Option<String>,
}

/// Partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct RefineryUpdate {
    pub name: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub capacity_bpd: Option<i64>,
    pub operator: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
}

/// Refinery repository for managing refinery database operations
pub struct RefineryRepository;

impl RefineryRepository {
    /// Create a new refinery
    pub async fn create(pool: &DatabasePool, id: &str, new: NewRefinery) -> DbResult<Refinery> {
        let now = Utc::now().to_rfc3339();
        let refinery = sqlx::query_as::<_, Refinery>(
            "INSERT INTO refineries (id, name, country, region, lat, lng, capacity_bpd, operator,
                 status, description, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(id)
        .bind(&new.name)
        .bind(&new.country)
        .bind(&new.region)
        .bind(new.lat)
        .bind(new.lng)
        .bind(new.capacity_bpd)
        .bind(&new.operator)
        .bind(&new.status)
        .bind(&new.description)
        .bind(&now)
        .bind(&now)
        .fetch_one(pool)
        .await?;

        Ok(refinery)
    }

    /// Get a refinery by ID
    pub async fn get_by_id(pool: &DatabasePool, id: &str) -> DbResult<Option<Refinery>> {
        let refinery = sqlx::query_as::<_, Refinery>("SELECT * FROM refineries WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(refinery)
    }

    /// Get a refinery by exact name
    pub async fn get_by_name(pool: &DatabasePool, name: &str) -> DbResult<Option<Refinery>> {
        let refinery = sqlx::query_as::<_, Refinery>("SELECT * FROM refineries WHERE name = ?")
            .bind(name)
            .fetch_optional(pool)
            .await?;
        Ok(refinery)
    }

    /// List all refineries ordered by name
    pub async fn list(pool: &DatabasePool) -> DbResult<Vec<Refinery>> {
        let refineries = sqlx::query_as::<_, Refinery>("SELECT * FROM refineries ORDER BY name ASC")
            .fetch_all(pool)
            .await?;
        Ok(refineries)
    }

    /// Apply a partial update, returning the updated row
    pub async fn update(
        pool: &DatabasePool,
        id: &str,
        update: RefineryUpdate,
    ) -> DbResult<Option<Refinery>> {
        let now = Utc::now().to_rfc3339();
        let refinery = sqlx::query_as::<_, Refinery>(
            "UPDATE refineries SET
                 name = COALESCE(?, name),
                 country = COALESCE(?, country),
                 region = COALESCE(?, region),
                 lat = COALESCE(?, lat),
                 lng = COALESCE(?, lng),
                 capacity_bpd = COALESCE(?, capacity_bpd),
                 operator = COALESCE(?, operator),
                 status = COALESCE(?, status),
                 description = COALESCE(?, description),
                 updated_at = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(&update.name)
        .bind(&update.country)
        .bind(&update.region)
        .bind(update.lat)
        .bind(update.lng)
        .bind(update.capacity_bpd)
        .bind(&update.operator)
        .bind(&update.status)
        .bind(&update.description)
        .bind(&now)
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(refinery)
    }

    /// Delete a refinery
    pub async fn delete(pool: &DatabasePool, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM refineries WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found(format!("refinery {}", id)));
        }
        Ok(())
    }

    /// Count total refineries
    pub async fn count(pool: &DatabasePool) -> DbResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM refineries")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
