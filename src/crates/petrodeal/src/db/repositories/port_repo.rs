//! Port repository for database operations

use crate::db::connection::DatabasePool;
use crate::db::error::{DatabaseError, DbResult};
use crate::db::models::Port;
use chrono::Utc;

/// Fields for inserting a port
#[derive(Debug, Clone, Default)]
pub struct NewPort {
    pub name: String,
    pub country: String,
    pub region: String,
    pub lat: f64,
    pub lng: f64,
    pub port_type: String,
    pub capacity: Option<i64>,
    pub status: String,
    pub description: Option<String>,
}

/// Partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct PortUpdate {
    pub name: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub port_type: Option<String>,
    pub capacity: Option<i64>,
    pub status: Option<String>,
    pub description: Option<String>,
}

/// Port repository for managing port database operations
pub struct PortRepository;

impl PortRepository {
    /// Create a new port
    pub async fn create(pool: &DatabasePool, id: &str, new: NewPort) -> DbResult<Port> {
        let now = Utc::now().to_rfc3339();
        let port = sqlx::query_as::<_, Port>(
            "INSERT INTO ports (id, name, country, region, lat, lng, port_type, capacity, status,
                 description, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(id)
        .bind(&new.name)
        .bind(&new.country)
        .bind(&new.region)
        .bind(new.lat)
        .bind(new.lng)
        .bind(&new.port_type)
        .bind(new.capacity)
        .bind(&new.status)
        .bind(&new.description)
        .bind(&now)
        .bind(&now)
        .fetch_one(pool)
        .await?;

        Ok(port)
    }

    /// Get a port by ID
    pub async fn get_by_id(pool: &DatabasePool, id: &str) -> DbResult<Option<Port>> {
        let port = sqlx::query_as::<_, Port>("SELECT * FROM ports WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(port)
    }

    /// Get a port by exact name
    pub async fn get_by_name(pool: &DatabasePool, name: &str) -> DbResult<Option<Port>> {
        let port = sqlx::query_as::<_, Port>("SELECT * FROM ports WHERE name = ?")
            .bind(name)
            .fetch_optional(pool)
            .await?;
        Ok(port)
    }

    /// List all ports ordered by name
    pub async fn list(pool: &DatabasePool) -> DbResult<Vec<Port>> {
        let ports = sqlx::query_as::<_, Port>("SELECT * FROM ports ORDER BY name ASC")
            .fetch_all(pool)
            .await?;
        Ok(ports)
    }

    /// Apply a partial update, returning the updated row
    pub async fn update(pool: &DatabasePool, id: &str, update: PortUpdate) -> DbResult<Option<Port>> {
        let now = Utc::now().to_rfc3339();
        let port = sqlx::query_as::<_, Port>(
            "UPDATE ports SET
                 name = COALESCE(?, name),
                 country = COALESCE(?, country),
                 region = COALESCE(?, region),
                 lat = COALESCE(?, lat),
                 lng = COALESCE(?, lng),
                 port_type = COALESCE(?, port_type),
                 capacity = COALESCE(?, capacity),
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
        .bind(&update.port_type)
        .bind(update.capacity)
        .bind(&update.status)
        .bind(&update.description)
        .bind(&now)
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(port)
    }

    /// Delete a port
    pub async fn delete(pool: &DatabasePool, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM ports WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found(format!("port {}", id)));
        }
        Ok(())
    }

    /// Count total ports
    pub async fn count(pool: &DatabasePool) -> DbResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM ports")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{NewVessel, VesselRepository};
    use crate::db::DatabaseConnection;

    fn rotterdam() -> NewPort {
        NewPort {
            name: "Rotterdam".to_string(),
            country: "Netherlands".to_string(),
            region: "Europe".to_string(),
            lat: 51.95,
            lng: 4.14,
            port_type: "oil".to_string(),
            status: "operational".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_update_delete() {
        let db = DatabaseConnection::in_memory().await.unwrap();
        let port = PortRepository::create(db.pool(), "p-1", rotterdam()).await.unwrap();
        assert_eq!(port.port_type, "oil");

        let updated = PortRepository::update(
            db.pool(),
            "p-1",
            PortUpdate {
                status: Some("limited".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(updated.status, "limited");
        assert_eq!(updated.name, "Rotterdam");

        PortRepository::delete(db.pool(), "p-1").await.unwrap();
        assert_eq!(PortRepository::count(db.pool()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_port_clears_vessel_destination() {
        let db = DatabaseConnection::in_memory().await.unwrap();
        PortRepository::create(db.pool(), "p-1", rotterdam()).await.unwrap();
        VesselRepository::create(
            db.pool(),
            "v-1",
            NewVessel {
                name: "Nordic".to_string(),
                imo: "9400001".to_string(),
                vessel_type: "Suezmax".to_string(),
                status: "underway".to_string(),
                destination_port_id: Some("p-1".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        PortRepository::delete(db.pool(), "p-1").await.unwrap();
        let vessel = VesselRepository::get_by_id(db.pool(), "v-1").await.unwrap().unwrap();
        assert!(vessel.destination_port_id.is_none());
    }
}
