//! Vessel repository for database operations

use sqlx::{QueryBuilder, Sqlite};

use crate::db::connection::DatabasePool;
use crate::db::error::{DatabaseError, DbResult};
use crate::db::models::Vessel;
use crate::db::repositories::PageWindow;
use chrono::Utc;

/// Fields for inserting a vessel
#[derive(Debug, Clone, Default)]
pub struct NewVessel {
    pub name: String,
    pub imo: String,
    pub mmsi: Option<String>,
    pub vessel_type: String,
    pub flag: Option<String>,
    pub built: Option<i64>,
    pub deadweight: Option<i64>,
    pub current_lat: Option<f64>,
    pub current_lng: Option<f64>,
    pub current_region: Option<String>,
    pub speed_knots: f64,
    pub status: String,
    pub cargo_type: Option<String>,
    pub cargo_capacity: Option<i64>,
    pub departure_port_id: Option<String>,
    pub destination_port_id: Option<String>,
    pub departure_date: Option<String>,
    pub eta: Option<String>,
    pub company_id: Option<String>,
}

/// Partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct VesselUpdate {
    pub name: Option<String>,
    pub mmsi: Option<String>,
    pub vessel_type: Option<String>,
    pub flag: Option<String>,
    pub deadweight: Option<i64>,
    pub current_lat: Option<f64>,
    pub current_lng: Option<f64>,
    pub current_region: Option<String>,
    pub speed_knots: Option<f64>,
    pub status: Option<String>,
    pub cargo_type: Option<String>,
    pub cargo_capacity: Option<i64>,
    pub departure_port_id: Option<String>,
    pub destination_port_id: Option<String>,
    pub departure_date: Option<String>,
    pub eta: Option<String>,
    pub company_id: Option<String>,
}

/// List filters
#[derive(Debug, Clone, Default)]
pub struct VesselFilter {
    pub region: Option<String>,
    pub status: Option<String>,
    pub vessel_type: Option<String>,
    pub company_id: Option<String>,
    /// Case-insensitive match on name or IMO
    pub search: Option<String>,
}

impl VesselFilter {
    fn apply<'a>(&'a self, qb: &mut QueryBuilder<'a, Sqlite>) {
        qb.push(" WHERE 1 = 1");
        if let Some(region) = &self.region {
            qb.push(" AND current_region = ").push_bind(region);
        }
        if let Some(status) = &self.status {
            qb.push(" AND status = ").push_bind(status);
        }
        if let Some(vessel_type) = &self.vessel_type {
            qb.push(" AND vessel_type = ").push_bind(vessel_type);
        }
        if let Some(company_id) = &self.company_id {
            qb.push(" AND company_id = ").push_bind(company_id);
        }
        if let Some(search) = &self.search {
            let pattern = format!("%{}%", search.to_lowercase());
            qb.push(" AND (LOWER(name) LIKE ")
                .push_bind(pattern.clone())
                .push(" OR LOWER(imo) LIKE ")
                .push_bind(pattern)
                .push(")");
        }
    }
}

/// Vessel repository for managing vessel database operations
pub struct VesselRepository;

impl VesselRepository {
    /// Create a new vessel
    pub async fn create(pool: &DatabasePool, id: &str, new: NewVessel) -> DbResult<Vessel> {
        let now = Utc::now().to_rfc3339();
        let vessel = sqlx::query_as::<_, Vessel>(
            "INSERT INTO vessels (id, name, imo, mmsi, vessel_type, flag, built, deadweight,
                 current_lat, current_lng, current_region, speed_knots, status, cargo_type,
                 cargo_capacity, departure_port_id, destination_port_id, departure_date, eta,
                 company_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(id)
        .bind(&new.name)
        .bind(&new.imo)
        .bind(&new.mmsi)
        .bind(&new.vessel_type)
        .bind(&new.flag)
        .bind(new.built)
        .bind(new.deadweight)
        .bind(new.current_lat)
        .bind(new.current_lng)
        .bind(&new.current_region)
        .bind(new.speed_knots)
        .bind(&new.status)
        .bind(&new.cargo_type)
        .bind(new.cargo_capacity)
        .bind(&new.departure_port_id)
        .bind(&new.destination_port_id)
        .bind(&new.departure_date)
        .bind(&new.eta)
        .bind(&new.company_id)
        .bind(&now)
        .bind(&now)
        .fetch_one(pool)
        .await?;

        Ok(vessel)
    }

    /// Get a vessel by ID
    pub async fn get_by_id(pool: &DatabasePool, id: &str) -> DbResult<Option<Vessel>> {
        let vessel = sqlx::query_as::<_, Vessel>("SELECT * FROM vessels WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(vessel)
    }

    /// Get a vessel by IMO number
    pub async fn get_by_imo(pool: &DatabasePool, imo: &str) -> DbResult<Option<Vessel>> {
        let vessel = sqlx::query_as::<_, Vessel>("SELECT * FROM vessels WHERE imo = ?")
            .bind(imo)
            .fetch_optional(pool)
            .await?;
        Ok(vessel)
    }

    /// List vessels matching a filter, ordered by name
    pub async fn list(
        pool: &DatabasePool,
        filter: &VesselFilter,
        window: PageWindow,
    ) -> DbResult<Vec<Vessel>> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM vessels");
        filter.apply(&mut qb);
        qb.push(" ORDER BY name ASC, id ASC LIMIT ")
            .push_bind(window.limit)
            .push(" OFFSET ")
            .push_bind(window.offset);

        let vessels = qb.build_query_as::<Vessel>().fetch_all(pool).await?;
        Ok(vessels)
    }

    /// Count vessels matching a filter
    pub async fn count_filtered(pool: &DatabasePool, filter: &VesselFilter) -> DbResult<i64> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM vessels");
        filter.apply(&mut qb);
        let (count,) = qb.build_query_as::<(i64,)>().fetch_one(pool).await?;
        Ok(count)
    }

    /// All vessels with a recorded position
    pub async fn list_positioned(pool: &DatabasePool) -> DbResult<Vec<Vessel>> {
        let vessels = sqlx::query_as::<_, Vessel>(
            "SELECT * FROM vessels
             WHERE current_lat IS NOT NULL AND current_lng IS NOT NULL
             ORDER BY name ASC",
        )
        .fetch_all(pool)
        .await?;
        Ok(vessels)
    }

    /// Vessels the movement simulator should advance
    pub async fn list_underway(pool: &DatabasePool) -> DbResult<Vec<Vessel>> {
        let vessels = sqlx::query_as::<_, Vessel>(
            "SELECT * FROM vessels WHERE status = 'underway' ORDER BY id ASC",
        )
        .fetch_all(pool)
        .await?;
        Ok(vessels)
    }

    /// Fleet of a company
    pub async fn list_by_company(pool: &DatabasePool, company_id: &str) -> DbResult<Vec<Vessel>> {
        let vessels = sqlx::query_as::<_, Vessel>(
            "SELECT * FROM vessels WHERE company_id = ? ORDER BY name ASC",
        )
        .bind(company_id)
        .fetch_all(pool)
        .await?;
        Ok(vessels)
    }

    /// Apply a partial update, returning the updated row
    pub async fn update(
        pool: &DatabasePool,
        id: &str,
        update: VesselUpdate,
    ) -> DbResult<Option<Vessel>> {
        let now = Utc::now().to_rfc3339();
        let vessel = sqlx::query_as::<_, Vessel>(
            "UPDATE vessels SET
                 name = COALESCE(?, name),
                 mmsi = COALESCE(?, mmsi),
                 vessel_type = COALESCE(?, vessel_type),
                 flag = COALESCE(?, flag),
                 deadweight = COALESCE(?, deadweight),
                 current_lat = COALESCE(?, current_lat),
                 current_lng = COALESCE(?, current_lng),
                 current_region = COALESCE(?, current_region),
                 speed_knots = COALESCE(?, speed_knots),
                 status = COALESCE(?, status),
                 cargo_type = COALESCE(?, cargo_type),
                 cargo_capacity = COALESCE(?, cargo_capacity),
                 departure_port_id = COALESCE(?, departure_port_id),
                 destination_port_id = COALESCE(?, destination_port_id),
                 departure_date = COALESCE(?, departure_date),
                 eta = COALESCE(?, eta),
                 company_id = COALESCE(?, company_id),
                 updated_at = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(&update.name)
        .bind(&update.mmsi)
        .bind(&update.vessel_type)
        .bind(&update.flag)
        .bind(update.deadweight)
        .bind(update.current_lat)
        .bind(update.current_lng)
        .bind(&update.current_region)
        .bind(update.speed_knots)
        .bind(&update.status)
        .bind(&update.cargo_type)
        .bind(update.cargo_capacity)
        .bind(&update.departure_port_id)
        .bind(&update.destination_port_id)
        .bind(&update.departure_date)
        .bind(&update.eta)
        .bind(&update.company_id)
        .bind(&now)
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(vessel)
    }

    /// Record a simulated or reported position
    pub async fn update_position(
        pool: &DatabasePool,
        id: &str,
        lat: f64,
        lng: f64,
        status: &str,
    ) -> DbResult<()> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            "UPDATE vessels SET current_lat = ?, current_lng = ?, status = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(lat)
        .bind(lng)
        .bind(status)
        .bind(&now)
        .bind(id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found(format!("vessel {}", id)));
        }
        Ok(())
    }

    /// Delete a vessel
    pub async fn delete(pool: &DatabasePool, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM vessels WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found(format!("vessel {}", id)));
        }
        Ok(())
    }

    /// Count total vessels
    pub async fn count(pool: &DatabasePool) -> DbResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM vessels")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Vessel counts grouped by status
    pub async fn count_by_status(pool: &DatabasePool) -> DbResult<Vec<(String, i64)>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT status, COUNT(*) FROM vessels GROUP BY status ORDER BY status ASC",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    /// Vessel counts grouped by region; unknown regions are reported as "unknown"
    pub async fn count_by_region(pool: &DatabasePool) -> DbResult<Vec<(String, i64)>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT COALESCE(current_region, 'unknown') AS region, COUNT(*)
             FROM vessels GROUP BY region ORDER BY region ASC",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DatabaseConnection;

    fn tanker(name: &str, imo: &str, region: &str) -> NewVessel {
        NewVessel {
            name: name.to_string(),
            imo: imo.to_string(),
            vessel_type: "VLCC".to_string(),
            current_lat: Some(25.0),
            current_lng: Some(56.0),
            current_region: Some(region.to_string()),
            speed_knots: 12.5,
            status: "underway".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = DatabaseConnection::in_memory().await.unwrap();
        let created = VesselRepository::create(db.pool(), "v-1", tanker("Aurora", "9300001", "Middle East"))
            .await
            .unwrap();
        assert_eq!(created.name, "Aurora");
        assert_eq!(created.status, "underway");

        let fetched = VesselRepository::get_by_imo(db.pool(), "9300001").await.unwrap();
        assert_eq!(fetched.unwrap().id, "v-1");
    }

    #[tokio::test]
    async fn test_duplicate_imo_is_constraint_violation() {
        let db = DatabaseConnection::in_memory().await.unwrap();
        VesselRepository::create(db.pool(), "v-1", tanker("Aurora", "9300001", "Middle East"))
            .await
            .unwrap();
        let err = VesselRepository::create(db.pool(), "v-2", tanker("Borealis", "9300001", "Europe"))
            .await
            .unwrap_err();
        assert!(err.is_constraint_violation());
    }

    #[tokio::test]
    async fn test_list_filters_and_counts() {
        let db = DatabaseConnection::in_memory().await.unwrap();
        VesselRepository::create(db.pool(), "v-1", tanker("Aurora", "9300001", "Middle East"))
            .await
            .unwrap();
        VesselRepository::create(db.pool(), "v-2", tanker("Borealis", "9300002", "Europe"))
            .await
            .unwrap();
        VesselRepository::create(db.pool(), "v-3", tanker("Cassiopeia", "9300003", "Europe"))
            .await
            .unwrap();

        let filter = VesselFilter {
            region: Some("Europe".to_string()),
            ..Default::default()
        };
        let europe = VesselRepository::list(db.pool(), &filter, PageWindow::new(0, 10))
            .await
            .unwrap();
        assert_eq!(europe.len(), 2);
        assert_eq!(VesselRepository::count_filtered(db.pool(), &filter).await.unwrap(), 2);

        let search = VesselFilter {
            search: Some("bore".to_string()),
            ..Default::default()
        };
        let found = VesselRepository::list(db.pool(), &search, PageWindow::default())
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Borealis");

        let page = VesselRepository::list(db.pool(), &VesselFilter::default(), PageWindow::new(1, 2))
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].name, "Cassiopeia");

        let regions = VesselRepository::count_by_region(db.pool()).await.unwrap();
        assert!(regions.contains(&("Europe".to_string(), 2)));
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let db = DatabaseConnection::in_memory().await.unwrap();
        VesselRepository::create(db.pool(), "v-1", tanker("Aurora", "9300001", "Middle East"))
            .await
            .unwrap();

        let updated = VesselRepository::update(
            db.pool(),
            "v-1",
            VesselUpdate {
                status: Some("moored".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(updated.status, "moored");
        assert_eq!(updated.name, "Aurora");
        assert_eq!(updated.speed_knots, 12.5);

        let missing = VesselRepository::update(db.pool(), "nope", VesselUpdate::default())
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_update_position_and_delete() {
        let db = DatabaseConnection::in_memory().await.unwrap();
        VesselRepository::create(db.pool(), "v-1", tanker("Aurora", "9300001", "Middle East"))
            .await
            .unwrap();

        VesselRepository::update_position(db.pool(), "v-1", 26.1, 56.4, "underway")
            .await
            .unwrap();
        let moved = VesselRepository::get_by_id(db.pool(), "v-1").await.unwrap().unwrap();
        assert_eq!(moved.current_lat, Some(26.1));

        VesselRepository::delete(db.pool(), "v-1").await.unwrap();
        let err = VesselRepository::delete(db.pool(), "v-1").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
