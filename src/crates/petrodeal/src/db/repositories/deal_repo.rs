//! Deal repository for database operations

use sqlx::{QueryBuilder, Sqlite};

use crate::db::connection::DatabasePool;
use crate::db::error::{DatabaseError, DbResult};
use crate::db::models::Deal;
use crate::db::repositories::PageWindow;
use chrono::Utc;

/// Fields for inserting a deal
#[derive(Debug, Clone, Default)]
pub struct NewDeal {
    pub broker_id: String,
    pub vessel_id: Option<String>,
    pub refinery_id: Option<String>,
    pub seller_company_id: Option<String>,
    pub buyer_company_id: Option<String>,
    pub cargo_type: String,
    pub quantity: f64,
    pub unit: String,
    pub price_per_unit: f64,
    pub currency: String,
    pub status: String,
    pub notes: Option<String>,
}

/// Partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct DealUpdate {
    pub vessel_id: Option<String>,
    pub refinery_id: Option<String>,
    pub seller_company_id: Option<String>,
    pub buyer_company_id: Option<String>,
    pub cargo_type: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub price_per_unit: Option<f64>,
    pub currency: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// List filters
#[derive(Debug, Clone, Default)]
pub struct DealFilter {
    /// Restrict to one broker; `None` lists every broker's deals
    pub broker_id: Option<String>,
    pub status: Option<String>,
    pub vessel_id: Option<String>,
}

impl DealFilter {
    fn apply<'a>(&'a self, qb: &mut QueryBuilder<'a, Sqlite>) {
        qb.push(" WHERE 1 = 1");
        if let Some(broker_id) = &self.broker_id {
            qb.push(" AND broker_id = ").push_bind(broker_id);
        }
        if let Some(status) = &self.status {
            qb.push(" AND status = ").push_bind(status);
        }
        if let Some(vessel_id) = &self.vessel_id {
            qb.push(" AND vessel_id = ").push_bind(vessel_id);
        }
    }
}

/// Deal repository for managing broker deals
pub struct DealRepository;

impl DealRepository {
    /// Create a new deal
    pub async fn create(pool: &DatabasePool, id: &str, new: NewDeal) -> DbResult<Deal> {
        let now = Utc::now().to_rfc3339();
        let deal = sqlx::query_as::<_, Deal>(
            "INSERT INTO deals (id, broker_id, vessel_id, refinery_id, seller_company_id,
                 buyer_company_id, cargo_type, quantity, unit, price_per_unit, currency, status,
                 notes, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(id)
        .bind(&new.broker_id)
        .bind(&new.vessel_id)
        .bind(&new.refinery_id)
        .bind(&new.seller_company_id)
        .bind(&new.buyer_company_id)
        .bind(&new.cargo_type)
        .bind(new.quantity)
        .bind(&new.unit)
        .bind(new.price_per_unit)
        .bind(&new.currency)
        .bind(&new.status)
        .bind(&new.notes)
        .bind(&now)
        .bind(&now)
        .fetch_one(pool)
        .await?;

        Ok(deal)
    }

    /// Get a deal by ID
    pub async fn get_by_id(pool: &DatabasePool, id: &str) -> DbResult<Option<Deal>> {
        let deal = sqlx::query_as::<_, Deal>("SELECT * FROM deals WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(deal)
    }

    /// List deals matching a filter, newest first
    pub async fn list(
        pool: &DatabasePool,
        filter: &DealFilter,
        window: PageWindow,
    ) -> DbResult<Vec<Deal>> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM deals");
        filter.apply(&mut qb);
        qb.push(" ORDER BY created_at DESC, id ASC LIMIT ")
            .push_bind(window.limit)
            .push(" OFFSET ")
            .push_bind(window.offset);

        let deals = qb.build_query_as::<Deal>().fetch_all(pool).await?;
        Ok(deals)
    }

    /// Count deals matching a filter
    pub async fn count_filtered(pool: &DatabasePool, filter: &DealFilter) -> DbResult<i64> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM deals");
        filter.apply(&mut qb);
        let (count,) = qb.build_query_as::<(i64,)>().fetch_one(pool).await?;
        Ok(count)
    }

    /// Apply a partial update, returning the updated row
    pub async fn update(pool: &DatabasePool, id: &str, update: DealUpdate) -> DbResult<Option<Deal>> {
        let now = Utc::now().to_rfc3339();
        let deal = sqlx::query_as::<_, Deal>(
            "UPDATE deals SET
                 vessel_id = COALESCE(?, vessel_id),
                 refinery_id = COALESCE(?, refinery_id),
                 seller_company_id = COALESCE(?, seller_company_id),
                 buyer_company_id = COALESCE(?, buyer_company_id),
                 cargo_type = COALESCE(?, cargo_type),
                 quantity = COALESCE(?, quantity),
                 unit = COALESCE(?, unit),
                 price_per_unit = COALESCE(?, price_per_unit),
                 currency = COALESCE(?, currency),
                 status = COALESCE(?, status),
                 notes = COALESCE(?, notes),
                 updated_at = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(&update.vessel_id)
        .bind(&update.refinery_id)
        .bind(&update.seller_company_id)
        .bind(&update.buyer_company_id)
        .bind(&update.cargo_type)
        .bind(update.quantity)
        .bind(&update.unit)
        .bind(update.price_per_unit)
        .bind(&update.currency)
        .bind(&update.status)
        .bind(&update.notes)
        .bind(&now)
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(deal)
    }

    /// Set only the status of a deal
    pub async fn update_status(pool: &DatabasePool, id: &str, status: &str) -> DbResult<Deal> {
        let deal = sqlx::query_as::<_, Deal>(
            "UPDATE deals SET status = ?, updated_at = ? WHERE id = ? RETURNING *",
        )
        .bind(status)
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .fetch_optional(pool)
        .await?;

        deal.ok_or_else(|| DatabaseError::not_found(format!("deal {}", id)))
    }

    /// Delete a deal
    pub async fn delete(pool: &DatabasePool, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM deals WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found(format!("deal {}", id)));
        }
        Ok(())
    }

    /// Count total deals
    pub async fn count(pool: &DatabasePool) -> DbResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM deals")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Count deals grouped by status
    pub async fn count_by_status(pool: &DatabasePool) -> DbResult<Vec<(String, i64)>> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM deals GROUP BY status ORDER BY status")
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

    async fn setup() -> DatabaseConnection {
        let db = DatabaseConnection::in_memory().await.unwrap();
        for (id, name) in [("b-1", "broker1"), ("b-2", "broker2")] {
            UserRepository::create(
                db.pool(),
                id,
                NewUser {
                    username: name.to_string(),
                    email: format!("{}@example.com", name),
                    password_hash: "hash".to_string(),
                    role: "broker".to_string(),
                },
            )
            .await
            .unwrap();
        }
        db
    }

    fn deal(broker_id: &str, quantity: f64) -> NewDeal {
        NewDeal {
            broker_id: broker_id.to_string(),
            cargo_type: "Brent Crude".to_string(),
            quantity,
            unit: "bbl".to_string(),
            price_per_unit: 82.5,
            currency: "USD".to_string(),
            status: "pending".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_list_scoped_to_broker() {
        let db = setup().await;
        DealRepository::create(db.pool(), "d-1", deal("b-1", 500_000.0)).await.unwrap();
        DealRepository::create(db.pool(), "d-2", deal("b-1", 250_000.0)).await.unwrap();
        DealRepository::create(db.pool(), "d-3", deal("b-2", 100_000.0)).await.unwrap();

        let filter = DealFilter {
            broker_id: Some("b-1".to_string()),
            ..Default::default()
        };
        let page = DealRepository::list(db.pool(), &filter, PageWindow::default()).await.unwrap();
        assert_eq!(page.len(), 2);
        assert!(page.iter().all(|d| d.broker_id == "b-1"));
        assert_eq!(DealRepository::count_filtered(db.pool(), &filter).await.unwrap(), 2);
        assert_eq!(DealRepository::count(db.pool()).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_quantity_must_be_positive() {
        let db = setup().await;
        let err = DealRepository::create(db.pool(), "d-1", deal("b-1", 0.0)).await.unwrap_err();
        assert!(err.is_constraint_violation());
    }

    #[tokio::test]
    async fn test_status_update_and_cascade_on_broker_delete() {
        let db = setup().await;
        DealRepository::create(db.pool(), "d-1", deal("b-1", 1000.0)).await.unwrap();
        let updated = DealRepository::update_status(db.pool(), "d-1", "negotiating").await.unwrap();
        assert_eq!(updated.status, "negotiating");

        let err = DealRepository::update_status(db.pool(), "d-1", "bogus").await.unwrap_err();
        assert!(err.is_constraint_violation());

        sqlx::query("DELETE FROM users WHERE id = 'b-1'")
            .execute(db.pool())
            .await
            .unwrap();
        assert!(DealRepository::get_by_id(db.pool(), "d-1").await.unwrap().is_none());
    }
}
