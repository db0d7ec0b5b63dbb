//! Company repository for database operations

use crate::db::connection::DatabasePool;
use crate::db::error::{DatabaseError, DbResult};
use crate::db::models::Company;
use chrono::Utc;

/// Fields for inserting a company
#[derive(Debug, Clone, Default)]
pub struct NewCompany {
    pub name: String,
    pub country: Option<String>,
    pub region: Option<String>,
    pub company_type: String,
    pub website: Option<String>,
    pub description: Option<String>,
    pub fleet_size: i64,
}

/// Partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct CompanyUpdate {
    pub name: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub company_type: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub fleet_size: Option<i64>,
}

/// Company repository for managing company database operations
pub struct CompanyRepository;

impl CompanyRepository {
    /// Create a new company
    pub async fn create(pool: &DatabasePool, id: &str, new: NewCompany) -> DbResult<Company> {
        let now = Utc::now().to_rfc3339();
        let company = sqlx::query_as::<_, Company>(
            "INSERT INTO companies (id, name, country, region, company_type, website, description,
                 fleet_size, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(id)
        .bind(&new.name)
        .bind(&new.country)
        .bind(&new.region)
        .bind(&new.company_type)
        .bind(&new.website)
        .bind(&new.description)
        .bind(new.fleet_size)
        .bind(&now)
        .bind(&now)
        .fetch_one(pool)
        .await?;

        Ok(company)
    }

    /// Get a company by ID
    pub async fn get_by_id(pool: &DatabasePool, id: &str) -> DbResult<Option<Company>> {
        let company = sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(company)
    }

    /// Get a company by its unique name
    pub async fn get_by_name(pool: &DatabasePool, name: &str) -> DbResult<Option<Company>> {
        let company = sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE name = ?")
            .bind(name)
            .fetch_optional(pool)
            .await?;
        Ok(company)
    }

    /// List all companies ordered by name
    pub async fn list(pool: &DatabasePool) -> DbResult<Vec<Company>> {
        let companies = sqlx::query_as::<_, Company>("SELECT * FROM companies ORDER BY name ASC")
            .fetch_all(pool)
            .await?;
        Ok(companies)
    }

    /// Apply a partial update, returning the updated row
    pub async fn update(
        pool: &DatabasePool,
        id: &str,
        update: CompanyUpdate,
    ) -> DbResult<Option<Company>> {
        let now = Utc::now().to_rfc3339();
        let company = sqlx::query_as::<_, Company>(
            "UPDATE companies SET
                 name = COALESCE(?, name),
                 country = COALESCE(?, country),
                 region = COALESCE(?, region),
                 company_type = COALESCE(?, company_type),
                 website = COALESCE(?, website),
                 description = COALESCE(?, description),
                 fleet_size = COALESCE(?, fleet_size),
                 updated_at = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(&update.name)
        .bind(&update.country)
        .bind(&update.region)
        .bind(&update.company_type)
        .bind(&update.website)
        .bind(&update.description)
        .bind(update.fleet_size)
        .bind(&now)
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(company)
    }

    /// Delete a company; its vessels keep existing with no owner
    pub async fn delete(pool: &DatabasePool, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM companies WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found(format!("company {}", id)));
        }
        Ok(())
    }

    /// Count total companies
    pub async fn count(pool: &DatabasePool) -> DbResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM companies")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
