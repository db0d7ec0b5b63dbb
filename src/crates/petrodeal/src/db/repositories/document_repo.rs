//! Vessel document repository for database operations

use crate::db::connection::DatabasePool;
use crate::db::error::{DatabaseError, DbResult};
use crate::db::models::Document;
use chrono::Utc;

/// Fields for inserting a document
#[derive(Debug, Clone, Default)]
pub struct NewDocument {
    pub vessel_id: String,
    pub title: String,
    pub document_type: String,
    pub content: String,
    pub status: String,
    pub issued_at: Option<String>,
    pub expires_at: Option<String>,
}

/// Document repository for vessel trade documents
pub struct DocumentRepository;

impl DocumentRepository {
    /// Attach a document to a vessel
    pub async fn create(pool: &DatabasePool, id: &str, new: NewDocument) -> DbResult<Document> {
        let now = Utc::now().to_rfc3339();
        let document = sqlx::query_as::<_, Document>(
            "INSERT INTO documents (id, vessel_id, title, document_type, content, status,
                 issued_at, expires_at, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(id)
        .bind(&new.vessel_id)
        .bind(&new.title)
        .bind(&new.document_type)
        .bind(&new.content)
        .bind(&new.status)
        .bind(&new.issued_at)
        .bind(&new.expires_at)
        .bind(&now)
        .bind(&now)
        .fetch_one(pool)
        .await?;

        Ok(document)
    }

    /// Get a document by ID
    pub async fn get_by_id(pool: &DatabasePool, id: &str) -> DbResult<Option<Document>> {
        let document = sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(document)
    }

    /// Documents of one vessel, newest first
    pub async fn list_by_vessel(pool: &DatabasePool, vessel_id: &str) -> DbResult<Vec<Document>> {
        let documents = sqlx::query_as::<_, Document>(
            "SELECT * FROM documents WHERE vessel_id = ? ORDER BY created_at DESC, id ASC",
        )
        .bind(vessel_id)
        .fetch_all(pool)
        .await?;
        Ok(documents)
    }

    /// Delete a document
    pub async fn delete(pool: &DatabasePool, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM documents WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found(format!("document {}", id)));
        }
        Ok(())
    }

    /// Count total documents
    pub async fn count(pool: &DatabasePool) -> DbResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM documents")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
