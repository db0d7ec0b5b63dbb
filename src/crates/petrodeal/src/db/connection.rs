//! Database connection management
//!
//! Provides database connection pooling, migrations, health checks, and connection statistics.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;

/// Type alias for the database connection pool
pub type DatabasePool = SqlitePool;

/// Database connection statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct PoolStatistics {
    /// Number of currently idle connections
    pub idle_connections: u32,

    /// Number of currently active connections
    pub active_connections: u32,

    /// Connections currently opened by the pool
    pub open_connections: u32,

    /// Timestamp of the statistics collection (Unix timestamp in seconds)
    pub collected_at: i64,
}

/// Database connection wrapper
#[derive(Clone)]
pub struct DatabaseConnection {
    pool: Arc<DatabasePool>,
}

impl DatabaseConnection {
    /// Create a new database connection from a connection string
    ///
    /// # Arguments
    /// * `database_url` - SQLite connection string (e.g., "sqlite://petrodeal.db")
    ///
    /// The database file is created when missing and foreign keys are enforced.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        Self::with_max_connections(database_url, 5).await
    }

    /// Create a new database connection with custom pool size
    pub async fn with_max_connections(
        database_url: &str,
        max_connections: u32,
    ) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Create a migrated in-memory database
    ///
    /// Every SQLite in-memory connection is a separate database, so the pool
    /// holds exactly one connection that never expires.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let conn = Self {
            pool: Arc::new(pool),
        };
        conn.run_migrations()
            .await
            .map_err(|e| sqlx::Error::Migrate(Box::new(e)))?;
        Ok(conn)
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    /// Run migrations on the database
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations")
            .run(self.pool.as_ref())
            .await
    }

    /// Perform a health check by running a simple query
    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(())
    }

    /// Get connection pool statistics
    pub fn get_pool_statistics(&self) -> PoolStatistics {
        let pool_ref = self.pool.as_ref();
        let idle = pool_ref.num_idle() as u32;
        let total = pool_ref.size();

        PoolStatistics {
            idle_connections: idle,
            active_connections: total.saturating_sub(idle),
            open_connections: total,
            collected_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Close the connection pool gracefully
    pub async fn close(self) {
        self.pool.close().await;
    }
}
