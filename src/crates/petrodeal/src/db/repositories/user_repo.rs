//! User repository for database operations

use crate::db::connection::DatabasePool;
use crate::db::error::DbResult;
use crate::db::models::User;
use chrono::Utc;

/// Fields for inserting a user; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

/// User repository for managing account rows
pub struct UserRepository;

impl UserRepository {
    /// Create a new user
    pub async fn create(pool: &DatabasePool, id: &str, new: NewUser) -> DbResult<User> {
        let now = Utc::now().to_rfc3339();
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, username, email, password_hash, role, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(id)
        .bind(&new.username)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(&new.role)
        .bind(&now)
        .bind(&now)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Get a user by ID
    pub async fn get_by_id(pool: &DatabasePool, id: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(user)
    }

    /// Get a user by username
    pub async fn get_by_username(pool: &DatabasePool, username: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(pool)
            .await?;
        Ok(user)
    }

    /// Get a user by email, case-insensitively
    pub async fn get_by_email(pool: &DatabasePool, email: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE lower(email) = lower(?)")
            .bind(email)
            .fetch_optional(pool)
            .await?;
        Ok(user)
    }

    /// Stamp a successful login
    pub async fn update_last_login(pool: &DatabasePool, id: &str) -> DbResult<()> {
        let now = Utc::now().to_rfc3339();
        sqlx::query("UPDATE users SET last_login_at = ?, updated_at = ? WHERE id = ?")
            .bind(&now)
            .bind(&now)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Count users
    pub async fn count(pool: &DatabasePool) -> DbResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DatabaseConnection;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            role: "user".to_string(),
        }
    }

    #[tokio::test]
    async fn test_lookup_by_username_and_email() {
        let db = DatabaseConnection::in_memory().await.unwrap();
        UserRepository::create(db.pool(), "u-1", new_user("alice", "Alice@Example.com"))
            .await
            .unwrap();

        let by_name = UserRepository::get_by_username(db.pool(), "alice").await.unwrap();
        assert_eq!(by_name.unwrap().id, "u-1");

        let by_email = UserRepository::get_by_email(db.pool(), "alice@example.com")
            .await
            .unwrap();
        assert!(by_email.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_constraint_violation() {
        let db = DatabaseConnection::in_memory().await.unwrap();
        UserRepository::create(db.pool(), "u-1", new_user("alice", "a@example.com"))
            .await
            .unwrap();
        let err = UserRepository::create(db.pool(), "u-2", new_user("alice", "b@example.com"))
            .await
            .unwrap_err();
        assert!(err.is_constraint_violation());
    }

    #[tokio::test]
    async fn test_password_hash_not_serialized() {
        let db = DatabaseConnection::in_memory().await.unwrap();
        let user = UserRepository::create(db.pool(), "u-1", new_user("alice", "a@example.com"))
            .await
            .unwrap();
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "alice");
    }
}
