//! Account registration, login and bearer sessions
//!
//! Passwords are stored as Argon2id PHC strings. A session token is an
//! opaque random id stored in `sessions` with an expiry.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{Duration, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::db::models::{Session, User};
use crate::db::repositories::{NewUser, SessionRepository, UserRepository};
use crate::db::{DatabaseError, DatabasePool};

/// Roles a user may pick at registration
pub const SELF_SERVICE_ROLES: &[&str] = &["user", "broker"];

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    #[error("Email already registered: {0}")]
    EmailTaken(String),

    #[error("Role '{0}' cannot be chosen at registration")]
    RoleNotAllowed(String),

    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

/// Check a password against a stored PHC string
///
/// A malformed stored hash never verifies.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!("Stored password hash is malformed: {}", e);
            false
        }
    }
}

/// Registration input, already validated for shape
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

/// Issues and resolves sessions
#[derive(Debug, Clone)]
pub struct AuthService {
    session_ttl: Duration,
}

impl AuthService {
    pub fn new(session_ttl_hours: i64) -> Self {
        Self {
            session_ttl: Duration::hours(session_ttl_hours),
        }
    }

    /// Create an account
    ///
    /// The first account created on an empty database becomes an admin.
    pub async fn register(&self, pool: &DatabasePool, reg: Registration) -> Result<User, AuthError> {
        if !SELF_SERVICE_ROLES.contains(&reg.role.as_str()) {
            return Err(AuthError::RoleNotAllowed(reg.role));
        }
        if UserRepository::get_by_username(pool, &reg.username).await?.is_some() {
            return Err(AuthError::UsernameTaken(reg.username));
        }
        if UserRepository::get_by_email(pool, &reg.email).await?.is_some() {
            return Err(AuthError::EmailTaken(reg.email));
        }

        let role = if UserRepository::count(pool).await? == 0 {
            "admin".to_string()
        } else {
            reg.role
        };

        let user = UserRepository::create(
            pool,
            &Uuid::new_v4().to_string(),
            NewUser {
                username: reg.username,
                email: reg.email.to_lowercase(),
                password_hash: hash_password(&reg.password)?,
                role,
            },
        )
        .await?;

        info!(user_id = %user.id, role = %user.role, "Registered user {}", user.username);
        Ok(user)
    }

    /// Verify credentials and open a session
    ///
    /// `login` matches either the username or the email address.
    pub async fn login(
        &self,
        pool: &DatabasePool,
        login: &str,
        password: &str,
    ) -> Result<(Session, User), AuthError> {
        let user = match UserRepository::get_by_username(pool, login).await? {
            Some(user) => Some(user),
            None => UserRepository::get_by_email(pool, login).await?,
        };

        let user = match user {
            Some(user) if verify_password(password, &user.password_hash) => user,
            _ => {
                warn!("Failed login attempt for {}", login);
                return Err(AuthError::InvalidCredentials);
            }
        };

        let token = Uuid::new_v4().simple().to_string();
        let session =
            SessionRepository::create(pool, &token, &user.id, Utc::now() + self.session_ttl).await?;
        UserRepository::update_last_login(pool, &user.id).await?;

        info!(user_id = %user.id, "User {} logged in", user.username);
        Ok((session, user))
    }

    /// Resolve a bearer token to its user
    pub async fn authenticate(&self, pool: &DatabasePool, token: &str) -> Result<Option<User>, AuthError> {
        let Some(session) = SessionRepository::get_valid(pool, token, Utc::now()).await? else {
            debug!("Rejected unknown or expired session token");
            return Ok(None);
        };

        SessionRepository::touch(pool, &session.id).await?;
        Ok(UserRepository::get_by_id(pool, &session.user_id).await?)
    }

    /// End a session; returns whether it existed
    pub async fn logout(&self, pool: &DatabasePool, token: &str) -> Result<bool, AuthError> {
        Ok(SessionRepository::delete(pool, token).await?)
    }

    /// Drop expired sessions
    pub async fn purge_expired(&self, pool: &DatabasePool) -> Result<u64, AuthError> {
        let purged = SessionRepository::delete_expired(pool, Utc::now()).await?;
        if purged > 0 {
            debug!(purged, "Purged expired sessions");
        }
        Ok(purged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DatabaseConnection;

    fn registration(username: &str, role: &str) -> Registration {
        Registration {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password: "correct horse battery".to_string(),
            role: role.to_string(),
        }
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("s3cret").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("s3cret", &hash));
        assert!(!verify_password("wrong", &hash));
        assert!(!verify_password("s3cret", "not-a-phc-string"));
    }

    #[tokio::test]
    async fn test_first_user_is_admin() {
        let db = DatabaseConnection::in_memory().await.unwrap();
        let auth = AuthService::new(24);

        let first = auth.register(db.pool(), registration("root", "user")).await.unwrap();
        let second = auth.register(db.pool(), registration("bob", "broker")).await.unwrap();
        assert!(first.is_admin());
        assert_eq!(second.role, "broker");
    }

    #[tokio::test]
    async fn test_register_rejects_duplicates_and_admin_role() {
        let db = DatabaseConnection::in_memory().await.unwrap();
        let auth = AuthService::new(24);
        auth.register(db.pool(), registration("alice", "user")).await.unwrap();

        let err = auth.register(db.pool(), registration("alice", "user")).await.unwrap_err();
        assert!(matches!(err, AuthError::UsernameTaken(_)));

        let mut other = registration("alice2", "user");
        other.email = "ALICE@example.com".to_string();
        let err = auth.register(db.pool(), other).await.unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken(_)));

        let err = auth.register(db.pool(), registration("mallory", "admin")).await.unwrap_err();
        assert!(matches!(err, AuthError::RoleNotAllowed(_)));
    }

    #[tokio::test]
    async fn test_login_authenticate_logout() {
        let db = DatabaseConnection::in_memory().await.unwrap();
        let auth = AuthService::new(24);
        auth.register(db.pool(), registration("carol", "broker")).await.unwrap();

        assert!(matches!(
            auth.login(db.pool(), "carol", "nope").await.unwrap_err(),
            AuthError::InvalidCredentials
        ));

        let (session, user) = auth
            .login(db.pool(), "carol@example.com", "correct horse battery")
            .await
            .unwrap();
        assert_eq!(user.username, "carol");

        let resolved = auth.authenticate(db.pool(), &session.id).await.unwrap().unwrap();
        assert_eq!(resolved.id, user.id);

        assert!(auth.logout(db.pool(), &session.id).await.unwrap());
        assert!(auth.authenticate(db.pool(), &session.id).await.unwrap().is_none());
    }
}
