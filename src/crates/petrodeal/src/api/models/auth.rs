//! Authentication API models and DTOs

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::middleware::validation::{validate_not_empty, validate_string_length};
use crate::db::models::User;
use crate::services::Registration;

/// Request to create an account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// "user" (default) or "broker"
    pub role: Option<String>,
}

impl RegisterRequest {
    pub fn validate(&self) -> ApiResult<()> {
        validate_string_length(&self.username, "username", 3, 50)?;
        if !self
            .username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
        {
            return Err(ApiError::ValidationError(
                "username may only contain letters, digits, '.', '_' and '-'".to_string(),
            ));
        }
        validate_string_length(&self.email, "email", 3, 255)?;
        match self.email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
            _ => {
                return Err(ApiError::ValidationError(format!(
                    "Invalid email address: {}",
                    self.email
                )))
            }
        }
        validate_string_length(&self.password, "password", 8, 128)?;
        Ok(())
    }

    pub fn into_registration(self) -> Registration {
        Registration {
            username: self.username,
            email: self.email,
            password: self.password,
            role: self.role.unwrap_or_else(|| "user".to_string()),
        }
    }
}

/// Request to open a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Username or email
    pub login: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> ApiResult<()> {
        validate_not_empty(&self.login, "login")?;
        validate_not_empty(&self.password, "password")?;
        Ok(())
    }
}

/// Session issued at login
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_at: String,
    pub user: User,
}
