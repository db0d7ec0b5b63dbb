//! Application services
//!
//! Multi-step operations over the repositories: authentication and
//! subscription lifecycle.

pub mod auth;
pub mod subscription;

pub use auth::{hash_password, verify_password, AuthError, AuthService, Registration};
pub use subscription::{SubscriptionError, SubscriptionService, BILLING_PERIOD_DAYS};
