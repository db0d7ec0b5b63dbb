//! API middleware layer
//!
//! CORS, request logging, bearer-session authentication and validation.

pub mod auth;
pub mod cors;
pub mod logging;
pub mod validation;

pub use auth::{
    bearer_token, handshake_token, require_admin, require_capability, AuthUser, MaybeUser,
    RealtimeClient,
};
pub use cors::cors_layer;
pub use logging::logging_layer;
pub use validation::{
    validate_coordinates, validate_not_empty, validate_one_of, validate_optional_uuid,
    validate_pagination, validate_radius, validate_string_length, validate_timestamp,
    validate_uuid,
};
