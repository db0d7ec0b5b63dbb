//! Database models
//!
//! Core data models for persistent storage in the PetroDealHub database.
//! All timestamp fields are stored as RFC 3339 strings (TEXT in SQLite) due to
//! sqlx and SQLite type limitations with chrono::DateTime<Utc>.

pub mod company;
pub mod configuration;
pub mod deal;
pub mod document;
pub mod port;
pub mod refinery;
pub mod session;
pub mod subscription;
pub mod user;
pub mod vessel;

pub use company::Company;
pub use configuration::Configuration;
pub use deal::Deal;
pub use document::Document;
pub use port::Port;
pub use refinery::Refinery;
pub use session::Session;
pub use subscription::Subscription;
pub use user::User;
pub use vessel::Vessel;
