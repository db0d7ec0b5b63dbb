//! Database module for the PetroDealHub server
//!
//! Provides database connectivity, models, repositories, reference-data
//! seeding and error handling.

pub mod connection;
pub mod error;
pub mod models;
pub mod repositories;
pub mod seed;

pub use connection::{DatabaseConnection, DatabasePool, PoolStatistics};
pub use error::{DatabaseError, DbResult};
