//! Configuration module for petrodeal-server
//!
//! Provides TOML configuration loading with environment overrides for the
//! server, database, proximity, simulation, subscription, session and LLM
//! settings.

pub mod server;

pub use server::{
    DatabaseConfig, LlmSettings, ProximityConfig, ServerConfig, ServerConfigError,
    ServerInfoConfig, SessionConfig, SimulationConfig, SubscriptionConfig,
};
