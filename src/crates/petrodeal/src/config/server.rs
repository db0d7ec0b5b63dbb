//! Server configuration for petrodeal-server
//!
//! Loads `petrodeal-server.toml`. Every section has defaults, so a missing
//! file or a partial file both yield a usable configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ServerConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(toml::de::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Server identification and bind address
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerInfoConfig {
    /// Server name for identification (displayed to clients)
    pub name: String,
    pub host: String,
    pub port: u16,
    /// Concurrent WebSocket clients accepted
    pub max_ws_connections: usize,
}

impl Default for ServerInfoConfig {
    fn default() -> Self {
        Self {
            name: "petrodeal-server".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_ws_connections: 1000,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database file path
    pub path: String,
    /// Full connection URL; takes precedence over `path`
    pub url: Option<String>,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "petrodeal.db".to_string(),
            url: None,
            max_connections: 5,
        }
    }
}

/// Port/vessel proximity settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProximityConfig {
    pub default_radius_km: f64,
    /// Largest radius a client may request
    pub max_radius_km: f64,
    /// Seconds between proximity broadcasts
    pub broadcast_interval_secs: u64,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            default_radius_km: 50.0,
            max_radius_km: 2000.0,
            broadcast_interval_secs: 15,
        }
    }
}

/// Vessel movement simulator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub enabled: bool,
    pub interval_secs: u64,
    /// Cap on distance moved per tick
    pub max_step_km: f64,
    /// Distance at which a vessel is snapped to its destination port
    pub arrival_threshold_km: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 30,
            max_step_km: 25.0,
            arrival_threshold_km: 5.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SubscriptionConfig {
    pub trial_days: i64,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self { trial_days: 5 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub ttl_hours: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { ttl_hours: 24 }
    }
}

/// Voyage narrative model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub enabled: bool,
    pub base_url: String,
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 30,
        }
    }
}

impl LlmSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Complete server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerInfoConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub proximity: ProximityConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub subscription: SubscriptionConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub llm: LlmSettings,
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ServerConfigError> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(ServerConfigError::ReadError)?;
        Self::from_str(&content)
    }

    /// Load configuration from TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ServerConfigError> {
        let config: Self = toml::from_str(content).map_err(ServerConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit path, or search the defaults
    ///
    /// Search order without an explicit path:
    /// 1. CONFIG_PATH environment variable
    /// 2. ./config/petrodeal-server.toml
    /// 3. ./petrodeal-server.toml
    ///
    /// Falls back to built-in defaults when no file is found. Environment
    /// overrides are applied last.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ServerConfigError> {
        let mut config = match explicit {
            Some(path) => {
                info!(path = %path.display(), "Loading configuration");
                Self::from_file(path)?
            }
            None => Self::search()?,
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn search() -> Result<Self, ServerConfigError> {
        if let Ok(config_path) = std::env::var("CONFIG_PATH") {
            info!(path = %config_path, "Loading configuration from CONFIG_PATH");
            return Self::from_file(config_path);
        }

        let paths = [
            PathBuf::from("config/petrodeal-server.toml"),
            PathBuf::from("./petrodeal-server.toml"),
        ];

        for path in &paths {
            if path.exists() {
                info!(path = %path.display(), "Loading configuration");
                return Self::from_file(path);
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Apply HOST, PORT and DATABASE_URL overrides from `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ServerConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ServerConfigError::InvalidConfig(format!("PORT '{}' is not a port", port)))?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = Some(url);
        }
        Ok(())
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<(), ServerConfigError> {
        let p = &self.proximity;
        if !(p.default_radius_km > 0.0 && p.default_radius_km.is_finite()) {
            return Err(ServerConfigError::InvalidConfig(
                "proximity.default_radius_km must be positive".to_string(),
            ));
        }
        if p.max_radius_km < p.default_radius_km {
            return Err(ServerConfigError::InvalidConfig(
                "proximity.max_radius_km must be >= default_radius_km".to_string(),
            ));
        }
        if p.broadcast_interval_secs == 0 || self.simulation.interval_secs == 0 {
            return Err(ServerConfigError::InvalidConfig(
                "background intervals must be at least one second".to_string(),
            ));
        }
        if self.simulation.max_step_km <= 0.0 || self.simulation.arrival_threshold_km < 0.0 {
            return Err(ServerConfigError::InvalidConfig(
                "simulation distances must be positive".to_string(),
            ));
        }
        if self.subscription.trial_days <= 0 || self.session.ttl_hours <= 0 {
            return Err(ServerConfigError::InvalidConfig(
                "trial_days and ttl_hours must be positive".to_string(),
            ));
        }
        if self.server.max_ws_connections == 0 {
            return Err(ServerConfigError::InvalidConfig(
                "server.max_ws_connections must be at least 1".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ServerConfigError::InvalidConfig(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Get database URL from configuration
    pub fn database_url(&self) -> String {
        self.database
            .url
            .clone()
            .unwrap_or_else(|| format!("sqlite://{}", self.database.path))
    }

    /// Address to bind the HTTP listener to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
