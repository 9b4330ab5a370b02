//! ==============================================================================
//! config.rs - Runtime Configuration Loader
//! ==============================================================================
//!
//! purpose:
//!     defines the schema for `host.toml`.
//!     loads configuration from file or falls back to defaults, then applies
//!     environment overrides for the listen address.
//!
//! structure:
//!     - ServerConfig: where the http server listens.
//!     - StoreConfig: history capacity.
//!     - SensorConfig: local sensor file and poll cadence.
//!     - ClusterConfig: hub/spoke role and where spokes push readings.
//!     - LoggingConfig: log level and per-reading logging.
//!
//! ==============================================================================

use crate::error::ConfigError;

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_ENV: &str = "TEMP_HOST_CONFIG";
pub const HOST_ENV: &str = "TEMP_HOST_HOST";
pub const PORT_ENV: &str = "TEMP_HOST_PORT";

/// Root configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct HostConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub sensor: SensorConfig,
    pub cluster: ClusterConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 5000 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StoreConfig {
    pub capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { capacity: crate::store::DEFAULT_CAPACITY }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SensorConfig {
    pub enabled: bool,
    pub path: PathBuf,
    pub interval_seconds: u64,
    pub error_backoff_seconds: u64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: PathBuf::from(crate::sensor::THERMAL_ZONE_PATH),
            interval_seconds: 5,
            error_backoff_seconds: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// receives readings only
    #[default]
    Hub,
    /// polls a local sensor and pushes every reading to the hub
    Spoke,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ClusterConfig {
    pub role: Role,
    pub node_id: String,
    /// no default: a spoke without a hub keeps its readings local
    pub hub_url: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            role: Role::Hub,
            node_id: "node-1".to_string(),
            hub_url: None,
            timeout_seconds: 5,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub show_readings: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), show_readings: true }
    }
}

impl SensorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }

    pub fn error_backoff(&self) -> Duration {
        Duration::from_secs(self.error_backoff_seconds)
    }
}

impl ClusterConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// the hub to push to, only for spokes with a non-empty `hub_url`
    pub fn forward_url(&self) -> Option<&str> {
        match self.role {
            Role::Spoke => self.hub_url.as_deref().map(str::trim).filter(|u| !u.is_empty()),
            Role::Hub => None,
        }
    }

    pub fn forwards(&self) -> bool {
        self.forward_url().is_some()
    }
}

impl HostConfig {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load with default fallback
    ///
    /// search order: $TEMP_HOST_CONFIG, config/host.toml, ../config/host.toml.
    /// runs before logging is initialised, so it reports on stdout.
    pub fn load_or_default() -> Self {
        let mut paths = Vec::new();
        if let Ok(p) = std::env::var(CONFIG_ENV) {
            paths.push(PathBuf::from(p));
        }
        paths.push(PathBuf::from("config").join("host.toml"));
        paths.push(PathBuf::from("..").join("config").join("host.toml"));

        for path in &paths {
            if path.exists() {
                match Self::load(path) {
                    Ok(config) => {
                        println!("[CONFIG] Loaded from {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        println!("[CONFIG] Warning: Failed to load {}: {}", path.display(), e);
                    }
                }
            }
        }

        println!("[CONFIG] Warning: No config file found - using defaults");
        Self::default()
    }

    /// apply `TEMP_HOST_HOST` / `TEMP_HOST_PORT` on top of the file values
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(std::env::var(HOST_ENV).ok(), std::env::var(PORT_ENV).ok());
    }

    fn apply_overrides(&mut self, host: Option<String>, port: Option<String>) {
        if let Some(host) = host.filter(|h| !h.trim().is_empty()) {
            self.server.host = host.trim().to_string();
        }
        if let Some(port) = port {
            match port.trim().parse::<u16>() {
                Ok(p) => self.server.port = p,
                Err(_) => println!("[CONFIG] Warning: ignoring invalid {}={:?}", PORT_ENV, port),
            }
        }
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.server.host, self.server.port);
        raw.parse().map_err(|_| ConfigError::InvalidAddress(raw))
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        println!("┌─────────────────────────────────────────┐");
        println!("│           HOST CONFIGURATION            │");
        println!("├─────────────────────────────────────────┤");
        println!("│ Role: {:?}", self.cluster.role);
        println!("│ Node ID: {}", self.cluster.node_id);
        println!("│ Listen: {}:{}", self.server.host, self.server.port);
        println!("│ History capacity: {}", self.store.capacity);
        if self.sensor.enabled {
            println!("│ Sensor: {} every {}s", self.sensor.path.display(), self.sensor.interval_seconds);
        } else {
            println!("│ Sensor: disabled");
        }
        if let Some(url) = self.cluster.forward_url() {
            println!("│ Hub: {}", url);
        }
        println!("│ Log Level: {}", self.logging.level);
        println!("└─────────────────────────────────────────┘");
    }
}
