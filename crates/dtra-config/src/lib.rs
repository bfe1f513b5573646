use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

/// Configuration error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    LoadError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Transport towards Diameter peers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    #[default]
    Tcp,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DiameterConfig {
    /// Listen address, `host:port`
    #[validate(length(min = 1))]
    #[serde(default = "default_diameter_addr")]
    pub addr: String,
    /// Origin-Host of every answer
    #[validate(length(min = 1))]
    pub diam_host: String,
    /// Origin-Realm of every answer
    #[validate(length(min = 1))]
    pub diam_realm: String,
    #[serde(default)]
    pub network_type: NetworkType,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RadiusConfig {
    /// Server host name or address, without port
    #[validate(length(min = 1))]
    pub addr: String,
    #[validate(length(min = 1))]
    pub secret: String,
    #[validate(range(min = 1))]
    #[serde(default = "default_auth_port")]
    pub auth_port: u16,
    #[validate(range(min = 1))]
    #[serde(default = "default_acct_port")]
    pub acct_port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ExchangeConfig {
    /// Wait budget for one RADIUS exchange
    #[validate(range(min = 1, max = 60000))]
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Forwarding queue capacity
    #[validate(range(min = 1))]
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl ExchangeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

/// Gateway configuration, read once at startup
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GatewayConfig {
    #[validate(length(min = 1))]
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[validate(length(min = 1))]
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[validate(nested)]
    pub diameter: DiameterConfig,
    #[validate(nested)]
    pub radius: RadiusConfig,
    #[validate(nested)]
    #[serde(default)]
    pub exchange: ExchangeConfig,
    /// Extra dictionary XML files, loaded on top of the built-in AVPs
    #[serde(default)]
    pub dictionary_paths: Vec<String>,
}

fn default_service_name() -> String {
    "dtra".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_diameter_addr() -> String {
    "0.0.0.0:3868".to_string()
}

fn default_auth_port() -> u16 {
    1812
}

fn default_acct_port() -> u16 {
    1813
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_queue_capacity() -> usize {
    100
}

/// Load configuration from file, with `DTRA_` environment overrides
/// (`DTRA_RADIUS__SECRET` overrides `radius.secret`)
pub fn load_config<T>(path: &str) -> Result<T, ConfigError>
where
    T: for<'de> Deserialize<'de> + Validate,
{
    let config: T = config::Config::builder()
        .add_source(config::File::with_name(path))
        .add_source(config::Environment::with_prefix("DTRA").separator("__"))
        .build()
        .map_err(|e| ConfigError::LoadError(e.to_string()))?
        .try_deserialize()
        .map_err(|e| ConfigError::LoadError(e.to_string()))?;

    config
        .validate()
        .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
    Ok(config)
}

/// Load configuration from YAML string (for testing)
pub fn load_from_yaml<T>(yaml: &str) -> Result<T, ConfigError>
where
    T: for<'de> Deserialize<'de> + Validate,
{
    let config: T =
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::LoadError(e.to_string()))?;
    config
        .validate()
        .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
    Ok(config)
}
