//! Configuration management for cabstats
//!
//! Default config location: ./cabstats.toml

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub transform: TransformConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Directory served under /static/
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    #[serde(default)]
    pub cors: CorsConfig,
}

fn default_bind_addr() -> String {
    "localhost:8010".to_string()
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("./static")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            static_dir: default_static_dir(),
            cors: CorsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Allowed origins. Use "*" for any origin.
    #[serde(default = "default_cors_origins")]
    pub origins: Vec<String>,
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".to_string(),
        "http://127.0.0.1:5173".to_string(),
    ]
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            origins: default_cors_origins(),
        }
    }
}

/// Connection settings for the analytics service that executes built queries
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalyticsConfig {
    #[serde(default = "default_analytics_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_password")]
    pub password: String,
    /// Dataset queried when no vendor is requested
    #[serde(default = "default_dataset")]
    pub dataset: String,
    /// Year the time windows are anchored to
    #[serde(default = "default_year")]
    pub year: i32,
    /// Request timeout in milliseconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
    /// Vendor name -> dataset
    #[serde(default = "default_vendor_datasets")]
    pub vendors: HashMap<String, String>,
}

fn default_analytics_endpoint() -> String {
    "http://localhost:8095".to_string()
}

fn default_username() -> String {
    "user".to_string()
}

fn default_password() -> String {
    "password".to_string()
}

fn default_dataset() -> String {
    "alltaxis".to_string()
}

fn default_vendor_datasets() -> HashMap<String, String> {
    HashMap::from([
        ("green".to_string(), "greentaxis".to_string()),
        ("yellow".to_string(), "yellowtaxis".to_string()),
    ])
}

fn default_year() -> i32 {
    2016
}

fn default_request_timeout() -> u64 {
    75_000
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            endpoint: default_analytics_endpoint(),
            username: default_username(),
            password: default_password(),
            dataset: default_dataset(),
            year: default_year(),
            request_timeout_ms: default_request_timeout(),
            vendors: default_vendor_datasets(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransformConfig {
    /// Output file written by `cabstats reformat`
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Tag appended to every normalized record
    #[serde(default = "default_taxi_type")]
    pub taxi_type: String,
}

fn default_output() -> PathBuf {
    PathBuf::from(crate::transform::DEFAULT_OUTPUT_FILE)
}

fn default_taxi_type() -> String {
    crate::transform::DEFAULT_TAXI_TYPE.to_string()
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            taxi_type: default_taxi_type(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log output format: "pretty" or "json"
    /// Override with LOG_FORMAT env var
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter string
    /// Override with RUST_LOG env var
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable Prometheus metrics at GET /metrics
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_log_level() -> String {
    "info,cabstats=debug".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: default_log_format(),
            log_level: default_log_level(),
            metrics_enabled: true,
        }
    }
}

/// Expand ~ to home directory in path
pub fn expand_tilde(path: &Path) -> Result<PathBuf> {
    let s = path.to_string_lossy();
    if let Some(rest) = s.strip_prefix("~/") {
        let home = dirs::home_dir().ok_or_else(|| anyhow!("Cannot determine home directory"))?;
        Ok(home.join(rest))
    } else if s == "~" {
        dirs::home_dir().ok_or_else(|| anyhow!("Cannot determine home directory"))
    } else {
        Ok(path.to_path_buf())
    }
}

impl Config {
    /// Load config from file path, falling back to defaults without writing
    pub fn load(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(config_path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.expand_paths()?;
        Ok(config)
    }

    /// Load config from file path, or create default
    pub fn load_or_create(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            Self::load(config_path)
        } else {
            let config = Config::default();
            if let Err(e) = config.save(config_path) {
                tracing::warn!(
                    "Could not write default config to {}: {}",
                    config_path.display(),
                    e
                );
            }
            Ok(config)
        }
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// Expand ~ in all paths
    fn expand_paths(&mut self) -> Result<()> {
        self.server.static_dir = expand_tilde(&self.server.static_dir)?;
        self.transform.output = expand_tilde(&self.transform.output)?;
        Ok(())
    }
}
