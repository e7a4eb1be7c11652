//! Configuration management for the Rice Inspection server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with RICE__ prefix

use std::path::PathBuf;

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Published reference standards
pub const DEFAULT_STANDARDS_URL: &str =
    "https://easyrice-es-trade-data.s3.ap-southeast-1.amazonaws.com/standards.json";

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Inspection storage configuration
    pub storage: StorageConfig,

    /// Reference standards source
    pub standards: StandardsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// JSON file holding inspection records
    pub data_file: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StandardsConfig {
    /// Remote standards.json location
    pub url: String,

    /// Local standards file used instead of the remote one
    pub local_path: Option<PathBuf>,

    /// HTTP timeout in seconds
    pub timeout_secs: u64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("RICE_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 5000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("storage.data_file", "data.json")?
            .set_default("standards.url", DEFAULT_STANDARDS_URL)?
            .set_default("standards.timeout_secs", 10)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (RICE__ prefix)
            .add_source(
                Environment::with_prefix("RICE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            standards: StandardsConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("data.json"),
        }
    }
}

impl Default for StandardsConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_STANDARDS_URL.to_string(),
            local_path: None,
            timeout_secs: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_load_without_files() {
        let config = Config::load().unwrap();
        assert_eq!(config.storage.data_file, PathBuf::from("data.json"));
        assert_eq!(config.standards.timeout_secs, 10);
        assert!(config.standards.local_path.is_none());
    }

    #[test]
    fn test_server_default() {
        let server = ServerConfig::default();
        assert_eq!(server.port, 5000);
        assert_eq!(server.host, "0.0.0.0");
    }
}
