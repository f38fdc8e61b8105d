mod defaults;


use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::BessoError;
use defaults::*;

/// Top-level Besso configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub besso: BessoConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// General service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BessoConfig {
    #[serde(default = "default_name")]
    pub name: String,
    /// Used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BessoConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
        }
    }
}

/// HTTP endpoint the voice platform posts to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Which document store backs the building records.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Firestore over REST, authenticated with a service-account key.
    #[default]
    Firestore,
    /// Process-local map, optionally seeded from a JSON file.
    Memory,
}

impl StoreBackend {
    pub fn display_name(&self) -> &str {
        match self {
            Self::Firestore => "firestore",
            Self::Memory => "memory",
        }
    }
}

/// Document store config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Environment variable holding the base64-encoded service-account JSON.
    #[serde(default = "default_credential_env")]
    pub credential_env: String,
    /// Overrides the project id found in the credential.
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default = "default_database")]
    pub database: String,
    /// REST root, e.g. an emulator at `http://localhost:8081/v1`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// JSON seed for the memory backend: `{"Collection/id": {"field": value}}`.
    #[serde(default)]
    pub seed_file: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            credential_env: default_credential_env(),
            project_id: None,
            database: default_database(),
            base_url: default_base_url(),
            seed_file: None,
        }
    }
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, BessoError> {
    let path = Path::new(path);
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| BessoError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| BessoError::Config(format!("failed to parse config: {}", e)))?;

    Ok(config)
}
