/// CLI configuration
use crate::error::{CliError, Result};
use diary_identity::CachePolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default = "default_backend")]
    pub backend: BackendSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_cache")]
    pub cache: CacheSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendSettings {
    #[serde(default = "default_backend_url")]
    pub url: String,

    #[serde(default)]
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheSettings {
    #[serde(default = "default_positive_ttl_secs")]
    pub positive_ttl_secs: u64,

    #[serde(default = "default_negative_ttl_secs")]
    pub negative_ttl_secs: u64,
}

impl CacheSettings {
    pub fn policy(&self) -> CachePolicy {
        CachePolicy::with_ttls(
            Duration::from_secs(self.positive_ttl_secs),
            Duration::from_secs(self.negative_ttl_secs),
        )
    }
}

impl CliConfig {
    /// Load configuration from file and environment
    ///
    /// `path` must exist when given; otherwise `config.toml` in the working
    /// directory is read if present. Environment variables prefixed with
    /// `DIARY_` override both, with `__` between section and key
    /// (`DIARY_BACKEND__ACCESS_TOKEN`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()).required(true));
            }
            None => {
                let config_path = PathBuf::from("config.toml");
                if config_path.exists() {
                    settings = settings.add_source(config::File::from(config_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("DIARY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.backend.url.trim().is_empty() {
            return Err(CliError::Config(
                "Backend URL is required (set DIARY_BACKEND__URL)".to_string(),
            ));
        }

        if self.cache.positive_ttl_secs == 0 || self.cache.negative_ttl_secs == 0 {
            return Err(CliError::Config(
                "Cache TTLs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_backend() -> BackendSettings {
    BackendSettings {
        url: default_backend_url(),
        access_token: None,
    }
}

fn default_backend_url() -> String {
    "http://127.0.0.1:80".to_string()
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/identity.db".to_string()
}

fn default_cache() -> CacheSettings {
    CacheSettings {
        positive_ttl_secs: default_positive_ttl_secs(),
        negative_ttl_secs: default_negative_ttl_secs(),
    }
}

fn default_positive_ttl_secs() -> u64 {
    300
}

fn default_negative_ttl_secs() -> u64 {
    3600
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            storage: default_storage(),
            cache: default_cache(),
        }
    }
}
