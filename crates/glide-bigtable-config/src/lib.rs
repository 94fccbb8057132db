// glide-bigtable-config - Configuration for the Big Tables client
//
// Supports configuration from multiple sources:
// 1. Environment variables with the GLIDE_ prefix (highest priority)
// 2. Config file path from GLIDE_CONFIG
// 3. Config file contents from GLIDE_CONFIG_CONTENT
// 4. Default config file locations (./glide.toml, ./.glide.toml)
// 5. Built-in defaults (lowest priority)

use anyhow::Result;
use serde::{Deserialize, Serialize};

mod env_overrides;
mod sources;
mod validation;

pub use env_overrides::{apply_env_overrides, EnvSource, ENV_PREFIX};
pub use sources::{load_from_file_path, load_from_str};

/// Default Big Tables API host.
pub const DEFAULT_API_HOST: &str = "https://api.glideapps.com";

/// Default number of buffered rows that triggers a flush to the stash.
pub const DEFAULT_BATCH_SIZE: usize = 1500;

/// Top-level client configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlideConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub log: LogConfig,
}

/// Connection settings for the Big Tables API
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_host")]
    pub api_host: String,

    #[serde(default)]
    pub api_key: String,

    /// Prefix inserted between the host and every resource path.
    #[serde(default)]
    pub api_path_root: String,

    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_api_host() -> String {
    DEFAULT_API_HOST.to_string()
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_host: default_api_host(),
            api_key: String::new(),
            api_path_root: String::new(),
            batch_size: default_batch_size(),
        }
    }
}

// The api key never shows up in debug output.
impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_host", &self.api_host)
            .field("api_key", &redact_secret(&self.api_key))
            .field("api_path_root", &self.api_path_root)
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

/// Logging configuration consumed by the tracing initializer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => anyhow::bail!("Unsupported log format: {}. Supported: text, json", s),
        }
    }
}

impl GlideConfig {
    /// Load configuration from all sources with priority
    pub fn load() -> Result<Self> {
        sources::load_config()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}

/// Mask all but the last four characters of a secret.
pub fn redact_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat(count - 4), tail)
}
