// Configuration source loading.
//
// Priority order:
// 1. Environment variables (GLIDE_* prefix)
// 2. Config file path from GLIDE_CONFIG
// 3. Inline config content from GLIDE_CONFIG_CONTENT
// 4. Default config files (./glide.toml, ./.glide.toml)
// 5. Built-in defaults

use crate::env_overrides::{self, EnvSource, ENV_PREFIX};
use crate::GlideConfig;
use anyhow::{Context, Result};
use std::env;
use std::path::Path;

const DEFAULT_CONFIG_FILES: [&str; 2] = ["./glide.toml", "./.glide.toml"];

/// Load configuration from files, environment, and defaults.
pub fn load_config() -> Result<GlideConfig> {
    let mut config = load_from_file()?.unwrap_or_default();
    env_overrides::apply_env_overrides(&mut config, &StdEnvSource)?;
    config.validate()?;
    Ok(config)
}

fn load_from_file() -> Result<Option<GlideConfig>> {
    if let Ok(path) = env::var("GLIDE_CONFIG") {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        let config: GlideConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;
        return Ok(Some(config));
    }

    if let Ok(content) = env::var("GLIDE_CONFIG_CONTENT") {
        let config: GlideConfig = toml::from_str(&content)
            .context("Failed to parse inline config from GLIDE_CONFIG_CONTENT")?;
        return Ok(Some(config));
    }

    for path in DEFAULT_CONFIG_FILES {
        if Path::new(path).exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path))?;
            let config: GlideConfig = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path))?;
            return Ok(Some(config));
        }
    }

    Ok(None)
}

/// Load configuration from a specific file path, then apply environment
/// overrides. Returns an error if the file doesn't exist or can't be parsed.
pub fn load_from_file_path(path: impl AsRef<Path>) -> Result<GlideConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let mut config: GlideConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    env_overrides::apply_env_overrides(&mut config, &StdEnvSource)?;

    config.validate()?;
    Ok(config)
}

/// Parse and validate TOML config content with overrides from `env`.
pub fn load_from_str<E: EnvSource>(content: &str, env: &E) -> Result<GlideConfig> {
    let mut config: GlideConfig = toml::from_str(content).context("Failed to parse config")?;
    env_overrides::apply_env_overrides(&mut config, env)?;
    config.validate()?;
    Ok(config)
}

struct StdEnvSource;

impl EnvSource for StdEnvSource {
    fn get(&self, key: &str) -> Option<String> {
        env::var(format!("{}{}", ENV_PREFIX, key)).ok()
    }
}
