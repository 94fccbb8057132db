use super::GlideConfig;
use anyhow::{anyhow, Context, Result};

pub const ENV_PREFIX: &str = "GLIDE_";

/// Abstraction over environment-variable lookups so tests and embedding
/// harnesses can supply their own source of overrides.
pub trait EnvSource {
    /// Look up `key` with the GLIDE_ prefix applied.
    fn get(&self, key: &str) -> Option<String>;
}

/// Apply environment-variable overrides (highest priority) to the config.
pub fn apply_env_overrides<E: EnvSource>(config: &mut GlideConfig, env: &E) -> Result<()> {
    // API connection
    if let Some(host) = env.get("API_HOST") {
        config.api.api_host = host;
    }
    if let Some(key) = env.get("API_KEY") {
        config.api.api_key = key;
    }
    if let Some(root) = env.get("API_PATH_ROOT") {
        config.api.api_path_root = root;
    }
    if let Some(val) = get_env_usize(env, "BATCH_SIZE")? {
        config.api.batch_size = val;
    }

    // Logging
    if let Some(level) = env.get("LOG_LEVEL") {
        config.log.level = level;
    }
    if let Some(format) = env.get("LOG_FORMAT") {
        config.log.format = format
            .parse()
            .with_context(|| format!("Invalid {}LOG_FORMAT value", ENV_PREFIX))?;
    }

    Ok(())
}

fn get_env_usize<E: EnvSource>(env: &E, key: &str) -> Result<Option<usize>> {
    match env.get(key) {
        Some(val) => {
            let parsed = val
                .trim()
                .parse::<usize>()
                .map_err(|e| anyhow!("Failed to parse {}{}: {}", ENV_PREFIX, key, e))?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}
