// Configuration validation
//
// Validates that required fields are present and values are sensible

use crate::{ApiConfig, GlideConfig, LogConfig};
use anyhow::{bail, Context, Result};
use tracing::warn;

const LARGE_BATCH_SIZE: usize = 100_000;

pub fn validate_config(config: &GlideConfig) -> Result<()> {
    validate_api_config(&config.api)?;
    validate_log_config(&config.log)?;
    Ok(())
}

fn validate_api_config(config: &ApiConfig) -> Result<()> {
    if config.api_key.trim().is_empty() {
        bail!("api.api_key is required");
    }

    let host = url::Url::parse(&config.api_host)
        .with_context(|| format!("api.api_host is not a valid URL: {}", config.api_host))?;
    if !matches!(host.scheme(), "http" | "https") {
        bail!(
            "api.api_host must use http or https, got '{}'",
            host.scheme()
        );
    }

    if config.batch_size == 0 {
        bail!("api.batch_size must be greater than 0");
    }

    // Large batches are sent as one request before any 413 backoff kicks in
    if config.batch_size > LARGE_BATCH_SIZE {
        warn!(
            batch_size = config.batch_size,
            "api.batch_size is very large; expect payload-too-large retries"
        );
    }

    Ok(())
}

fn validate_log_config(config: &LogConfig) -> Result<()> {
    if config.level.trim().is_empty() {
        bail!("log.level must not be empty");
    }
    Ok(())
}
