use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default; only malformed values are errors.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Empty strings count as unset so `.env` templates can leave keys blank.
    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let log_level = or_default("CJENIK_LOG_LEVEL", "info");
    let chains_path = optional("CJENIK_CHAINS_PATH").map(PathBuf::from);
    let snapshot_tag = or_default("CJENIK_SNAPSHOT_TAG", "jucer");
    if snapshot_tag.trim().is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "CJENIK_SNAPSHOT_TAG".to_string(),
            reason: "snapshot tag must be non-empty".to_string(),
        });
    }
    let source_dir = PathBuf::from(or_default("CJENIK_SOURCE_DIR", "./data"));
    let source_base_url = optional("CJENIK_SOURCE_BASE_URL");
    let source_token = optional("CJENIK_SOURCE_TOKEN");

    let fetch_timeout_secs = parse_u64("CJENIK_FETCH_TIMEOUT_SECS", "30")?;
    if fetch_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "CJENIK_FETCH_TIMEOUT_SECS".to_string(),
            reason: "fetch timeout must be at least 1 second".to_string(),
        });
    }
    let user_agent = or_default("CJENIK_USER_AGENT", "cjenik/0.1 (price-search)");
    let max_retries = parse_u32("CJENIK_MAX_RETRIES", "3")?;
    let retry_backoff_base_ms = parse_u64("CJENIK_RETRY_BACKOFF_BASE_MS", "500")?;
    let cache_ttl_secs = parse_u64("CJENIK_CACHE_TTL_SECS", "3600")?;
    let max_concurrent_sources = parse_usize("CJENIK_MAX_CONCURRENT_SOURCES", "0")?;

    Ok(AppConfig {
        log_level,
        chains_path,
        snapshot_tag,
        source_dir,
        source_base_url,
        source_token,
        fetch_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
        cache_ttl_secs,
        max_concurrent_sources,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
