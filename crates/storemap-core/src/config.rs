use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_DATA_URL: &str = "https://apis.data.go.kr/4050000/ypay/getYpay";
const DEFAULT_GEOCODER_URL: &str = "https://dapi.kakao.com";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is invalid.
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
/// Returns `ConfigError` if a value is invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a plain
/// `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let optional =
        |var: &str| -> Option<String> { lookup(var).ok().filter(|v| !v.trim().is_empty()) };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
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

    let geocoder_api_key = optional("KAKAO_REST_API_KEY");
    let data_service_key = optional("YPAY_SERVICE_KEY");

    let env = parse_environment(&or_default("STOREMAP_ENV", "development"))?;
    let log_level = or_default("STOREMAP_LOG_LEVEL", "info");

    let data_url = or_default("STOREMAP_DATA_URL", DEFAULT_DATA_URL);
    let geocoder_url = or_default("STOREMAP_GEOCODER_URL", DEFAULT_GEOCODER_URL);
    let cache_path = PathBuf::from(or_default(
        "STOREMAP_CACHE_PATH",
        "./.storemap/geo_cache.json",
    ));

    let request_timeout_secs = parse_u64("STOREMAP_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("STOREMAP_USER_AGENT", "storemap/0.1 (store-locator)");

    let geocode_batch_size = parse_usize("STOREMAP_GEOCODE_BATCH_SIZE", "50")?;
    if geocode_batch_size == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "STOREMAP_GEOCODE_BATCH_SIZE".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let geocode_delay_ms = parse_u64("STOREMAP_GEOCODE_DELAY_MS", "50")?;

    Ok(AppConfig {
        env,
        log_level,
        data_service_key,
        data_url,
        geocoder_api_key,
        geocoder_url,
        cache_path,
        request_timeout_secs,
        user_agent,
        geocode_batch_size,
        geocode_delay_ms,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "STOREMAP_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
