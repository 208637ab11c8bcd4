use std::path::PathBuf;

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Open-data portal credential. Optional at startup; a load without it
    /// yields an empty store set.
    pub data_service_key: Option<String>,
    pub data_url: String,
    /// Kakao REST key. Optional at startup; only geocoding needs it.
    pub geocoder_api_key: Option<String>,
    pub geocoder_url: String,
    pub cache_path: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub geocode_batch_size: usize,
    pub geocode_delay_ms: u64,
}

impl AppConfig {
    /// The geocoder key, for commands that call the geocoder.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `KAKAO_REST_API_KEY` was
    /// not set.
    pub fn require_geocoder_api_key(&self) -> Result<&str, ConfigError> {
        self.geocoder_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("KAKAO_REST_API_KEY".to_string()))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field(
                "data_service_key",
                &self.data_service_key.as_ref().map(|_| "[redacted]"),
            )
            .field("data_url", &self.data_url)
            .field(
                "geocoder_api_key",
                &self.geocoder_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("geocoder_url", &self.geocoder_url)
            .field("cache_path", &self.cache_path)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("geocode_batch_size", &self.geocode_batch_size)
            .field("geocode_delay_ms", &self.geocode_delay_ms)
            .finish()
    }
}
