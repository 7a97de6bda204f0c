//! Backend client configuration

use predictpix_core::PredictError;
use std::env;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Preferred variable holding the backend base URL
pub const ENV_API_URL: &str = "PREDICTPIX_API_URL";

/// Fallback variable name used by the mobile app build
pub const ENV_API_URL_FALLBACK: &str = "API_URL";

/// Access token issued after the wallet-network login
pub const ENV_ACCESS_TOKEN: &str = "PREDICTPIX_ACCESS_TOKEN";

/// Request timeout override in seconds
pub const ENV_TIMEOUT_SECS: &str = "PREDICTPIX_HTTP_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_USER_AGENT: &str = "predictpix-client/0.1";

/// Configuration for [`crate::PredictPixClient`]
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL without a trailing slash, e.g. `https://api.predictpix.app/v1`
    pub base_url: String,
    /// Bearer token for authenticated endpoints
    pub access_token: Option<String>,
    pub timeout: Duration,
    pub user_agent: String,
}

impl ApiConfig {
    /// Create a configuration for the given base URL with default settings
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url(base_url.as_ref())?,
            access_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load configuration from environment variables
    ///
    /// Reads a `.env` file first if one exists. Expects:
    /// - PREDICTPIX_API_URL (or API_URL): backend base URL
    /// - PREDICTPIX_ACCESS_TOKEN: optional bearer token
    /// - PREDICTPIX_HTTP_TIMEOUT_SECS: optional timeout, defaults to 30
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(ENV_API_URL)
            .or_else(|| lookup(ENV_API_URL_FALLBACK))
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingVar(ENV_API_URL))?;

        let mut config = Self::new(base_url)?;

        if let Some(token) = lookup(ENV_ACCESS_TOKEN).filter(|t| !t.trim().is_empty()) {
            config.access_token = Some(token.trim().to_string());
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
            if secs == 0 {
                return Err(ConfigError::InvalidTimeout(raw));
            }
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("has_access_token", &self.access_token.is_some())
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed).map_err(|e| ConfigError::InvalidUrl {
        url: trimmed.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.trim_end_matches('/').to_string()),
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingVar(&'static str),

    #[error("Invalid API URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Invalid timeout: {0}")]
    InvalidTimeout(String),
}

impl From<ConfigError> for PredictError {
    fn from(err: ConfigError) -> Self {
        PredictError::config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config =
            ApiConfig::from_lookup(lookup(&[("PREDICTPIX_API_URL", "https://api.example.com/v1/")]))
                .unwrap();
        assert_eq!(config.base_url, "https://api.example.com/v1");
        assert_eq!(config.access_token, None);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_fallback_url_and_token() {
        let config = ApiConfig::from_lookup(lookup(&[
            ("API_URL", "http://localhost:3000"),
            ("PREDICTPIX_ACCESS_TOKEN", " pi-token "),
            ("PREDICTPIX_HTTP_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.access_token.as_deref(), Some("pi-token"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_missing_url() {
        let err = ApiConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("PREDICTPIX_API_URL")));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            ApiConfig::new("not a url"),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            ApiConfig::new("ftp://example.com"),
            Err(ConfigError::UnsupportedScheme(_))
        ));
        assert!(matches!(
            ApiConfig::from_lookup(lookup(&[
                ("PREDICTPIX_API_URL", "https://api.example.com"),
                ("PREDICTPIX_HTTP_TIMEOUT_SECS", "0"),
            ])),
            Err(ConfigError::InvalidTimeout(_))
        ));
    }

    #[test]
    fn test_debug_hides_token() {
        let config = ApiConfig::new("https://api.example.com")
            .unwrap()
            .with_access_token("secret-token");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("has_access_token: true"));
    }
}
