//! Store configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STOREFRONT_STATE_PATH` - Backing JSON document (default: .storefront-state.json)
//! - `STOREFRONT_STATE_QUOTA_BYTES` - Storage quota in bytes (default: unlimited)
//! - `STOREFRONT_PLACEHOLDER_IMAGE` - Cart image for products without images
//!   (default: <https://via.placeholder.com/150>)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Default backing document path.
pub const DEFAULT_STATE_PATH: &str = ".storefront-state.json";

/// Default image for cart lines whose product has no images.
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/150";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Store configuration.
#[derive(Debug, Clone)]
pub struct StateConfig {
    /// Path of the backing JSON document
    pub state_path: PathBuf,
    /// Storage quota in bytes
    pub quota_bytes: Option<usize>,
    /// Placeholder image URL for cart lines
    pub placeholder_image: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
            quota_bytes: None,
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl StateConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let state_path = PathBuf::from(get_env_or_default(
            "STOREFRONT_STATE_PATH",
            DEFAULT_STATE_PATH,
        ));
        let quota_bytes = get_optional_env("STOREFRONT_STATE_QUOTA_BYTES")
            .map(|value| parse_quota("STOREFRONT_STATE_QUOTA_BYTES", &value))
            .transpose()?;
        let placeholder_image = validate_image_url(
            "STOREFRONT_PLACEHOLDER_IMAGE",
            &get_env_or_default("STOREFRONT_PLACEHOLDER_IMAGE", DEFAULT_PLACEHOLDER_IMAGE),
        )?;

        Ok(Self {
            state_path,
            quota_bytes,
            placeholder_image,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse a positive byte quota.
fn parse_quota(var_name: &str, value: &str) -> Result<usize, ConfigError> {
    let bytes = value
        .trim()
        .parse::<usize>()
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;
    if bytes == 0 {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "must be greater than zero".to_string(),
        ));
    }
    Ok(bytes)
}

/// Validate that an image URL is absolute http(s).
fn validate_image_url(var_name: &str, value: &str) -> Result<String, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(value.to_string())
}
