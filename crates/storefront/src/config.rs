//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `INVENTORY_BASE_URL` - Root URL of the inventory service (e.g., `http://localhost:3333`)
//!
//! ## Optional
//! - `INVENTORY_API_TOKEN` - Bearer token sent to the inventory service
//! - `INVENTORY_TIMEOUT_SECS` - Per-request transport timeout (default: 10)
//! - `PRODUCT_CACHE_TTL_SECS` - Product details cache TTL, 0 disables (default: 300)
//! - `CART_STORE_PATH` - File backing the cart store (default: `.rocket-shoes/cart-store.json`)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_TIMEOUT_SECS: &str = "10";
const DEFAULT_PRODUCT_CACHE_TTL_SECS: &str = "300";
const DEFAULT_STORE_PATH: &str = ".rocket-shoes/cart-store.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart application configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Inventory service configuration
    pub inventory: InventoryConfig,
    /// File backing the persistent cart store
    pub store_path: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Inventory service configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct InventoryConfig {
    /// Root URL of the inventory service
    pub base_url: Url,
    /// Optional bearer token
    pub api_token: Option<SecretString>,
    /// Transport timeout for each request
    pub timeout: Duration,
    /// How long fetched product details stay cached (zero disables caching)
    pub product_cache_ttl: Duration,
}

impl std::fmt::Debug for InventoryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventoryConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .field("product_cache_ttl", &self.product_cache_ttl)
            .finish()
    }
}

impl InventoryConfig {
    /// Configuration with default timeout and cache TTL for the given service root.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            api_token: None,
            timeout: Duration::from_secs(10),
            product_cache_ttl: Duration::from_secs(300),
        }
    }

    fn from_env() -> Result<Self, ConfigError> {
        let base_url = parse_url(
            "INVENTORY_BASE_URL",
            &get_required_env("INVENTORY_BASE_URL")?,
        )?;
        let timeout = parse_secs(
            "INVENTORY_TIMEOUT_SECS",
            &get_env_or_default("INVENTORY_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS),
        )?;
        let product_cache_ttl = parse_secs(
            "PRODUCT_CACHE_TTL_SECS",
            &get_env_or_default("PRODUCT_CACHE_TTL_SECS", DEFAULT_PRODUCT_CACHE_TTL_SECS),
        )?;

        Ok(Self {
            base_url,
            api_token: get_optional_env("INVENTORY_API_TOKEN").map(SecretString::from),
            timeout,
            product_cache_ttl,
        })
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            inventory: InventoryConfig::from_env()?,
            store_path: PathBuf::from(get_env_or_default("CART_STORE_PATH", DEFAULT_STORE_PATH)),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme `{}`", url.scheme()),
        ));
    }
    Ok(url)
}

fn parse_secs(key: &str, raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
