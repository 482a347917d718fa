//! Site configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Store
//! - `SAFAR_STORE` - `postgres` (default) or `memory`
//! - `SAFAR_DATABASE_URL` - `PostgreSQL` connection string, falls back to
//!   `DATABASE_URL`; required when the store is `postgres`
//!
//! ## Optional
//! - `SAFAR_HOST` - Bind address (default: 127.0.0.1)
//! - `SAFAR_PORT` - Listen port (default: 3000)
//! - `SAFAR_BASE_URL` - Public URL of the site (default: <http://localhost:3000>)
//! - `SAFAR_SUPERUSER_EMAIL` - Bootstrap admin, always authorized
//! - `SAFAR_PUBLIC_SUPERUSER_EMAIL` - Copy exposed to the UI (default: the superuser email)
//! - `SAFAR_STATIC_DIR` - Prebuilt presentation assets served at `/`
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 0.1)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use safar_core::normalize_email;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Which document store backend to use.
#[derive(Debug, Clone)]
pub enum StoreConfig {
    /// `PostgreSQL` `documents` table.
    Postgres {
        /// Connection URL (contains password).
        database_url: SecretString,
    },
    /// Process-local store; contents are lost on restart.
    Memory,
}

/// Site application configuration.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Document store backend
    pub store: StoreConfig,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of the site
    pub base_url: String,
    /// Normalized superuser email (authorization gate, first tier)
    pub superuser_email: Option<String>,
    /// Superuser email exposed to the UI for conditional rendering
    pub public_superuser_email: Option<String>,
    /// Directory of prebuilt presentation assets
    pub static_dir: Option<PathBuf>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::Memory,
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            superuser_email: None,
            public_superuser_email: None,
            static_dir: None,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.1,
        }
    }
}

impl SiteConfig {
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

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_vars(vars: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let store = match get_env_or_default(&vars, "SAFAR_STORE", "postgres").as_str() {
            "postgres" => StoreConfig::Postgres {
                database_url: get_database_url(&vars, "SAFAR_DATABASE_URL")?,
            },
            "memory" => StoreConfig::Memory,
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "SAFAR_STORE".to_string(),
                    format!("expected `postgres` or `memory`, got `{other}`"),
                ));
            }
        };

        let host = get_env_or_default(&vars, "SAFAR_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("SAFAR_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default(&vars, "SAFAR_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SAFAR_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default(&vars, "SAFAR_BASE_URL", "http://localhost:3000");
        Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("SAFAR_BASE_URL".to_string(), e.to_string()))?;

        let superuser_email = get_optional_email(&vars, "SAFAR_SUPERUSER_EMAIL");
        let public_superuser_email = get_optional_email(&vars, "SAFAR_PUBLIC_SUPERUSER_EMAIL")
            .or_else(|| superuser_email.clone());
        let static_dir = get_optional_env(&vars, "SAFAR_STATIC_DIR").map(PathBuf::from);

        let sentry_dsn = get_optional_env(&vars, "SENTRY_DSN");
        let sentry_environment = get_optional_env(&vars, "SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env(&vars, "SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env(&vars, "SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.1);

        Ok(Self {
            store,
            host,
            port,
            base_url,
            superuser_email,
            public_superuser_email,
            static_dir,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the site is served over HTTPS (enables secure cookies).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL` (used by Fly.io postgres attach).
fn get_database_url(
    vars: &impl Fn(&str) -> Option<String>,
    primary_key: &str,
) -> Result<SecretString, ConfigError> {
    vars(primary_key)
        .or_else(|| vars("DATABASE_URL"))
        .map(SecretString::from)
        .ok_or_else(|| ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable. Blank values count as unset.
fn get_optional_env(vars: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    vars(key).filter(|v| !v.trim().is_empty())
}

/// Get an optional email, normalized.
fn get_optional_email(vars: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    get_optional_env(vars, key).map(|v| normalize_email(&v))
}

/// Get an environment variable with a default value.
fn get_env_or_default(vars: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    get_optional_env(vars, key).unwrap_or_else(|| default.to_string())
}
