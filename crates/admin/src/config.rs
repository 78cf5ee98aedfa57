//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `ADMIN_BASE_URL` - Public URL (default: `http://<host>:<port>`); an
//!   `https://` URL marks the session cookie `Secure`
//! - `ADMIN_SESSION_HOURS` - Inactivity before a login expires (default: 24)
//! - `LEADBOOK_DATA_PATH` - JSON store file shared with the storefront
//!   (default: in-memory, lost on restart)
//! - `LEADBOOK_NAMESPACE` - Store key prefix (default: leadbook)
//! - `LEADBOOK_LOG_JSON` - Emit JSON logs when set to `1` or `true`
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` / `SENTRY_TRACES_SAMPLE_RATE` - Sample rates (default: 1.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use leadbook_store::{DEFAULT_NAMESPACE, StoreConfig};
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the admin console
    pub base_url: String,
    /// Hours of inactivity before the admin session expires
    pub session_hours: i64,
    /// Store file path; `None` keeps records in memory
    pub data_path: Option<PathBuf>,
    /// Store key namespace
    pub store: StoreConfig,
    /// Emit JSON-formatted logs
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3001,
            base_url: "http://127.0.0.1:3001".to_string(),
            session_hours: 24,
            data_path: None,
            store: StoreConfig::default(),
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        }
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = parse_var::<IpAddr>(&lookup, "ADMIN_HOST", "127.0.0.1")?;
        let port = parse_var::<u16>(&lookup, "ADMIN_PORT", "3001")?;
        let base_url = lookup("ADMIN_BASE_URL").unwrap_or_else(|| format!("http://{host}:{port}"));
        let session_hours = parse_var::<i64>(&lookup, "ADMIN_SESSION_HOURS", "24")?;
        if session_hours <= 0 {
            return Err(ConfigError::InvalidEnvVar(
                "ADMIN_SESSION_HOURS".to_string(),
                "must be positive".to_string(),
            ));
        }

        let data_path = lookup("LEADBOOK_DATA_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        let store = StoreConfig::with_namespace(
            lookup("LEADBOOK_NAMESPACE").unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
        );
        let log_json = lookup("LEADBOOK_LOG_JSON").is_some_and(|v| {
            matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
        });

        let sentry_dsn = lookup("SENTRY_DSN").filter(|v| !v.is_empty());
        let sentry_environment = lookup("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = lookup("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = lookup("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            host,
            port,
            base_url,
            session_hours,
            data_path,
            store,
            log_json,
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

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(key).unwrap_or_else(|| default.to_string());
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<AdminConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AdminConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3001");
        assert_eq!(config.session_hours, 24);
        assert_eq!(config.store.namespace, "leadbook");
        assert!(!config.is_secure());
    }

    #[test]
    fn test_https_base_url_is_secure() {
        let config = load(&[("ADMIN_BASE_URL", "https://admin.example.org")]).unwrap();
        assert!(config.is_secure());
    }

    #[test]
    fn test_session_hours_must_be_positive() {
        assert!(load(&[("ADMIN_SESSION_HOURS", "0")]).is_err());
        assert!(load(&[("ADMIN_SESSION_HOURS", "soon")]).is_err());
        assert_eq!(load(&[("ADMIN_SESSION_HOURS", "8")]).unwrap().session_hours, 8);
    }

    #[test]
    fn test_invalid_host() {
        let err = load(&[("ADMIN_HOST", "localhost:3001")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "ADMIN_HOST"));
    }
}
