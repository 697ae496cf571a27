//! Site configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ATRIBOT_BASE_URL` - Public URL for the site
//!
//! ## Optional
//! - `ATRIBOT_HOST` - Bind address (default: 127.0.0.1)
//! - `ATRIBOT_PORT` - Listen port (default: 3000)
//! - `ATRIBOT_QR_BASE_URL` - Host printed into kit-card QR codes (default: <https://www.atribot.in>)
//! - `ATRIBOT_ACTIVATION_DELAY_MS` - Simulated license check latency (default: 1500)
//! - `ATRIBOT_AUTH_DELAY_MS` - Simulated login/signup latency (default: 1000)
//! - `ATRIBOT_SESSION_DAYS` - Session inactivity expiry (default: 30)
//! - `ATRIBOT_LOG_FORMAT` - `text` or `json` (default: text)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0 to 1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0 to 1.0 (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_QR_BASE_URL: &str = "https://www.atribot.in";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Web application configuration.
///
/// Implements `Debug` manually to redact the Sentry DSN.
#[derive(Clone)]
pub struct WebConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the site
    pub base_url: String,
    /// Base URL encoded into kit-card QR codes
    pub qr_base_url: String,
    /// Latency added to every license check
    pub activation_delay: Duration,
    /// Latency added to every login and signup
    pub auth_delay: Duration,
    /// Days of inactivity before a session expires
    pub session_days: i64,
    /// Emit logs as JSON lines instead of human readable text
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<SecretString>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions sent to Sentry
    pub sentry_traces_sample_rate: f32,
}

impl std::fmt::Debug for WebConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("base_url", &self.base_url)
            .field("qr_base_url", &self.qr_base_url)
            .field("activation_delay", &self.activation_delay)
            .field("auth_delay", &self.auth_delay)
            .field("session_days", &self.session_days)
            .field("log_json", &self.log_json)
            .field(
                "sentry_dsn",
                &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"),
            )
            .field("sentry_environment", &self.sentry_environment)
            .field("sentry_sample_rate", &self.sentry_sample_rate)
            .field("sentry_traces_sample_rate", &self.sentry_traces_sample_rate)
            .finish()
    }
}

impl WebConfig {
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

        let host = parse_env_or_default::<IpAddr>("ATRIBOT_HOST", "127.0.0.1")?;
        let port = parse_env_or_default::<u16>("ATRIBOT_PORT", "3000")?;
        let base_url = get_url_env("ATRIBOT_BASE_URL", None)?;
        let qr_base_url = get_url_env("ATRIBOT_QR_BASE_URL", Some(DEFAULT_QR_BASE_URL))?;
        let activation_delay = Duration::from_millis(parse_env_or_default::<u64>(
            "ATRIBOT_ACTIVATION_DELAY_MS",
            "1500",
        )?);
        let auth_delay =
            Duration::from_millis(parse_env_or_default::<u64>("ATRIBOT_AUTH_DELAY_MS", "1000")?);

        let session_days = parse_env_or_default::<i64>("ATRIBOT_SESSION_DAYS", "30")?;
        if session_days < 1 {
            return Err(ConfigError::InvalidEnvVar(
                "ATRIBOT_SESSION_DAYS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let log_json = match get_env_or_default("ATRIBOT_LOG_FORMAT", "text").trim() {
            "text" => false,
            "json" => true,
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "ATRIBOT_LOG_FORMAT".to_string(),
                    format!("expected `text` or `json`, got `{other}`"),
                ));
            }
        };

        let sentry_dsn = get_optional_env("SENTRY_DSN").map(SecretString::from);
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_sample_rate("SENTRY_SAMPLE_RATE", "1.0")?;
        let sentry_traces_sample_rate = get_sample_rate("SENTRY_TRACES_SAMPLE_RATE", "0.0")?;

        Ok(Self {
            host,
            port,
            base_url,
            qr_base_url,
            activation_delay,
            auth_delay,
            session_days,
            log_json,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Configuration for in-process tests: no latency, no Sentry.
    #[must_use]
    pub fn for_tests() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            qr_base_url: DEFAULT_QR_BASE_URL.to_string(),
            activation_delay: Duration::ZERO,
            auth_delay: Duration::ZERO,
            session_days: 30,
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether session cookies must be marked `Secure`.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default`.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Read an absolute URL, trimming any trailing slash.
fn get_url_env(key: &str, default: Option<&str>) -> Result<String, ConfigError> {
    let value = match default {
        Some(default) => get_env_or_default(key, default),
        None => get_required_env(key)?,
    };
    validate_url(key, &value)
}

fn validate_url(key: &str, value: &str) -> Result<String, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be an http(s) URL".to_string(),
        ));
    }
    Ok(value.trim_end_matches('/').to_string())
}

/// Read a Sentry sample rate and check it lies in `0.0..=1.0`.
fn get_sample_rate(key: &str, default: &str) -> Result<f32, ConfigError> {
    let rate = parse_env_or_default::<f32>(key, default)?;
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ))
    }
}
