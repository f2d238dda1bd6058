//! Configuration handling for the relay.
//!
//! Everything comes from environment variables with development defaults.
//! `Config::from_env` parses and validates them; the `*_config` helpers
//! turn the flat settings into the per-component config structs.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

use crate::extractor::DEFAULT_MAX_CONTENT_LENGTH;
use crate::fetcher::FetchConfig;
use crate::relay::{MAX_RESULTS_CAP, RelayConfig};
use crate::resolver::{DEFAULT_HOP_BUDGET, ResolveConfig};
use crate::search::brave::BRAVE_API_URL;
use crate::telemetry::LogFormat;

pub const ENV_BIND_ADDR: &str = "RELAY_BIND_ADDR";
pub const ENV_BRAVE_API_KEY: &str = "BRAVE_API_KEY";
pub const ENV_SEARCH_ENDPOINT: &str = "RELAY_SEARCH_ENDPOINT";
pub const ENV_HOP_BUDGET: &str = "RELAY_HOP_BUDGET";
pub const ENV_MAX_CONTENT_LENGTH: &str = "RELAY_MAX_CONTENT_LENGTH";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "RELAY_FETCH_TIMEOUT_SECS";
pub const ENV_MAX_BODY_BYTES: &str = "RELAY_MAX_BODY_BYTES";
pub const ENV_MAX_PROTOCOL_REDIRECTS: &str = "RELAY_MAX_PROTOCOL_REDIRECTS";
pub const ENV_MAX_RESULTS: &str = "RELAY_MAX_RESULTS";
pub const ENV_RESOLUTION_DEADLINE_SECS: &str = "RELAY_RESOLUTION_DEADLINE_SECS";
pub const ENV_ALLOW_PRIVATE_HOSTS: &str = "RELAY_ALLOW_PRIVATE_HOSTS";
pub const ENV_LOG_FORMAT: &str = "RELAY_LOG_FORMAT";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 8;
const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;
const DEFAULT_MAX_PROTOCOL_REDIRECTS: usize = 10;
const DEFAULT_MAX_RESULTS: usize = 5;

const MIN_CONTENT_LENGTH: usize = 100;
const MIN_BODY_BYTES: usize = 1024;

/// Application runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    bind_addr: String,
    brave_api_key: String,
    search_endpoint: String,
    hop_budget: u32,
    max_content_length: usize,
    fetch_timeout: Duration,
    max_body_bytes: usize,
    max_protocol_redirects: usize,
    max_results: usize,
    resolution_deadline: Option<Duration>,
    allow_private_hosts: bool,
    log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            brave_api_key: String::new(),
            search_endpoint: BRAVE_API_URL.to_string(),
            hop_budget: DEFAULT_HOP_BUDGET,
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            max_protocol_redirects: DEFAULT_MAX_PROTOCOL_REDIRECTS,
            max_results: DEFAULT_MAX_RESULTS,
            resolution_deadline: None,
            allow_private_hosts: false,
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Load from environment variables, falling back to development defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let fetch_timeout_secs: u64 =
            parse_var(ENV_FETCH_TIMEOUT_SECS, "fetch_timeout_secs", DEFAULT_FETCH_TIMEOUT_SECS)?;
        let deadline_secs: u64 = parse_var(ENV_RESOLUTION_DEADLINE_SECS, "resolution_deadline_secs", 0)?;

        let config = Self {
            bind_addr: env::var(ENV_BIND_ADDR).unwrap_or(defaults.bind_addr),
            brave_api_key: env::var(ENV_BRAVE_API_KEY).unwrap_or_default(),
            search_endpoint: env::var(ENV_SEARCH_ENDPOINT).unwrap_or(defaults.search_endpoint),
            hop_budget: parse_var(ENV_HOP_BUDGET, "hop_budget", defaults.hop_budget)?,
            max_content_length: parse_var(
                ENV_MAX_CONTENT_LENGTH,
                "max_content_length",
                defaults.max_content_length,
            )?,
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
            max_body_bytes: parse_var(ENV_MAX_BODY_BYTES, "max_body_bytes", defaults.max_body_bytes)?,
            max_protocol_redirects: parse_var(
                ENV_MAX_PROTOCOL_REDIRECTS,
                "max_protocol_redirects",
                defaults.max_protocol_redirects,
            )?,
            max_results: parse_var(ENV_MAX_RESULTS, "max_results", defaults.max_results)?
                .clamp(1, MAX_RESULTS_CAP),
            resolution_deadline: (deadline_secs > 0).then(|| Duration::from_secs(deadline_secs)),
            allow_private_hosts: parse_bool(ENV_ALLOW_PRIVATE_HOSTS, "allow_private_hosts")?,
            log_format: parse_var(ENV_LOG_FORMAT, "log_format", defaults.log_format)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hop_budget < 1 {
            return Err(ConfigError::invalid("hop_budget", "must be at least 1"));
        }
        if self.max_content_length < MIN_CONTENT_LENGTH {
            return Err(ConfigError::invalid(
                "max_content_length",
                format!("must be at least {MIN_CONTENT_LENGTH}"),
            ));
        }
        if self.fetch_timeout < Duration::from_secs(1) {
            return Err(ConfigError::invalid("fetch_timeout_secs", "must be at least 1"));
        }
        if self.max_body_bytes < MIN_BODY_BYTES {
            return Err(ConfigError::invalid(
                "max_body_bytes",
                format!("must be at least {MIN_BODY_BYTES}"),
            ));
        }
        Ok(())
    }

    /// TCP bind address (host:port) for the HTTP server.
    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }
    pub fn brave_api_key(&self) -> &str {
        &self.brave_api_key
    }
    pub fn search_endpoint(&self) -> &str {
        &self.search_endpoint
    }
    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            timeout: self.fetch_timeout,
            max_body_bytes: self.max_body_bytes,
            max_redirects: self.max_protocol_redirects,
            allow_private_hosts: self.allow_private_hosts,
            ..FetchConfig::default()
        }
    }

    pub fn resolve_config(&self) -> ResolveConfig {
        ResolveConfig {
            hop_budget: self.hop_budget,
            max_content_length: self.max_content_length,
        }
    }

    pub fn relay_config(&self) -> RelayConfig {
        RelayConfig {
            max_results: self.max_results,
            deadline: self.resolution_deadline,
        }
    }
}

fn parse_var<T: FromStr>(key: &str, field: &'static str, default: T) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::invalid(field, format!("{raw:?}: {e}"))),
        _ => Ok(default),
    }
}

fn parse_bool(key: &str, field: &'static str) -> Result<bool, ConfigError> {
    let Ok(raw) = env::var(key) else {
        return Ok(false);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        other => Err(ConfigError::invalid(field, format!("{other:?} is not a boolean"))),
    }
}

/// Errors that can occur while building a configuration.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}
