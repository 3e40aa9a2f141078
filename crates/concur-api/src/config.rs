//! # Service Configuration
//!
//! Read once at startup from environment variables. Every variable has a
//! default so the service starts with no configuration at all, backed by
//! the in-memory store.

use std::path::PathBuf;

use thiserror::Error;

/// Error loading configuration from the environment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set but could not be parsed.
    #[error("invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Service configuration.
///
/// Custom `Debug` redacts the database URL, which usually embeds a password.
#[derive(Clone)]
pub struct AppConfig {
    pub port: u16,
    /// PostgreSQL URL. `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub database_name: String,
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub log_level: String,
    pub log_format: LogFormat,
    /// Directory holding `{org_id}_applications.yaml` manifests.
    pub manifest_dir: PathBuf,
    pub db_connect_retries: u32,
    /// Reject consent scope entries naming undeclared data elements.
    pub consent_scope_validation: bool,
    /// Requests per client per minute; 0 disables rate limiting.
    pub rate_limit_per_minute: u64,
    /// Allowed CORS origins; `*` allows any.
    pub cors_allow_origins: Vec<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("database_url", &self.database_url.as_ref().map(|_| "[REDACTED]"))
            .field("database_name", &self.database_name)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .field("manifest_dir", &self.manifest_dir)
            .field("db_connect_retries", &self.db_connect_retries)
            .field("consent_scope_validation", &self.consent_scope_validation)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("cors_allow_origins", &self.cors_allow_origins)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            database_url: None,
            database_name: "Concur".to_string(),
            log_level: "debug".to_string(),
            log_format: LogFormat::Text,
            manifest_dir: PathBuf::from("."),
            db_connect_retries: 5,
            consent_scope_validation: true,
            rate_limit_per_minute: 0,
            cors_allow_origins: vec!["*".to_string()],
        }
    }
}

impl AppConfig {
    /// Load configuration from process environment variables.
    ///
    /// Variables:
    /// - `PORT` (default: 8080)
    /// - `DATABASE_URL` (default: unset, in-memory store)
    /// - `DATABASE_NAME` (default: `Concur`)
    /// - `LOG_LEVEL` (default: `debug`)
    /// - `LOG_FORMAT` (`text` or `json`, default: `text`)
    /// - `MANIFEST_DIR` (default: `.`)
    /// - `DB_CONNECT_RETRIES` (default: 5)
    /// - `CONSENT_SCOPE_VALIDATION` (default: true)
    /// - `RATE_LIMIT_PER_MINUTE` (default: 0, disabled)
    /// - `CORS_ALLOW_ORIGINS` (comma separated, default: `*`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary lookup function.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let log_format = match get("LOG_FORMAT").as_deref().map(str::to_ascii_lowercase) {
            None => defaults.log_format,
            Some(f) if f == "text" => LogFormat::Text,
            Some(f) if f == "json" => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "LOG_FORMAT",
                    value: other,
                    reason: "expected `text` or `json`".into(),
                })
            }
        };

        Ok(Self {
            port: parse_var(&get, "PORT", defaults.port)?,
            database_url: get("DATABASE_URL"),
            database_name: get("DATABASE_NAME").unwrap_or(defaults.database_name),
            log_level: get("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_format,
            manifest_dir: get("MANIFEST_DIR").map(PathBuf::from).unwrap_or(defaults.manifest_dir),
            db_connect_retries: parse_var(&get, "DB_CONNECT_RETRIES", defaults.db_connect_retries)?,
            consent_scope_validation: parse_var(
                &get,
                "CONSENT_SCOPE_VALIDATION",
                defaults.consent_scope_validation,
            )?,
            rate_limit_per_minute: parse_var(
                &get,
                "RATE_LIMIT_PER_MINUTE",
                defaults.rate_limit_per_minute,
            )?,
            cors_allow_origins: get("CORS_ALLOW_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or(defaults.cors_allow_origins),
        })
    }
}

fn parse_var<T>(
    get: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match get(var) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
            value,
        }),
    }
}
