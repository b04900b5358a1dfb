//! Request log service configuration.
//!
//! Configuration is loaded from environment variables. A variable that is
//! unset or empty falls back to its default. The database password has no
//! default and is redacted in Debug output.

use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default database host (in-cluster PostgreSQL service).
pub const DEFAULT_DB_HOST: &str = "api-gateway-postgres.default.svc.cluster.local";

/// Default database port.
pub const DEFAULT_DB_PORT: u16 = 5432;

/// Default database user.
pub const DEFAULT_DB_USER: &str = "api_gateway_app";

/// Default database name.
pub const DEFAULT_DB_NAME: &str = "api_gateway_db";

/// Default PostgreSQL SSL mode.
pub const DEFAULT_DB_SSLMODE: &str = "disable";

/// Default HTTP listening port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default deployment environment label.
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Default host identifier label.
pub const DEFAULT_HOSTNAME: &str = "unknown";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines (default).
    Text,
    /// One JSON object per event.
    Json,
}

/// Request log service configuration.
#[derive(Clone)]
pub struct Config {
    /// PostgreSQL host.
    pub db_host: String,

    /// PostgreSQL port.
    pub db_port: u16,

    /// PostgreSQL user.
    pub db_user: String,

    /// PostgreSQL password. Required.
    pub db_password: SecretString,

    /// PostgreSQL database name.
    pub db_name: String,

    /// PostgreSQL SSL mode.
    pub db_ssl_mode: PgSslMode,

    /// HTTP listening port.
    pub port: u16,

    /// Deployment environment label (e.g. "production").
    pub environment: String,

    /// Host identifier label, usually the pod name.
    pub hostname: String,

    /// Log output format.
    pub log_format: LogFormat,
}

/// Custom Debug implementation that redacts the database password.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("db_host", &self.db_host)
            .field("db_port", &self.db_port)
            .field("db_user", &self.db_user)
            .field("db_password", &"[REDACTED]")
            .field("db_name", &self.db_name)
            .field("db_ssl_mode", &self.db_ssl_mode)
            .field("port", &self.port)
            .field("environment", &self.environment)
            .field("hostname", &self.hostname)
            .field("log_format", &self.log_format)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    MissingEnvVar(String),

    #[error("Invalid port configuration: {0}")]
    InvalidPort(String),

    #[error("Invalid SSL mode configuration: {0}")]
    InvalidSslMode(String),

    #[error("Invalid log format configuration: {0}")]
    InvalidLogFormat(String),
}

/// Returns the value of `key` if present and non-empty.
fn non_empty<'a>(vars: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    vars.get(key).map(String::as_str).filter(|v| !v.is_empty())
}

fn string_or(vars: &HashMap<String, String>, key: &str, default: &str) -> String {
    non_empty(vars, key).unwrap_or(default).to_string()
}

fn port_or(vars: &HashMap<String, String>, key: &str, default: u16) -> Result<u16, ConfigError> {
    match non_empty(vars, key) {
        Some(value) => value.parse().map_err(|e| {
            ConfigError::InvalidPort(format!(
                "{} must be a valid port number, got '{}': {}",
                key, value, e
            ))
        }),
        None => Ok(default),
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let db_password = non_empty(vars, "DB_PASSWORD")
            .map(|p| SecretString::from(p.to_string()))
            .ok_or_else(|| ConfigError::MissingEnvVar("DB_PASSWORD".to_string()))?;

        let db_port = port_or(vars, "DB_PORT", DEFAULT_DB_PORT)?;
        let port = port_or(vars, "PORT", DEFAULT_PORT)?;

        let ssl_mode_str = string_or(vars, "DB_SSLMODE", DEFAULT_DB_SSLMODE);
        let db_ssl_mode = PgSslMode::from_str(&ssl_mode_str).map_err(|_| {
            ConfigError::InvalidSslMode(format!(
                "DB_SSLMODE must be one of disable, allow, prefer, require, verify-ca, verify-full, got '{}'",
                ssl_mode_str
            ))
        })?;

        let log_format = match non_empty(vars, "LOG_FORMAT") {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidLogFormat(format!(
                    "LOG_FORMAT must be 'text' or 'json', got '{}'",
                    other
                )))
            }
        };

        Ok(Config {
            db_host: string_or(vars, "DB_HOST", DEFAULT_DB_HOST),
            db_port,
            db_user: string_or(vars, "DB_USER", DEFAULT_DB_USER),
            db_password,
            db_name: string_or(vars, "DB_NAME", DEFAULT_DB_NAME),
            db_ssl_mode,
            port,
            environment: string_or(vars, "ENVIRONMENT", DEFAULT_ENVIRONMENT),
            hostname: string_or(vars, "HOSTNAME", DEFAULT_HOSTNAME),
            log_format,
        })
    }

    /// Connection descriptor for the PostgreSQL pool.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .username(&self.db_user)
            .password(self.db_password.expose_secret())
            .database(&self.db_name)
            .ssl_mode(self.db_ssl_mode)
            .application_name("reqlog-service")
    }

    /// Address the HTTP server binds to.
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
