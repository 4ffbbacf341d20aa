//! Application configuration loaded from environment variables.
//!
//! Fail-fast: required variables must be present and valid or the
//! application exits with a clear message before binding anything.

use std::env;
use std::net::SocketAddr;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {message}")]
    Invalid {
        name: &'static str,
        message: String,
    },
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// Shared secret the scheduled trigger authenticates with.
    pub cron_secret: String,
    /// Fallback webhook secret for stores without their own.
    pub shopify_webhook_secret: Option<String>,
    /// Default tracing filter when RUST_LOG is unset.
    pub log_filter: String,
    /// Apply pending migrations at startup.
    pub run_migrations: bool,
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

impl Config {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = parse_bind_addr(optional("BIND_ADDR").as_deref())?;

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            bind_addr,
            cron_secret: required("CRON_SECRET")?,
            shopify_webhook_secret: optional("SHOPIFY_WEBHOOK_SECRET"),
            log_filter: optional("LOG_FILTER").unwrap_or_else(|| "info".to_string()),
            run_migrations: optional("RUN_MIGRATIONS")
                .map(|v| v != "false")
                .unwrap_or(true),
        })
    }
}

/// Parse the bind address, defaulting to all interfaces on 8080.
fn parse_bind_addr(value: Option<&str>) -> Result<SocketAddr, ConfigError> {
    let value = value.unwrap_or("0.0.0.0:8080");
    value.parse().map_err(|e| ConfigError::Invalid {
        name: "BIND_ADDR",
        message: format!("{e}: {value}"),
    })
}
