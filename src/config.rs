//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::idempotency::IdempotencyConfig;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// Request-level deadline
    pub request_timeout: Duration,

    /// Expiry for completed idempotency records (unbounded when unset)
    pub idempotency_ttl: Option<Duration>,

    /// Bound on waiting for an in-flight idempotency key (unbounded when unset)
    pub idempotency_wait_timeout: Option<Duration>,

    /// How often expired idempotency records are purged
    pub idempotency_sweep_interval: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_path = env::var("DATABASE_PATH")
            .unwrap_or_else(|_| "./data/banking.db".to_string())
            .into();

        let database_max_connections = parse_or("DATABASE_MAX_CONNECTIONS", 1u32)?;
        if database_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS"));
        }

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parse_or("PORT", 8080u16)?;
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let request_timeout = Duration::from_secs(parse_or("REQUEST_TIMEOUT_SECS", 60u64)?);
        let idempotency_ttl =
            parse_optional::<u64>("IDEMPOTENCY_TTL_SECS")?.map(Duration::from_secs);
        let idempotency_wait_timeout =
            parse_optional::<u64>("IDEMPOTENCY_WAIT_TIMEOUT_SECS")?.map(Duration::from_secs);
        let idempotency_sweep_interval =
            Duration::from_secs(parse_or("IDEMPOTENCY_SWEEP_INTERVAL_SECS", 60u64)?);

        if idempotency_sweep_interval.is_zero() {
            return Err(ConfigError::InvalidValue("IDEMPOTENCY_SWEEP_INTERVAL_SECS"));
        }

        Ok(Self {
            database_path,
            database_max_connections,
            host,
            port,
            environment,
            request_timeout,
            idempotency_ttl,
            idempotency_wait_timeout,
            idempotency_sweep_interval,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Idempotency coordinator settings
    pub fn idempotency(&self) -> IdempotencyConfig {
        IdempotencyConfig {
            ttl: self.idempotency_ttl,
            wait_timeout: self.idempotency_wait_timeout,
        }
    }
}

fn parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    Ok(parse_optional(name)?.unwrap_or(default))
}

fn parse_optional<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(name)),
        Err(_) => Ok(None),
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable name; the process environment is shared.

    #[test]
    fn test_parse_or_default_when_unset() {
        let value: u16 = parse_or("SIMPLE_BANKING_TEST_UNSET_PORT", 8080).unwrap();
        assert_eq!(value, 8080);
    }

    #[test]
    fn test_parse_optional_rejects_garbage() {
        env::set_var("SIMPLE_BANKING_TEST_BAD_TTL", "soon");
        let result = parse_optional::<u64>("SIMPLE_BANKING_TEST_BAD_TTL");
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_parse_optional_blank_is_unset() {
        env::set_var("SIMPLE_BANKING_TEST_BLANK_TTL", "  ");
        let result = parse_optional::<u64>("SIMPLE_BANKING_TEST_BLANK_TTL").unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn test_parse_optional_value() {
        env::set_var("SIMPLE_BANKING_TEST_TTL", "300");
        let result = parse_optional::<u64>("SIMPLE_BANKING_TEST_TTL").unwrap();
        assert_eq!(result, Some(300));
    }
}
