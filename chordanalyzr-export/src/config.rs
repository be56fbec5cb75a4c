//! Export Configuration Module
//!
//! All settings come from environment variables with defaults that match the
//! docker-compose setup the exporter runs in. Nothing is read from the
//! environment after [`ExportConfig::from_env`] returns.

use std::path::PathBuf;
use std::time::Duration;

use chordanalyzr_core::{ExportError, ExportResult};

use crate::constants::{
    DEFAULT_CONNECT_INTERVAL_SECS, DEFAULT_CONNECT_MAX_RETRIES, DEFAULT_DB_HOST, DEFAULT_DB_NAME,
    DEFAULT_DB_PASSWORD, DEFAULT_DB_PORT, DEFAULT_DB_USER, DEFAULT_OUTPUT_DIR,
};

// ============================================================================
// RETRY POLICY
// ============================================================================

/// Fixed-interval retry budget for connection establishment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total connection attempts, including the first one.
    pub max_attempts: u32,
    /// Pause between two attempts.
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_CONNECT_MAX_RETRIES,
            interval: Duration::from_secs(DEFAULT_CONNECT_INTERVAL_SECS),
        }
    }
}

// ============================================================================
// DATABASE CONFIGURATION
// ============================================================================

/// PostgreSQL connection parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    /// PostgreSQL host
    pub host: String,
    /// PostgreSQL port
    pub port: u16,
    /// Database name
    pub dbname: String,
    /// Database user
    pub user: String,
    /// Database password
    pub password: String,
    /// Connection retry budget
    pub retry: RetryPolicy,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_DB_HOST.to_string(),
            port: DEFAULT_DB_PORT,
            dbname: DEFAULT_DB_NAME.to_string(),
            user: DEFAULT_DB_USER.to_string(),
            password: DEFAULT_DB_PASSWORD.to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

impl DbConfig {
    /// Driver configuration for a single connection attempt.
    pub fn pg_config(&self) -> tokio_postgres::Config {
        let mut cfg = tokio_postgres::Config::new();
        cfg.host(&self.host)
            .port(self.port)
            .dbname(&self.dbname)
            .user(&self.user)
            .password(&self.password)
            .application_name("chordanalyzr-export");
        cfg
    }
}

// ============================================================================
// EXPORT CONFIGURATION
// ============================================================================

/// Everything one export run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    pub db: DbConfig,
    /// Directory the JSON files are written to.
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            db: DbConfig::default(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl ExportConfig {
    /// Create the configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DB_HOST` (default: postgres)
    /// - `DB_PORT` (default: 5432)
    /// - `DB_NAME` (default: chordanalyzr)
    /// - `DB_USER` (default: postgres)
    /// - `DB_PASSWORD` (default: pass)
    /// - `OUTPUT_DIR` (default: /output)
    /// - `DB_CONNECT_MAX_RETRIES`: connection attempts before giving up (default: 60)
    /// - `DB_CONNECT_RETRY_INTERVAL_SECS`: pause between attempts (default: 1)
    pub fn from_env() -> ExportResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> ExportResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let port = parse_var(&lookup, "DB_PORT", DEFAULT_DB_PORT)?;
        let max_attempts = parse_var(&lookup, "DB_CONNECT_MAX_RETRIES", DEFAULT_CONNECT_MAX_RETRIES)?;
        if max_attempts == 0 {
            return Err(ExportError::config(
                "DB_CONNECT_MAX_RETRIES",
                "must allow at least one attempt",
            ));
        }
        let interval_secs = parse_var(
            &lookup,
            "DB_CONNECT_RETRY_INTERVAL_SECS",
            DEFAULT_CONNECT_INTERVAL_SECS,
        )?;

        Ok(Self {
            db: DbConfig {
                host: text("DB_HOST", DEFAULT_DB_HOST),
                port,
                dbname: text("DB_NAME", DEFAULT_DB_NAME),
                user: text("DB_USER", DEFAULT_DB_USER),
                password: text("DB_PASSWORD", DEFAULT_DB_PASSWORD),
                retry: RetryPolicy {
                    max_attempts,
                    interval: Duration::from_secs(interval_secs),
                },
            },
            output_dir: PathBuf::from(text("OUTPUT_DIR", DEFAULT_OUTPUT_DIR)),
        })
    }
}

fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> ExportResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ExportError::config(name, format!("{raw:?}: {e}"))),
        None => Ok(default),
    }
}
