//! Error types for the static export

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can end an export run.
///
/// Connection failures are retried by the connector before they surface here
/// as [`ExportError::ConnectionExhausted`]; every other variant is fatal on
/// first occurrence.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Invalid configuration for {field}: {reason}")]
    Config { field: String, reason: String },

    #[error("Database failed to become ready after {attempts} attempts: {last_error}")]
    ConnectionExhausted { attempts: u32, last_error: String },

    #[error("Query {query} failed: {reason}")]
    Query { query: String, reason: String },

    #[error("Failed to decode {record} row: {reason}")]
    Decode { record: String, reason: String },

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Telemetry setup failed: {reason}")]
    Telemetry { reason: String },
}

impl ExportError {
    pub fn config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Config {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn query(query: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Query {
            query: query.into(),
            reason: reason.into(),
        }
    }

    pub fn decode(record: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decode {
            record: record.into(),
            reason: reason.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit status for this error. Every failure exits with 1.
    pub fn exit_code(&self) -> u8 {
        1
    }
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExportError::ConnectionExhausted {
            attempts: 60,
            last_error: "connection refused".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("60 attempts"));
        assert!(display.contains("connection refused"));

        let err = ExportError::config("DB_PORT", "not a port number: abc");
        assert!(err.to_string().contains("DB_PORT"));
    }

    #[test]
    fn test_io_error_keeps_path() {
        let err = ExportError::io(
            "/output/modes.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/output/modes.json"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_every_error_exits_nonzero() {
        let errors = [
            ExportError::config("OUTPUT_DIR", "empty"),
            ExportError::query("modes", "relation \"mode\" does not exist"),
            ExportError::decode("Mode", "missing field `name`"),
            ExportError::Telemetry {
                reason: "already initialized".to_string(),
            },
        ];
        for err in errors {
            assert_eq!(err.exit_code(), 1);
        }
    }
}
