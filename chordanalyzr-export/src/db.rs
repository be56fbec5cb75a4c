//! Database Connection Module
//!
//! Opens the single PostgreSQL connection the export runs on, retrying at a
//! fixed interval until the database accepts it or the retry budget runs
//! out. The connection lives inside a [`DbSession`], which releases it on
//! every exit path.

use std::fmt::Display;
use std::future::Future;

use async_trait::async_trait;
use chordanalyzr_core::{
    CatalogRecord, ChordRelation, ExportError, ExportResult, Mode, ScaleNoteRow,
};
use serde_json::{Map, Value};
use tokio::task::JoinHandle;
use tokio_postgres::{Client, NoTls};

use crate::config::{DbConfig, RetryPolicy};
use crate::constants::{CHORDS_QUERY, MODES_QUERY, SCALE_NOTES_QUERY};
use crate::decode::{row_to_map, text_cast_query};
use crate::source::CatalogSource;

// ============================================================================
// RETRY LOOP
// ============================================================================

/// Run `attempt` until it succeeds or `policy.max_attempts` is used up.
///
/// Every failure is treated as retryable. The pause between attempts is
/// fixed; there is no pause after the final attempt.
pub async fn retry_fixed<T, E, F, Fut>(policy: &RetryPolicy, mut attempt: F) -> ExportResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut number = 1;
    loop {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(e) if number < max_attempts => {
                tracing::info!(
                    attempt = number,
                    max_attempts,
                    error = %e,
                    "Database not ready, retrying in {} second(s)... (attempt {}/{})",
                    policy.interval.as_secs_f64(),
                    number,
                    max_attempts
                );
                tokio::time::sleep(policy.interval).await;
                number += 1;
            }
            Err(e) => {
                tracing::error!(
                    attempts = max_attempts,
                    error = %e,
                    "Database failed to become ready within timeout period"
                );
                return Err(ExportError::ConnectionExhausted {
                    attempts: max_attempts,
                    last_error: e.to_string(),
                });
            }
        }
    }
}

/// Wait for the database and open the export session.
pub async fn connect_with_retry(config: &DbConfig) -> ExportResult<DbSession> {
    tracing::info!(
        host = %config.host,
        port = config.port,
        dbname = %config.dbname,
        "Waiting for database to be ready..."
    );
    let session = retry_fixed(&config.retry, || DbSession::open(config)).await?;
    tracing::info!("Database is ready!");
    Ok(session)
}

// ============================================================================
// SESSION
// ============================================================================

/// A live connection: the query client plus the task driving its socket.
///
/// Call [`close`](Self::close) when done. If the session is dropped instead
/// (error or panic unwinding), the driver task is aborted, which closes the
/// socket.
pub struct DbSession {
    client: Option<Client>,
    driver: Option<JoinHandle<()>>,
}

impl DbSession {
    /// Single connection attempt, no retry.
    pub async fn open(config: &DbConfig) -> Result<Self, tokio_postgres::Error> {
        let (client, connection) = config.pg_config().connect(NoTls).await?;
        let driver = tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %e, "Database connection error");
            }
        });
        Ok(Self {
            client: Some(client),
            driver: Some(driver),
        })
    }

    fn client(&self) -> ExportResult<&Client> {
        self.client
            .as_ref()
            .ok_or_else(|| ExportError::query("session", "connection already closed"))
    }

    /// Close the connection and wait for the driver task to finish.
    pub async fn close(mut self) {
        // Dropping the client tells the driver to terminate the connection.
        drop(self.client.take());
        if let Some(driver) = self.driver.take() {
            if let Err(e) = driver.await {
                tracing::warn!(error = %e, "Database driver task did not shut down cleanly");
            }
        }
        tracing::debug!("Database session closed");
    }

    /// Run a parameterless read query and return each row as a JSON object
    /// keyed by column name.
    pub async fn query_json(&self, label: &str, sql: &str) -> ExportResult<Vec<Map<String, Value>>> {
        self.query_maps(label, label, sql).await
    }

    /// Run a parameterless read query and decode every row into `T`.
    async fn query_records<T: CatalogRecord>(&self, label: &str, sql: &str) -> ExportResult<Vec<T>> {
        self.query_maps(label, T::RECORD_NAME, sql)
            .await?
            .into_iter()
            .map(|map| {
                serde_json::from_value::<T>(Value::Object(map))
                    .map_err(|e| ExportError::decode(T::RECORD_NAME, e.to_string()))
            })
            .collect()
    }

    async fn query_maps(
        &self,
        label: &str,
        record: &str,
        sql: &str,
    ) -> ExportResult<Vec<Map<String, Value>>> {
        let client = self.client()?;
        let statement = client
            .prepare(sql)
            .await
            .map_err(|e| query_error(label, e))?;

        let columns = statement.columns().iter().map(|c| (c.name(), c.type_()));
        let rows = match text_cast_query(sql, columns) {
            Some(cast_sql) => {
                tracing::debug!(query = label, "Reading columns without a JSON mapping as text");
                client.query(cast_sql.as_str(), &[]).await
            }
            None => client.query(&statement, &[]).await,
        }
        .map_err(|e| query_error(label, e))?;

        rows.iter().map(|row| row_to_map(row, record)).collect()
    }
}

impl Drop for DbSession {
    fn drop(&mut self) {
        if let Some(driver) = self.driver.take() {
            driver.abort();
        }
    }
}

/// Log a driver error in full and wrap it for the caller.
fn query_error(label: &str, err: tokio_postgres::Error) -> ExportError {
    tracing::error!(query = label, "Database error: {:?}", err);
    let reason = match err.as_db_error() {
        Some(db) => format!("{}: {}", db.code().code(), db.message()),
        None => err.to_string(),
    };
    ExportError::query(label, reason)
}

#[async_trait]
impl CatalogSource for DbSession {
    async fn modes(&self) -> ExportResult<Vec<Mode>> {
        self.query_records("modes", MODES_QUERY).await
    }

    async fn chord_relations(&self) -> ExportResult<Vec<ChordRelation>> {
        self.query_records("chords_by_mode", &CHORDS_QUERY).await
    }

    async fn scale_notes(&self) -> ExportResult<Vec<ScaleNoteRow>> {
        self.query_records("scale_notes_by_mode", &SCALE_NOTES_QUERY)
            .await
    }
}
