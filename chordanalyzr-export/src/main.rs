//! Static data generator entry point
//!
//! Reads configuration from the environment, exports the catalog and exits
//! 0 on success, 1 on any failure.

use std::process::ExitCode;

use chordanalyzr_export::telemetry::{init_tracing, TelemetryConfig};
use chordanalyzr_export::{run, ExportConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    if let Err(e) = init_tracing(&TelemetryConfig::from_env()) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::from(e.exit_code());
    }

    tracing::info!("Starting static data generation...");

    let result = match ExportConfig::from_env() {
        Ok(config) => run(&config).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Error generating static data: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
