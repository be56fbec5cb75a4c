//! ChordAnalyzr Export - Static JSON Data Generator
//!
//! Reads the mode, chord and scale catalog from PostgreSQL and writes it as
//! static JSON files the frontend can load without an API:
//!
//! - `modes.json`
//! - `chords-mode-{id}.json`, one per mode with matching chords
//! - `scales-mode-{id}.json`, one per mode with scale notes
//! - `index.json`, the generation stamp and file manifest

pub mod config;
pub mod constants;
pub mod db;
pub mod decode;
pub mod fetch;
pub mod pipeline;
pub mod source;
pub mod telemetry;
pub mod writer;

pub use config::{DbConfig, ExportConfig, RetryPolicy};
pub use db::{connect_with_retry, retry_fixed, DbSession};
pub use fetch::{fetch_chords_by_mode, fetch_modes, fetch_scale_notes_by_mode};
pub use pipeline::{export_catalog, run, ExportSummary};
pub use source::CatalogSource;
pub use writer::{save_json_file, OutputDir};
