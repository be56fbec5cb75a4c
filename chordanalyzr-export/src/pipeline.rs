//! Export pipeline
//!
//! connect → modes → chords → scales → index, once, in that order. A failure
//! at any step ends the run; files written before it stay on disk.

use chordanalyzr_core::{
    chords_file_name, scales_file_name, ExportResult, StaticIndex, INDEX_FILE, MODES_FILE,
};
use chrono::{DateTime, Utc};

use crate::config::ExportConfig;
use crate::db::connect_with_retry;
use crate::fetch::{fetch_chords_by_mode, fetch_modes, fetch_scale_notes_by_mode};
use crate::source::CatalogSource;
use crate::writer::OutputDir;

/// What a finished run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub modes: usize,
    pub chord_files: usize,
    pub scale_files: usize,
    /// Includes `modes.json` and `index.json`.
    pub files_written: usize,
}

/// Fetch everything from `source` and write the file set into `output`.
///
/// `clock` supplies the `generatedAt` stamp; it is read once, after the
/// per-mode files are written.
pub async fn export_catalog<S, C>(
    source: &S,
    output: &OutputDir,
    clock: C,
) -> ExportResult<ExportSummary>
where
    S: CatalogSource + ?Sized,
    C: FnOnce() -> DateTime<Utc>,
{
    let mut summary = ExportSummary::default();

    let modes = fetch_modes(source).await?;
    output.write_json(MODES_FILE, &modes)?;
    summary.modes = modes.len();
    summary.files_written += 1;

    let chords_by_mode = fetch_chords_by_mode(source).await?;
    for (mode_id, chords) in chords_by_mode.iter() {
        output.write_json(&chords_file_name(mode_id), chords)?;
        summary.chord_files += 1;
        summary.files_written += 1;
    }

    let scales_by_mode = fetch_scale_notes_by_mode(source).await?;
    for (mode_id, scales) in scales_by_mode.iter() {
        output.write_json(&scales_file_name(mode_id), scales)?;
        summary.scale_files += 1;
        summary.files_written += 1;
    }

    let index = StaticIndex::new(
        clock(),
        modes,
        chords_by_mode.keys(),
        scales_by_mode.keys(),
    );
    output.write_json(INDEX_FILE, &index)?;
    summary.files_written += 1;

    Ok(summary)
}

/// Full run against the configured database.
///
/// The session is closed whether the export succeeds or not.
pub async fn run(config: &ExportConfig) -> ExportResult<ExportSummary> {
    let output = OutputDir::new(&config.output_dir);
    output.ensure()?;

    let session = connect_with_retry(&config.db).await?;
    let result = export_catalog(&session, &output, Utc::now).await;
    session.close().await;

    if let Ok(summary) = &result {
        tracing::info!(
            modes = summary.modes,
            chord_files = summary.chord_files,
            scale_files = summary.scale_files,
            files_written = summary.files_written,
            "Static data generation completed successfully!"
        );
    }
    result
}
