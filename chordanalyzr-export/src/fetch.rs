//! Fetchers: query a catalog source and reshape the rows for output

use chordanalyzr_core::{
    group_chords_by_mode, group_scale_notes_by_mode, modes_to_json, ChordsByMode, ExportResult,
    KeyNameRule, ScalesByMode,
};
use serde_json::Value;

use crate::source::CatalogSource;

/// All modes, camelCased.
pub async fn fetch_modes<S>(source: &S) -> ExportResult<Vec<Value>>
where
    S: CatalogSource + ?Sized,
{
    tracing::info!("Fetching modes...");
    let modes = source.modes().await?;
    tracing::info!(count = modes.len(), "Found {} modes", modes.len());
    modes_to_json(&modes)
}

/// Chord rows grouped by mode id.
pub async fn fetch_chords_by_mode<S>(source: &S) -> ExportResult<ChordsByMode>
where
    S: CatalogSource + ?Sized,
{
    tracing::info!("Fetching chords by mode...");
    let rows = source.chord_relations().await?;
    let grouped = group_chords_by_mode(&rows, &KeyNameRule)?;
    tracing::info!(
        rows = rows.len(),
        modes = grouped.len(),
        "Found chords for {} modes",
        grouped.len()
    );
    Ok(grouped)
}

/// Scale steps grouped by mode id, then key name.
pub async fn fetch_scale_notes_by_mode<S>(source: &S) -> ExportResult<ScalesByMode>
where
    S: CatalogSource + ?Sized,
{
    tracing::info!("Fetching scale notes by mode...");
    let rows = source.scale_notes().await?;
    let grouped = group_scale_notes_by_mode(&rows, &KeyNameRule);
    tracing::info!(
        rows = rows.len(),
        modes = grouped.len(),
        "Found scale notes for {} modes",
        grouped.len()
    );
    Ok(grouped)
}
