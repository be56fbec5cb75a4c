//! Catalog source trait
//!
//! The three read-only catalog queries behind one seam, so the pipeline runs
//! the same against PostgreSQL ([`crate::db::DbSession`]) and in-memory
//! fixtures.

use async_trait::async_trait;
use chordanalyzr_core::{ChordRelation, ExportResult, Mode, ScaleNoteRow};

#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// All modes, ordered by id.
    async fn modes(&self) -> ExportResult<Vec<Mode>>;

    /// Exact-match chords in allowed keys, ordered by mode, key note, chord
    /// root.
    async fn chord_relations(&self) -> ExportResult<Vec<ChordRelation>>;

    /// Scale tones in allowed keys, ordered by mode, key name, ordinal.
    async fn scale_notes(&self) -> ExportResult<Vec<ScaleNoteRow>>;
}
