//! ChordAnalyzr Core - Catalog Records and Export Shapes
//!
//! Pure data layer for the static export: the record type of each catalog
//! query, the key-name exclusion rule, the snake_case → camelCase transform,
//! grouping into per-mode mappings, and the `index.json` manifest.
//! No database or filesystem access lives here.

pub mod case;
pub mod entities;
pub mod error;
pub mod grouping;
pub mod key_name;
pub mod manifest;

pub use case::{snake_to_camel, to_camel_case_keys};
pub use entities::{CatalogRecord, ChordRelation, Mode, ModeId, ScaleNoteRow, ScaleStep};
pub use error::{ExportError, ExportResult};
pub use grouping::{
    group_chords_by_mode, group_scale_notes_by_mode, modes_to_json, ChordsByMode, Grouped,
    ScalesByMode,
};
pub use key_name::{is_excluded_key_name, KeyNameRule};
pub use manifest::{
    chords_file_name, scales_file_name, AvailableFiles, StaticIndex, INDEX_FILE, MODES_FILE,
};
