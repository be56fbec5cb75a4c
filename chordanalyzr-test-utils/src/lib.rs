//! ChordAnalyzr Test Utilities
//!
//! Shared test infrastructure for the workspace:
//! - `MockCatalog`, an in-memory `CatalogSource`
//! - Fixtures for common catalog rows
//! - Proptest generators for rows and key names

pub use chordanalyzr_core::{
    ChordRelation, ExportError, ExportResult, Mode, ScaleNoteRow, StaticIndex,
};

use async_trait::async_trait;
use chordanalyzr_export::CatalogSource;
use proptest::prelude::*;
use serde_json::json;

// ============================================================================
// MOCK CATALOG
// ============================================================================

/// Which query a [`MockCatalog`] should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailingQuery {
    Modes,
    Chords,
    ScaleNotes,
}

/// In-memory catalog. Returns its rows verbatim, without the SQL filtering
/// or ordering the database applies.
#[derive(Debug, Clone, Default)]
pub struct MockCatalog {
    pub modes: Vec<Mode>,
    pub chords: Vec<ChordRelation>,
    pub scale_notes: Vec<ScaleNoteRow>,
    pub failing: Option<FailingQuery>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_modes(mut self, modes: Vec<Mode>) -> Self {
        self.modes = modes;
        self
    }

    pub fn with_chords(mut self, chords: Vec<ChordRelation>) -> Self {
        self.chords = chords;
        self
    }

    pub fn with_scale_notes(mut self, scale_notes: Vec<ScaleNoteRow>) -> Self {
        self.scale_notes = scale_notes;
        self
    }

    /// Make one query return an error.
    pub fn failing_on(mut self, query: FailingQuery) -> Self {
        self.failing = Some(query);
        self
    }

    fn check(&self, query: FailingQuery, label: &str) -> ExportResult<()> {
        if self.failing == Some(query) {
            return Err(ExportError::query(label, "simulated failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogSource for MockCatalog {
    async fn modes(&self) -> ExportResult<Vec<Mode>> {
        self.check(FailingQuery::Modes, "modes")?;
        Ok(self.modes.clone())
    }

    async fn chord_relations(&self) -> ExportResult<Vec<ChordRelation>> {
        self.check(FailingQuery::Chords, "chords_by_mode")?;
        Ok(self.chords.clone())
    }

    async fn scale_notes(&self) -> ExportResult<Vec<ScaleNoteRow>> {
        self.check(FailingQuery::ScaleNotes, "scale_notes_by_mode")?;
        Ok(self.scale_notes.clone())
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub fn mode(id: i64, name: &str) -> Mode {
    Mode {
        id,
        name: Some(name.to_string()),
    }
}

pub fn ionian() -> Mode {
    mode(1, "Ionian")
}

pub fn dorian() -> Mode {
    mode(2, "Dorian")
}

/// C major triad in C Ionian, with text note lists as the chord view
/// returns them.
pub fn c_major_chord() -> ChordRelation {
    ChordRelation {
        mode_id: 1,
        key_note: Some(0),
        key_name: "C".to_string(),
        chord_note: Some(0),
        chord_note_name: Some("C".to_string()),
        chord_name: Some("Major".to_string()),
        chord_notes: json!("0,4,7"),
        chord_note_names: json!("C,E,G"),
    }
}

/// A chord row for `mode_id` in `key_name`; override other columns with
/// struct update syntax.
pub fn chord(mode_id: i64, key_name: &str) -> ChordRelation {
    ChordRelation {
        mode_id,
        key_name: key_name.to_string(),
        ..c_major_chord()
    }
}

pub fn scale_note(mode_id: i64, key_name: &str, seq_note: i64, note_name: &str) -> ScaleNoteRow {
    ScaleNoteRow {
        mode_id,
        key_name: key_name.to_string(),
        seq_note: Some(seq_note),
        note_name: Some(note_name.to_string()),
    }
}

/// C Ionian: C D E F G A B.
pub fn c_ionian_scale() -> Vec<ScaleNoteRow> {
    ["C", "D", "E", "F", "G", "A", "B"]
        .iter()
        .enumerate()
        .map(|(i, name)| scale_note(1, "C", i as i64 + 1, name))
        .collect()
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

/// Key names, including the spellings the exporter must drop.
pub fn key_name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-G]",
        "[A-G][#b]",
        "[A-G](##|bb)",
        Just("B#".to_string()),
        Just("Cb".to_string()),
        Just("E#".to_string()),
        Just("Fb".to_string()),
    ]
}

pub fn chord_relation_strategy() -> impl Strategy<Value = ChordRelation> {
    (1i64..8, 0i64..12, key_name_strategy(), 0i64..12, "[A-G]#?", "(Major|Minor|Diminished|Augmented)")
        .prop_map(|(mode_id, key_note, key_name, chord_note, root, chord_name)| ChordRelation {
            mode_id,
            key_note: Some(key_note),
            key_name,
            chord_note: Some(chord_note),
            chord_note_name: Some(root),
            chord_name: Some(chord_name),
            chord_notes: json!("0,4,7"),
            chord_note_names: json!("C,E,G"),
        })
}

pub fn scale_note_strategy() -> impl Strategy<Value = ScaleNoteRow> {
    (1i64..8, key_name_strategy(), 1i64..8, "[A-G][#b]?")
        .prop_map(|(mode_id, key_name, seq_note, note_name)| scale_note(mode_id, &key_name, seq_note, &note_name))
}
