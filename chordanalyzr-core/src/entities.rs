//! Record types, one per catalog query
//!
//! Rows arrive from the database with snake_case column names and are
//! deserialized into these records as-is. Modes and chord relations are
//! serialized back out snake_case and go through the generic camel-case
//! transform; scale notes are mapped by hand into [`ScaleStep`].
//!
//! Only `Mode::id` and the grouping keys (`mode_id`, `key_name`) are
//! required. Every other column is optional and a SQL `NULL` is written out
//! as `null`.

use serde::{Deserialize, Serialize};

/// Database id of a mode. Also the partition key of the per-mode files.
pub type ModeId = i64;

/// A mode (Ionian, Dorian, ...) from the `mode` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mode {
    pub id: ModeId,
    pub name: Option<String>,
}

/// A chord built on a scale degree of a mode transposed to a key, from
/// `mode_scale_chord_relation_view`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordRelation {
    pub mode_id: ModeId,
    pub key_note: Option<i64>,
    pub key_name: String,
    pub chord_note: Option<i64>,
    pub chord_note_name: Option<String>,
    pub chord_name: Option<String>,
    /// Kept in whatever JSON shape the column decoded to (text such as
    /// `"0,4,7"` in the current view, or an array).
    pub chord_notes: serde_json::Value,
    pub chord_note_names: serde_json::Value,
}

/// One tone of a mode's scale in a key, from `mode_scale_note_letter_mv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleNoteRow {
    pub mode_id: ModeId,
    pub key_name: String,
    pub seq_note: Option<i64>,
    pub note_name: Option<String>,
}

/// Output shape of a scale tone inside `scales-mode-{id}.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleStep {
    #[serde(rename = "seqNote")]
    pub seq_note: Option<i64>,
    #[serde(rename = "noteName")]
    pub note_name: Option<String>,
}

impl From<&ScaleNoteRow> for ScaleStep {
    fn from(row: &ScaleNoteRow) -> Self {
        Self {
            seq_note: row.seq_note,
            note_name: row.note_name.clone(),
        }
    }
}

/// Record types that can be built from a decoded database row.
///
/// `RECORD_NAME` is used in decode errors and log fields.
pub trait CatalogRecord: serde::de::DeserializeOwned {
    const RECORD_NAME: &'static str;
}

impl CatalogRecord for Mode {
    const RECORD_NAME: &'static str = "Mode";
}

impl CatalogRecord for ChordRelation {
    const RECORD_NAME: &'static str = "ChordRelation";
}

impl CatalogRecord for ScaleNoteRow {
    const RECORD_NAME: &'static str = "ScaleNote";
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chord_relation_from_snake_row() -> Result<(), serde_json::Error> {
        let row = json!({
            "mode_id": 1,
            "key_note": 0,
            "key_name": "C",
            "chord_note": 0,
            "chord_note_name": "C",
            "chord_name": "Major",
            "chord_notes": "0,4,7",
            "chord_note_names": "C,E,G"
        });
        let chord: ChordRelation = serde_json::from_value(row)?;
        assert_eq!(chord.mode_id, 1);
        assert_eq!(chord.chord_notes, json!("0,4,7"));
        Ok(())
    }

    #[test]
    fn test_mode_rejects_missing_id() {
        let result: Result<Mode, _> = serde_json::from_value(json!({ "name": "Lydian" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_null_columns_pass_through() -> Result<(), serde_json::Error> {
        let row = json!({
            "mode_id": 4,
            "key_note": null,
            "key_name": "F",
            "chord_note": 5,
            "chord_note_name": null,
            "chord_name": null,
            "chord_notes": null,
            "chord_note_names": null
        });
        let chord: ChordRelation = serde_json::from_value(row.clone())?;
        assert_eq!(chord.chord_name, None);
        assert_eq!(serde_json::to_value(&chord)?, row);

        let mode: Mode = serde_json::from_value(json!({ "id": 3, "name": null }))?;
        assert_eq!(serde_json::to_value(&mode)?, json!({ "id": 3, "name": null }));

        let note: ScaleNoteRow = serde_json::from_value(json!({
            "mode_id": 1, "key_name": "C", "seq_note": 1, "note_name": null
        }))?;
        let step = serde_json::to_value(ScaleStep::from(&note))?;
        assert_eq!(step, json!({ "seqNote": 1, "noteName": null }));
        Ok(())
    }

    #[test]
    fn test_null_grouping_key_rejected() {
        let result: Result<ScaleNoteRow, _> = serde_json::from_value(json!({
            "mode_id": 1, "key_name": null, "seq_note": 1, "note_name": "C"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_scale_step_uses_explicit_names() -> Result<(), serde_json::Error> {
        let row = ScaleNoteRow {
            mode_id: 1,
            key_name: "D".to_string(),
            seq_note: Some(2),
            note_name: Some("F#".to_string()),
        };
        let value = serde_json::to_value(ScaleStep::from(&row))?;
        assert_eq!(value, json!({ "seqNote": 2, "noteName": "F#" }));
        Ok(())
    }
}
