//! Grouping of flat row lists into per-mode / per-key mappings
//!
//! Groups keep first-seen order, so a query ordered by mode id produces files
//! and manifest entries in that same order.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::case::to_camel_case_keys;
use crate::entities::{ChordRelation, Mode, ScaleNoteRow, ScaleStep};
use crate::error::ExportResult;
use crate::key_name::KeyNameRule;

/// Insertion-ordered string-keyed groups. Serializes as a JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct Grouped<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for Grouped<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V: Default> Grouped<V> {
    /// Mutable access to the group for `key`, creating it at the end if new.
    pub fn entry(&mut self, key: &str) -> &mut V {
        // Rows come sorted by group key, so the last group is the usual hit.
        let index = match self.entries.iter().rposition(|(k, _)| k == key) {
            Some(index) => index,
            None => {
                self.entries.push((key.to_string(), V::default()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[index].1
    }
}

impl<V> Grouped<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Serialize> Serialize for Grouped<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Chord rows grouped by mode id, each row already camelCased.
pub type ChordsByMode = Grouped<Vec<Value>>;

/// Scale steps grouped by mode id, then by key name.
pub type ScalesByMode = Grouped<Grouped<Vec<ScaleStep>>>;

/// Serialize modes through the generic camelCase transform.
pub fn modes_to_json(modes: &[Mode]) -> ExportResult<Vec<Value>> {
    modes
        .iter()
        .map(|mode| Ok(to_camel_case_keys(serde_json::to_value(mode)?)))
        .collect()
}

/// Group chord rows by mode id, camelCasing each row.
///
/// Rows whose key name the rule rejects are dropped with a warning.
pub fn group_chords_by_mode(
    rows: &[ChordRelation],
    rule: &KeyNameRule,
) -> ExportResult<ChordsByMode> {
    let mut groups = ChordsByMode::new();
    for row in rows {
        if !rule.allows(&row.key_name) {
            tracing::warn!(
                mode_id = row.mode_id,
                key_name = %row.key_name,
                "Dropping chord row with excluded key name"
            );
            continue;
        }
        let value = to_camel_case_keys(serde_json::to_value(row)?);
        groups.entry(&row.mode_id.to_string()).push(value);
    }
    Ok(groups)
}

/// Group scale notes by mode id and key name.
///
/// Unlike chords, rows are mapped field by field into [`ScaleStep`] rather
/// than through the generic transform; the per-key lists keep query order.
pub fn group_scale_notes_by_mode(rows: &[ScaleNoteRow], rule: &KeyNameRule) -> ScalesByMode {
    let mut groups = ScalesByMode::new();
    for row in rows {
        if !rule.allows(&row.key_name) {
            tracing::warn!(
                mode_id = row.mode_id,
                key_name = %row.key_name,
                "Dropping scale note with excluded key name"
            );
            continue;
        }
        groups
            .entry(&row.mode_id.to_string())
            .entry(&row.key_name)
            .push(ScaleStep::from(row));
    }
    groups
}
