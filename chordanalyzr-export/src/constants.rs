//! Constants for the exporter
//!
//! Environment defaults and the fixed catalog queries.

use chordanalyzr_core::KeyNameRule;
use once_cell::sync::Lazy;

// ============================================================================
// ENVIRONMENT DEFAULTS
// ============================================================================

pub const DEFAULT_DB_HOST: &str = "postgres";
pub const DEFAULT_DB_PORT: u16 = 5432;
pub const DEFAULT_DB_NAME: &str = "chordanalyzr";
pub const DEFAULT_DB_USER: &str = "postgres";
pub const DEFAULT_DB_PASSWORD: &str = "pass";
pub const DEFAULT_OUTPUT_DIR: &str = "/output";

/// Connection attempts before the exporter gives up
pub const DEFAULT_CONNECT_MAX_RETRIES: u32 = 60;

/// Seconds between connection attempts
pub const DEFAULT_CONNECT_INTERVAL_SECS: u64 = 1;

// ============================================================================
// CATALOG QUERIES
// ============================================================================

pub const MODES_QUERY: &str = "SELECT id, name FROM mode ORDER BY id";

/// Chords whose notes match the mode's scale exactly, in allowed keys.
pub static CHORDS_QUERY: Lazy<String> = Lazy::new(|| {
    format!(
        "SELECT mode_id, key_note, key_name, chord_note, chord_note_name,
           chord_name, chord_notes, chord_note_names
    FROM mode_scale_chord_relation_view m
    WHERE m.mode_chord_note_diff_count = 0
      AND {}
    ORDER BY mode_id, key_note, chord_note",
        KeyNameRule.sql_predicate("m.key_name")
    )
});

/// Scale tones in allowed keys, in scale order.
pub static SCALE_NOTES_QUERY: Lazy<String> = Lazy::new(|| {
    format!(
        "SELECT mode_id, key_name, seq_note, note_name
    FROM mode_scale_note_letter_mv
    WHERE {}
    ORDER BY mode_id, key_name, note_ordinal",
        KeyNameRule.sql_predicate("key_name")
    )
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chords_query_filters() {
        let sql = CHORDS_QUERY.as_str();
        assert!(sql.contains("mode_chord_note_diff_count = 0"));
        assert!(sql.contains("m.key_name NOT ILIKE '%##%'"));
        assert!(sql.contains("m.key_name NOT IN ('B#', 'Cb', 'E#', 'Fb')"));
        assert!(sql.trim_end().ends_with("ORDER BY mode_id, key_note, chord_note"));
    }

    #[test]
    fn test_scale_notes_query_orders_by_ordinal() {
        let sql = SCALE_NOTES_QUERY.as_str();
        assert!(sql.contains("FROM mode_scale_note_letter_mv"));
        assert!(sql.contains("key_name NOT ILIKE '%bb%'"));
        assert!(sql.trim_end().ends_with("ORDER BY mode_id, key_name, note_ordinal"));
    }
}
