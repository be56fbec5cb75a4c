//! Output file names and the `index.json` manifest

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const MODES_FILE: &str = "modes.json";
pub const INDEX_FILE: &str = "index.json";

/// Format of `generatedAt`, e.g. `2024-03-01 12:00:00 UTC`.
pub const GENERATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

pub fn chords_file_name(mode_id: &str) -> String {
    format!("chords-mode-{mode_id}.json")
}

pub fn scales_file_name(mode_id: &str) -> String {
    format!("scales-mode-{mode_id}.json")
}

/// Contents of `index.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticIndex {
    pub generated_at: String,
    /// The same camelCased list written to `modes.json`.
    pub modes: Vec<Value>,
    pub available_files: AvailableFiles,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableFiles {
    pub modes: String,
    pub chords_by_mode: Vec<String>,
    pub scales_by_mode: Vec<String>,
}

impl StaticIndex {
    /// Build the manifest from the mode ids that actually got a file.
    pub fn new<'a>(
        generated_at: DateTime<Utc>,
        modes: Vec<Value>,
        chord_mode_ids: impl IntoIterator<Item = &'a str>,
        scale_mode_ids: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self {
            generated_at: generated_at.format(GENERATED_AT_FORMAT).to_string(),
            modes,
            available_files: AvailableFiles {
                modes: MODES_FILE.to_string(),
                chords_by_mode: chord_mode_ids.into_iter().map(chords_file_name).collect(),
                scales_by_mode: scale_mode_ids.into_iter().map(scales_file_name).collect(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_file_names() {
        assert_eq!(chords_file_name("3"), "chords-mode-3.json");
        assert_eq!(scales_file_name("12"), "scales-mode-12.json");
    }

    #[test]
    fn test_index_shape() -> Result<(), serde_json::Error> {
        let at = Utc
            .with_ymd_and_hms(2024, 3, 1, 9, 5, 7)
            .single()
            .ok_or_else(|| <serde_json::Error as serde::de::Error>::custom("invalid timestamp"))?;
        let index = StaticIndex::new(
            at,
            vec![json!({ "id": 1, "name": "Ionian" })],
            ["1"],
            std::iter::empty(),
        );
        let value = serde_json::to_value(&index)?;
        assert_eq!(
            value,
            json!({
                "generatedAt": "2024-03-01 09:05:07 UTC",
                "modes": [{ "id": 1, "name": "Ionian" }],
                "availableFiles": {
                    "modes": "modes.json",
                    "chordsByMode": ["chords-mode-1.json"],
                    "scalesByMode": []
                }
            })
        );
        Ok(())
    }
}
