//! snake_case → camelCase key renaming
//!
//! The frontend reads camelCase keys while the database speaks snake_case.
//! [`to_camel_case_keys`] rewrites every object key in a JSON tree; values are
//! never touched.

use serde_json::{Map, Value};

/// Convert one snake_case identifier to camelCase.
///
/// The first segment is kept as-is, every following segment has its first
/// character upper-cased and the rest lower-cased, and the separators are
/// dropped. A key without underscores comes back unchanged.
pub fn snake_to_camel(key: &str) -> String {
    let mut segments = key.split('_');
    let mut out = String::with_capacity(key.len());
    if let Some(first) = segments.next() {
        out.push_str(first);
    }
    for segment in segments {
        let mut chars = segment.chars();
        if let Some(head) = chars.next() {
            out.extend(head.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
        }
    }
    out
}

/// Recursively rename every object key in `value` to camelCase.
///
/// Arrays are walked element by element; scalars (including `null`) pass
/// through unchanged.
pub fn to_camel_case_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let renamed: Map<String, Value> = map
                .into_iter()
                .map(|(key, inner)| (snake_to_camel(&key), to_camel_case_keys(inner)))
                .collect();
            Value::Object(renamed)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(to_camel_case_keys).collect()),
        scalar => scalar,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_snake_to_camel() {
        assert_eq!(snake_to_camel("mode_id"), "modeId");
        assert_eq!(snake_to_camel("chord_note_names"), "chordNoteNames");
        assert_eq!(snake_to_camel("id"), "id");
        assert_eq!(snake_to_camel("key_NAME"), "keyName");
        assert_eq!(snake_to_camel(""), "");
    }

    #[test]
    fn test_degenerate_separators() {
        assert_eq!(snake_to_camel("a__b"), "aB");
        assert_eq!(snake_to_camel("_private"), "Private");
        assert_eq!(snake_to_camel("trailing_"), "trailing");
    }

    #[test]
    fn test_nested_structures() {
        let input = json!({
            "mode_id": 1,
            "key_info": { "key_name": "C", "alt_names": [{ "note_name": "B#" }] },
            "chord_notes": null,
            "seq": [1, 2, 3]
        });
        let expected = json!({
            "modeId": 1,
            "keyInfo": { "keyName": "C", "altNames": [{ "noteName": "B#" }] },
            "chordNotes": null,
            "seq": [1, 2, 3]
        });
        assert_eq!(to_camel_case_keys(input), expected);
    }

    #[test]
    fn test_values_are_untouched() {
        let input = json!({ "chord_name": "major_seventh" });
        assert_eq!(to_camel_case_keys(input), json!({ "chordName": "major_seventh" }));
    }

    #[test]
    fn test_key_order_is_preserved() {
        let input = json!({ "mode_id": 1, "key_note": 0, "key_name": "C" });
        let output = to_camel_case_keys(input);
        let keys: Vec<&str> = output
            .as_object()
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default();
        assert_eq!(keys, vec!["modeId", "keyNote", "keyName"]);
    }

    proptest! {
        #[test]
        fn prop_camel_is_idempotent(key in "[a-z]{1,8}(_[a-z]{1,8}){0,4}") {
            let once = snake_to_camel(&key);
            prop_assert_eq!(snake_to_camel(&once), once.clone());
            prop_assert!(!once.contains('_'));
        }

        #[test]
        fn prop_single_segment_unchanged(key in "[a-zA-Z0-9]{0,16}") {
            prop_assert_eq!(snake_to_camel(&key), key);
        }

        #[test]
        fn prop_tree_transform_is_idempotent(
            keys in proptest::collection::vec("[a-z]{1,6}(_[a-z]{1,6}){0,3}", 1..8)
        ) {
            let mut map = Map::new();
            for (i, key) in keys.iter().enumerate() {
                map.insert(key.clone(), json!([{ "inner_key": i }]));
            }
            let once = to_camel_case_keys(Value::Object(map));
            prop_assert_eq!(to_camel_case_keys(once.clone()), once);
        }
    }
}
