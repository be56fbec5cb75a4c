//! Key-name exclusion rules
//!
//! Keys spelled with double accidentals (`F##`, `Abb`) or as enharmonic
//! duplicates of natural notes (`B#`, `Cb`, `E#`, `Fb`) are never exported.
//! The same rule renders the SQL predicate and filters rows client-side.

/// Substrings that mark a double accidental. Matched case-insensitively,
/// like `ILIKE '%##%'`.
pub const DOUBLE_ACCIDENTAL_MARKERS: [&str; 2] = ["##", "bb"];

/// Enharmonic spellings of natural notes. Matched exactly, like `NOT IN`.
pub const EXCLUDED_ENHARMONICS: [&str; 4] = ["B#", "Cb", "E#", "Fb"];

/// Key-name filter shared by the chord and scale queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyNameRule;

impl KeyNameRule {
    /// Whether a key name may appear in output.
    pub fn allows(&self, key_name: &str) -> bool {
        !is_excluded_key_name(key_name)
    }

    /// Render the rule as a SQL predicate over `column`.
    ///
    /// The literals are compile-time constants, so inlining them is safe.
    pub fn sql_predicate(&self, column: &str) -> String {
        let mut clauses: Vec<String> = DOUBLE_ACCIDENTAL_MARKERS
            .iter()
            .map(|marker| format!("{column} NOT ILIKE '%{marker}%'"))
            .collect();
        let enharmonics = EXCLUDED_ENHARMONICS
            .iter()
            .map(|name| format!("'{name}'"))
            .collect::<Vec<_>>()
            .join(", ");
        clauses.push(format!("{column} NOT IN ({enharmonics})"));
        clauses.join("\n      AND ")
    }
}

/// True when `key_name` holds a double accidental or is an excluded
/// enharmonic spelling.
pub fn is_excluded_key_name(key_name: &str) -> bool {
    let lowered = key_name.to_lowercase();
    DOUBLE_ACCIDENTAL_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
        || EXCLUDED_ENHARMONICS.contains(&key_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_excluded_spellings() {
        for name in ["B#", "Cb", "E#", "Fb", "F##", "Abb", "ABB", "c##"] {
            assert!(is_excluded_key_name(name), "{name} should be excluded");
        }
    }

    #[test]
    fn test_allowed_spellings() {
        let rule = KeyNameRule;
        for name in ["C", "C#", "Db", "F#", "Gb", "Eb", "Ab", "B", "E"] {
            assert!(rule.allows(name), "{name} should be allowed");
        }
    }

    #[test]
    fn test_b_flat_matches_double_flat_marker() {
        // "Bb" contains "bb" when compared case-insensitively, same as ILIKE.
        assert!(is_excluded_key_name("Bb"));
    }

    #[test]
    fn test_enharmonic_match_is_case_sensitive() {
        // NOT IN compares exactly; only the ILIKE markers ignore case.
        assert!(!is_excluded_key_name("b#"));
        assert!(!is_excluded_key_name("CB"));
    }

    #[test]
    fn test_sql_predicate() {
        let sql = KeyNameRule.sql_predicate("m.key_name");
        assert!(sql.contains("m.key_name NOT ILIKE '%##%'"));
        assert!(sql.contains("m.key_name NOT ILIKE '%bb%'"));
        assert!(sql.contains("m.key_name NOT IN ('B#', 'Cb', 'E#', 'Fb')"));
    }

    proptest! {
        #[test]
        fn prop_double_sharp_always_excluded(prefix in "[A-G]?", suffix in "[#b]{0,2}") {
            let name = format!("{prefix}##{suffix}");
            prop_assert!(is_excluded_key_name(&name));
        }

        #[test]
        fn prop_single_accidentals_allowed(letter in "[ADG]", accidental in "(#|b)?") {
            let name = format!("{letter}{accidental}");
            prop_assert!(KeyNameRule.allows(&name));
        }
    }
}
