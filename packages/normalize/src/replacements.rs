//! Road-type abbreviation table.
//!
//! Entries are plain substring replacements applied in table order to an
//! already folded, lowercased, punctuation-free key. They are not
//! word-boundary aware: `"de"` is removed wherever it occurs, including
//! inside longer words, and an expansion can create a new match for a
//! later entry. Both sides of every comparison go through the same table,
//! so the join keys stay consistent.

/// Ordered `(needle, replacement)` pairs.
pub const REPLACEMENTS: &[(&str, &str)] = &[
    ("de", ""),
    ("av", "avenue"),
    ("bd", "boulevard"),
    ("pl", "place"),
];

/// Applies every entry of [`REPLACEMENTS`] in order.
#[must_use]
pub fn apply(key: &str) -> String {
    REPLACEMENTS
        .iter()
        .fold(key.to_string(), |acc, (needle, replacement)| {
            acc.replace(needle, replacement)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_order_is_fixed() {
        let needles: Vec<&str> = REPLACEMENTS.iter().map(|(n, _)| *n).collect();
        assert_eq!(needles, ["de", "av", "bd", "pl"]);
    }

    #[test]
    fn expands_abbreviations() {
        assert_eq!(apply("av"), "avenue");
        assert_eq!(apply("bd"), "boulevard");
        assert_eq!(apply("pl"), "place");
    }

    #[test]
    fn removes_de_inside_words() {
        assert_eq!(apply("ruedelorient"), "ruelorient");
        assert_eq!(apply("mode"), "mo");
    }

    #[test]
    fn removal_can_create_new_matches() {
        // "adev" loses "de" and becomes "av", which then expands.
        assert_eq!(apply("adev"), "avenue");
    }
}
