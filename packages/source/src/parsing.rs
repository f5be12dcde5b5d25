//! Shared field parsing for raw civic datasets.
//!
//! Coordinate, numeric and coded-boolean parsing used by every category's
//! projection. None of these fail a record: an unparseable field simply
//! becomes `None` or [`Flag::NotSpecified`].

use around_me_amenity_models::{Flag, NOT_SPECIFIED};

/// Parses a `"lat, lon"` pair (comma-space separated).
///
/// Each half is parsed on its own, so a bad longitude still yields the
/// latitude. Callers treat a record as unlocated unless both are present.
#[must_use]
pub fn parse_lat_lng_pair(text: &str) -> (Option<f64>, Option<f64>) {
    let mut parts = text.split(", ");
    let latitude = parts.next().and_then(parse_f64);
    let longitude = parts.next().and_then(parse_f64);
    (latitude, longitude)
}

/// Parses a float, ignoring surrounding whitespace. Non-finite values are
/// rejected.
#[must_use]
pub fn parse_f64(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Maps a `1`/`0` coded field (possibly written as a float) to a [`Flag`].
#[must_use]
pub fn flag_from_binary(text: Option<&str>) -> Flag {
    match text.and_then(parse_f64) {
        Some(v) if v == 1.0 => Flag::Yes,
        Some(v) if v == 0.0 => Flag::No,
        _ => Flag::NotSpecified,
    }
}

/// Maps an `Oui`/`Non` coded field to a [`Flag`]. Matching is exact.
#[must_use]
pub fn flag_from_oui_non(text: Option<&str>) -> Flag {
    match text {
        Some("Oui") => Flag::Yes,
        Some("Non") => Flag::No,
        _ => Flag::NotSpecified,
    }
}

/// Derives the district label from an INSEE or postal code: its last two
/// characters followed by `e` (`"75108"` -> `"08e"`).
#[must_use]
pub fn district_from_code(code: Option<&str>) -> String {
    let Some(code) = code.map(str::trim).filter(|c| !c.is_empty()) else {
        return NOT_SPECIFIED.to_string();
    };
    let chars: Vec<char> = code.chars().collect();
    let tail: String = chars[chars.len().saturating_sub(2)..].iter().collect();
    format!("{tail}e")
}

/// Returns `true` if the code starts with the city prefix.
#[must_use]
pub fn matches_city_prefix(code: Option<&str>, prefix: &str) -> bool {
    code.is_some_and(|c| c.trim().starts_with(prefix))
}
