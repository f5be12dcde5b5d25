//! The `"not specified"` sentinel used for missing values in staged data.
//!
//! Text fields that are absent or empty in the raw source are replaced by
//! [`NOT_SPECIFIED`]. Numeric amounts are kept as `Option<f64>` in memory
//! and written as the sentinel when missing.

/// Placeholder written for any missing textual value.
pub const NOT_SPECIFIED: &str = "not specified";

/// Returns the trimmed-non-empty value, or the sentinel.
#[must_use]
pub fn or_not_specified(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => NOT_SPECIFIED.to_string(),
    }
}

/// Returns `true` if the value is missing in the staged sense (empty or
/// the sentinel itself).
#[must_use]
pub fn is_missing(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed == NOT_SPECIFIED
}

/// Parses a monetary amount.
///
/// Empty input and the sentinel parse to `Ok(None)`.
///
/// # Errors
///
/// Returns the offending text if it is neither missing nor a number.
pub fn parse_amount(value: &str) -> Result<Option<f64>, String> {
    if is_missing(value) {
        return Ok(None);
    }
    value
        .trim()
        .parse::<f64>()
        .map(Some)
        .map_err(|_| value.to_string())
}

/// `serde(with)` adapter writing missing amounts as the sentinel.
pub mod amount {
    use serde::{Deserialize as _, Deserializer, Serializer};

    use super::{NOT_SPECIFIED, parse_amount};

    /// Serializes `Some(v)` as a number and `None` as the sentinel.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    #[allow(clippy::ref_option, clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.serialize_f64(*v),
            None => serializer.serialize_str(NOT_SPECIFIED),
        }
    }

    /// Deserializes a number, an empty field or the sentinel.
    ///
    /// # Errors
    ///
    /// Fails if the field holds any other text.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_amount(&raw)
            .map_err(|bad| serde::de::Error::custom(format!("invalid amount '{bad}'")))
    }
}
