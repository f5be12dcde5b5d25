#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Address normalization for the civic datasets.
//!
//! Produces the comparison key stored as `address_key` on every staged
//! record and as `street_type_key` on streets. The pipeline is total and
//! deterministic, so "Avenue des Champs-Élysées" and
//! "AVENUE DES CHAMPS ELYSEES" end up with the same key.

pub mod replacements;

use regex::Regex;
use std::sync::LazyLock;

/// Anything that is not a word character.
static NON_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w]+").expect("valid regex"));

/// Normalizes a free-text address into a comparison key.
///
/// The pipeline:
/// 1. Fold to ASCII (diacritics stripped, ligatures expanded)
/// 2. Remove every non-word character (whitespace and punctuation)
/// 3. Lowercase
/// 4. Apply the [`replacements`] table in order
///
/// The result is not idempotent: `normalize("av")` is `"avenue"` but
/// `normalize("avenue")` is `"avenueenue"`.
#[must_use]
pub fn normalize(text: &str) -> String {
    let folded = deunicode::deunicode(text);
    let compact = NON_WORD_RE.replace_all(&folded, "");
    replacements::apply(&compact.to_lowercase())
}

/// Normalizes an optional address; missing input yields an empty key.
#[must_use]
pub fn normalize_opt(text: Option<&str>) -> String {
    text.map(normalize).unwrap_or_default()
}

/// Canonicalizes a user query for lookup against street labels.
///
/// Only trims and uppercases: labels are compared in their published
/// form, not through [`normalize`].
#[must_use]
pub fn canonical_label(query: &str) -> String {
    query.trim().to_uppercase()
}
