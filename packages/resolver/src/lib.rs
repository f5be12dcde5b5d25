#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Street resolution by exact or approximate label match.
//!
//! A query is canonicalized (trimmed, uppercased) and compared with the
//! published street labels. An exact label wins outright; otherwise the
//! closest labels above a similarity cutoff are returned for the caller to
//! choose from. Resolution never fails: "no match" is an ordinary outcome.

pub mod sequence;

use around_me_normalize::canonical_label;

use crate::sequence::SequenceMatcher;

/// Outcome of resolving a query against the known labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The canonical query is a known label.
    Exact(String),
    /// Close labels, best first. Never empty.
    Ambiguous(Vec<String>),
    /// Nothing cleared the cutoff.
    NotFound,
}

/// Fuzzy matching limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchOptions {
    /// Maximum number of candidates returned.
    pub max_candidates: usize,
    /// Minimum similarity ratio, in `[0, 1]`.
    pub cutoff: f64,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            max_candidates: 3,
            cutoff: 0.6,
        }
    }
}

/// Returns up to `options.max_candidates` of `possibilities` whose
/// similarity to `word` is at least `options.cutoff`, best first.
///
/// Equal scores keep the order of `possibilities`.
#[must_use]
pub fn close_matches<S: AsRef<str>>(
    word: &str,
    possibilities: &[S],
    options: MatchOptions,
) -> Vec<String> {
    let matcher = SequenceMatcher::new(word);
    let mut scored: Vec<(f64, &str)> = possibilities
        .iter()
        .map(AsRef::<str>::as_ref)
        .filter_map(|candidate| {
            let score = matcher.ratio(candidate);
            (score >= options.cutoff).then_some((score, candidate))
        })
        .collect();

    // Stable: ties stay in input order.
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored
        .into_iter()
        .take(options.max_candidates)
        .map(|(_, candidate)| candidate.to_string())
        .collect()
}

/// Resolves a user query against the known street labels.
#[must_use]
pub fn resolve<S: AsRef<str>>(query: &str, known: &[S], options: MatchOptions) -> Resolution {
    let label = canonical_label(query);

    if known.iter().any(|k| k.as_ref() == label) {
        log::debug!("'{label}' is a known street");
        return Resolution::Exact(label);
    }

    let candidates = close_matches(&label, known, options);
    log::debug!("'{label}' has {} close matches", candidates.len());

    if candidates.is_empty() {
        Resolution::NotFound
    } else {
        Resolution::Ambiguous(candidates)
    }
}

/// Distinct labels in order of first appearance.
#[must_use]
pub fn unique_labels<'a, I>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = std::collections::BTreeSet::new();
    labels
        .into_iter()
        .filter(|label| seen.insert(*label))
        .map(str::to_string)
        .collect()
}
