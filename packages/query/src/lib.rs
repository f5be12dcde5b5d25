#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Street queries over the staged datasets.
//!
//! A query walks a small state machine: the text is resolved against the
//! street labels, an ambiguous result is handed to a [`Disambiguator`],
//! the chosen street's rows supply the join keys and the center point, and
//! every amenity category is filtered by address key and radius. Every
//! way a query can end without results is a [`QueryAbort`] value.

pub mod datasets;
pub mod describe;
pub mod translate;

use std::collections::{BTreeMap, BTreeSet};

use around_me_amenity_models::{AmenityRecord, Category, Coordinates, Located as _, StreetRecord};
use around_me_config::Settings;
use around_me_resolver::{MatchOptions, Resolution, unique_labels};
use around_me_spatial::{Nearby, within_radius};
use serde::Serialize;
use strum_macros::AsRefStr;

pub use datasets::{DatasetError, Datasets};

/// Why a query ended without results.
#[derive(Debug, thiserror::Error)]
pub enum QueryAbort {
    /// The staged datasets could not be loaded.
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    /// No street label is close to the query.
    #[error("No street matches '{query}'")]
    NotFound {
        /// The query text.
        query: String,
    },

    /// Disambiguation was declined.
    #[error("Search for '{query}' was cancelled")]
    Cancelled {
        /// The query text.
        query: String,
    },

    /// None of the street's rows has a position.
    #[error("Street '{street}' has no coordinates")]
    NoCoordinates {
        /// The resolved street label.
        street: String,
    },
}

/// A user request.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Street name as typed.
    pub text: String,
    /// Search radius in kilometers.
    pub radius_km: f64,
}

impl Query {
    /// Creates a query.
    #[must_use]
    pub fn new(text: impl Into<String>, radius_km: f64) -> Self {
        Self {
            text: text.into(),
            radius_km,
        }
    }
}

/// Picks one street among fuzzy candidates.
pub trait Disambiguator {
    /// Returns the chosen label, or `None` to abort the query.
    fn choose(&mut self, query: &str, candidates: &[String]) -> Option<String>;
}

impl<F> Disambiguator for F
where
    F: FnMut(&str, &[String]) -> Option<String>,
{
    fn choose(&mut self, query: &str, candidates: &[String]) -> Option<String> {
        self(query, candidates)
    }
}

/// Chooses a candidate by 1-based position; `0` or an out-of-range
/// position aborts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetChoice(pub usize);

impl Disambiguator for PresetChoice {
    fn choose(&mut self, _query: &str, candidates: &[String]) -> Option<String> {
        self.0
            .checked_sub(1)
            .and_then(|i| candidates.get(i))
            .cloned()
    }
}

/// Everything found for one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSet<'a> {
    /// The query text.
    pub query: String,
    /// The resolved street label.
    pub street: String,
    /// Every staged row of the street (one per district segment).
    pub streets: Vec<&'a StreetRecord>,
    /// Center of the radius search.
    pub center: Coordinates,
    /// Requested radius in kilometers.
    pub radius_km: f64,
    /// Matching amenities per category, in staged order. Every amenity
    /// category is present, possibly empty.
    pub per_category: BTreeMap<Category, Vec<Nearby<&'a AmenityRecord>>>,
}

impl ResultSet<'_> {
    /// Number of amenities found across all categories.
    #[must_use]
    pub fn total(&self) -> usize {
        self.per_category.values().map(Vec::len).sum()
    }
}

/// States of one query.
#[derive(Debug, AsRefStr)]
enum QueryState<'a> {
    Start,
    AwaitingDisambiguation(Vec<String>),
    StreetSelected(String),
    Resolved {
        street: String,
        rows: Vec<&'a StreetRecord>,
    },
    Completed(ResultSet<'a>),
    Aborted(QueryAbort),
}

/// Answers street queries over loaded datasets.
pub struct QueryEngine {
    datasets: Datasets,
    labels: Vec<String>,
    options: MatchOptions,
}

impl QueryEngine {
    /// Creates an engine over already loaded datasets.
    #[must_use]
    pub fn new(datasets: Datasets, options: MatchOptions) -> Self {
        let labels = unique_labels(datasets.streets().iter().map(|s| s.label.as_str()));
        Self {
            datasets,
            labels,
            options,
        }
    }

    /// Loads every staged dataset from the configured data directory.
    ///
    /// # Errors
    ///
    /// Returns [`QueryAbort::Dataset`] if any staged file is missing or
    /// corrupt; no query can run on a partial load.
    pub fn load(settings: &Settings) -> Result<Self, QueryAbort> {
        let datasets = Datasets::load(&settings.data_dir)?;
        let options = MatchOptions {
            max_candidates: settings.max_candidates,
            cutoff: settings.cutoff,
        };
        Ok(Self::new(datasets, options))
    }

    /// The loaded datasets.
    #[must_use]
    pub const fn datasets(&self) -> &Datasets {
        &self.datasets
    }

    /// Distinct street labels, in staged order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Resolves query text against the street labels.
    #[must_use]
    pub fn resolve(&self, text: &str) -> Resolution {
        around_me_resolver::resolve(text, &self.labels, self.options)
    }

    /// Runs a query to completion.
    ///
    /// # Errors
    ///
    /// Returns [`QueryAbort`] if nothing matches, disambiguation is
    /// declined, or the street has no position.
    pub fn run(
        &self,
        query: &Query,
        disambiguator: &mut dyn Disambiguator,
    ) -> Result<ResultSet<'_>, QueryAbort> {
        let mut state = QueryState::Start;
        loop {
            let from = state.as_ref().to_string();
            state = self.step(state, query, disambiguator);
            log::debug!("Query '{}': {from} -> {}", query.text, state.as_ref());

            match state {
                QueryState::Completed(results) => return Ok(results),
                QueryState::Aborted(reason) => return Err(reason),
                _ => {}
            }
        }
    }

    fn step<'a>(
        &'a self,
        state: QueryState<'a>,
        query: &Query,
        disambiguator: &mut dyn Disambiguator,
    ) -> QueryState<'a> {
        match state {
            QueryState::Start => match self.resolve(&query.text) {
                Resolution::Exact(label) => QueryState::StreetSelected(label),
                Resolution::Ambiguous(candidates) => {
                    QueryState::AwaitingDisambiguation(candidates)
                }
                Resolution::NotFound => QueryState::Aborted(QueryAbort::NotFound {
                    query: query.text.clone(),
                }),
            },
            QueryState::AwaitingDisambiguation(candidates) => {
                match disambiguator.choose(&query.text, &candidates) {
                    Some(choice) => QueryState::StreetSelected(choice),
                    None => QueryState::Aborted(QueryAbort::Cancelled {
                        query: query.text.clone(),
                    }),
                }
            }
            QueryState::StreetSelected(street) => {
                let rows = self.street_rows(&street);
                if rows.is_empty() {
                    QueryState::Aborted(QueryAbort::NotFound {
                        query: query.text.clone(),
                    })
                } else {
                    QueryState::Resolved { street, rows }
                }
            }
            QueryState::Resolved { street, rows } => {
                match self.collect(query, street, rows) {
                    Ok(results) => QueryState::Completed(results),
                    Err(reason) => QueryState::Aborted(reason),
                }
            }
            terminal @ (QueryState::Completed(_) | QueryState::Aborted(_)) => terminal,
        }
    }

    /// Every staged row carrying the label.
    #[must_use]
    pub fn street_rows(&self, label: &str) -> Vec<&StreetRecord> {
        self.datasets
            .streets()
            .iter()
            .filter(|s| s.label == label)
            .collect()
    }

    /// Filters every amenity category around a resolved street.
    fn collect<'a>(
        &'a self,
        query: &Query,
        street: String,
        rows: Vec<&'a StreetRecord>,
    ) -> Result<ResultSet<'a>, QueryAbort> {
        let center = rows
            .iter()
            .find_map(|s| s.coordinates())
            .ok_or_else(|| QueryAbort::NoCoordinates {
                street: street.clone(),
            })?;

        let join_keys: BTreeSet<&str> = rows.iter().map(|s| s.street_type_key.as_str()).collect();

        let per_category = Category::AMENITIES
            .iter()
            .map(|&category| {
                let joined = self
                    .datasets
                    .amenities(category)
                    .iter()
                    .filter(|r| join_keys.iter().any(|k| r.address_key().contains(k)));
                let nearby = within_radius(joined, center, query.radius_km);
                log::debug!("{}: {} within radius", category.label(), nearby.len());
                (category, nearby)
            })
            .collect();

        Ok(ResultSet {
            query: query.text.clone(),
            street,
            streets: rows,
            center,
            radius_km: query.radius_km,
            per_category,
        })
    }
}

#[cfg(test)]
mod tests {
    use around_me_amenity_models::{Flag, MuseumRecord, NOT_SPECIFIED, ToiletRecord};

    use super::*;

    fn street(label: &str, district: &str, position: Option<(f64, f64)>) -> StreetRecord {
        StreetRecord {
            label: label.to_string(),
            original_name: NOT_SPECIFIED.to_string(),
            history: NOT_SPECIFIED.to_string(),
            road_type: "rue".to_string(),
            district: district.to_string(),
            neighborhood: NOT_SPECIFIED.to_string(),
            length_m: None,
            width_m: None,
            latitude: position.map(|p| p.0),
            longitude: position.map(|p| p.1),
            street_type_key: key_of(label),
        }
    }

    fn key_of(label: &str) -> String {
        label.to_lowercase().replace(' ', "")
    }

    fn toilet(address: &str, key: &str, position: (f64, f64)) -> ToiletRecord {
        ToiletRecord {
            address: address.to_string(),
            schedule: NOT_SPECIFIED.to_string(),
            accessible: Flag::Yes,
            latitude: Some(position.0),
            longitude: Some(position.1),
            address_key: key.to_string(),
        }
    }

    fn engine() -> QueryEngine {
        let streets = vec![
            street("RUE X", "01e", None),
            street("RUE X", "02e", Some((48.86, 2.34))),
            street("RUE Y", "03e", Some((48.87, 2.36))),
        ];
        let toilets = vec![
            toilet("4 rue X", "4ruex", (48.86, 2.34)),
            toilet("5 rue Y", "5ruey", (48.86, 2.34)),
            toilet("6 rue X bis", "6ruexbis", (48.95, 2.34)),
        ];
        let museums = vec![MuseumRecord {
            name: "Musee".to_string(),
            address: "1 rue X".to_string(),
            postal_code: "75001".to_string(),
            latitude: None,
            longitude: None,
            address_key: "1ruex".to_string(),
        }];
        let datasets = Datasets::from_records(streets, vec![], toilets, museums, vec![]);
        QueryEngine::new(datasets, MatchOptions::default())
    }

    fn never(_: &str, _: &[String]) -> Option<String> {
        panic!("disambiguation not expected");
    }

    #[test]
    fn labels_are_unique() {
        assert_eq!(engine().labels(), ["RUE X", "RUE Y"]);
    }

    #[test]
    fn exact_query_joins_and_filters() {
        let engine = engine();
        let results = engine.run(&Query::new("rue x", 1.0), &mut never).unwrap();

        assert_eq!(results.street, "RUE X");
        assert_eq!(results.streets.len(), 2);
        assert!((results.center.latitude - 48.86).abs() < f64::EPSILON);

        let toilets = &results.per_category[&Category::Toilet];
        let addresses: Vec<&str> = toilets.iter().map(|n| n.record.address()).collect();
        assert_eq!(addresses, vec!["4 rue X"]);

        assert!(results.per_category[&Category::Museum].is_empty());
        assert!(results.per_category[&Category::Parking].is_empty());
        assert_eq!(results.per_category.len(), Category::AMENITIES.len());
        assert_eq!(results.total(), 1);
    }

    #[test]
    fn ambiguous_query_uses_disambiguator() {
        let engine = engine();
        let mut seen = Vec::new();
        let mut pick_last = |_: &str, candidates: &[String]| {
            seen = candidates.to_vec();
            candidates.last().cloned()
        };
        let results = engine
            .run(&Query::new("RUE Z", 1.0), &mut pick_last)
            .unwrap();

        assert_eq!(seen, vec!["RUE X", "RUE Y"]);
        assert_eq!(results.street, "RUE Y");
    }

    #[test]
    fn declined_disambiguation_cancels() {
        let engine = engine();
        let err = engine
            .run(&Query::new("RUE Z", 1.0), &mut PresetChoice(0))
            .unwrap_err();
        assert!(matches!(err, QueryAbort::Cancelled { .. }));
    }

    #[test]
    fn preset_choice_is_one_based() {
        let candidates = vec!["A".to_string(), "B".to_string()];
        assert_eq!(PresetChoice(1).choose("q", &candidates), Some("A".to_string()));
        assert_eq!(PresetChoice(2).choose("q", &candidates), Some("B".to_string()));
        assert_eq!(PresetChoice(3).choose("q", &candidates), None);
        assert_eq!(PresetChoice(0).choose("q", &candidates), None);
    }

    #[test]
    fn unknown_choice_is_not_found() {
        let engine = engine();
        let mut elsewhere = |_: &str, _: &[String]| Some("BOULEVARD W".to_string());
        let err = engine
            .run(&Query::new("RUE Z", 1.0), &mut elsewhere)
            .unwrap_err();
        assert!(matches!(err, QueryAbort::NotFound { .. }));
    }

    #[test]
    fn street_without_coordinates_aborts() {
        let datasets = Datasets::from_records(
            vec![street("RUE W", "04e", None)],
            vec![],
            vec![],
            vec![],
            vec![],
        );
        let engine = QueryEngine::new(datasets, MatchOptions::default());
        let err = engine.run(&Query::new("RUE W", 1.0), &mut never).unwrap_err();
        assert!(matches!(err, QueryAbort::NoCoordinates { street } if street == "RUE W"));
    }
}
