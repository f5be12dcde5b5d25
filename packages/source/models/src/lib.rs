#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Raw dataset source definition types.
//!
//! Each category's raw file is described by a TOML definition: where the
//! file lives, how it is encoded, where the coordinates are, and which
//! field carries the postal or INSEE code used to keep only records of the
//! configured city.

use around_me_amenity_models::Category;
use serde::{Deserialize, Serialize};

/// A raw dataset, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDefinition {
    /// Unique identifier (e.g., `"paris_toilets"`).
    pub id: String,
    /// Human-readable name of the published dataset.
    pub name: String,
    /// Category the records are staged into.
    pub category: Category,
    /// Raw file name, relative to the data directory.
    pub raw_file: String,
    /// How the raw file is encoded.
    pub format: RawFormat,
    /// Where each record's position comes from.
    pub coordinates: CoordinateSource,
    /// Keep only records whose field starts with the configured city
    /// prefix. Absent means every record is kept.
    #[serde(default)]
    pub city_filter: Option<CityFilter>,
}

impl SourceDefinition {
    /// Returns the source identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the human-readable source name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Encoding of a raw file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawFormat {
    /// Delimited text with a header row.
    Delimited {
        /// Field delimiter (default: comma).
        #[serde(default = "default_delimiter")]
        delimiter: char,
    },
    /// `GeoJSON` `FeatureCollection`; one record per feature.
    FeatureCollection,
}

const fn default_delimiter() -> char {
    ','
}

/// Where a record's coordinates come from.
///
/// Tabular and feature sources use opposite axis orders; each variant
/// documents its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CoordinateSource {
    /// A single text column holding `"lat, lon"`.
    Combined {
        /// Column name.
        field: String,
    },
    /// Two numeric columns.
    Split {
        /// Latitude column.
        latitude: String,
        /// Longitude column.
        longitude: String,
    },
    /// The feature's point geometry, ordered `[longitude, latitude]`.
    GeometryPoint,
}

/// City restriction applied after projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityFilter {
    /// Raw field holding the postal or INSEE code.
    pub field: String,
}
