#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Amenity categories and the canonical staged record schemas.
//!
//! Every raw civic dataset (streets, parking, public toilets, museums,
//! sports facilities) is projected into one of the record types defined
//! here. Staged records are written once by the stager and are read-only
//! afterwards; the query engine only ever borrows them.

pub mod sentinel;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use sentinel::NOT_SPECIFIED;

/// The dataset categories handled by the system.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Category {
    /// Named streets; the entity a query resolves to.
    Street,
    /// Public car parks
    Parking,
    /// Public toilets
    Toilet,
    /// Museums
    Museum,
    /// Sports facilities
    Sport,
}

impl Category {
    /// Every category, streets first.
    pub const ALL: &[Self] = &[
        Self::Street,
        Self::Parking,
        Self::Toilet,
        Self::Museum,
        Self::Sport,
    ];

    /// The categories searched around a resolved street.
    pub const AMENITIES: &[Self] = &[Self::Parking, Self::Toilet, Self::Museum, Self::Sport];

    /// File stem used for the raw and staged data files of this category
    /// (e.g. `toilets` in `toilets_data_staged.csv`).
    #[must_use]
    pub const fn file_stem(self) -> &'static str {
        match self {
            Self::Street => "street",
            Self::Parking => "parking",
            Self::Toilet => "toilets",
            Self::Museum => "museum",
            Self::Sport => "sports",
        }
    }

    /// Human-readable plural label used in reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Street => "Street",
            Self::Parking => "Parking",
            Self::Toilet => "Public Toilets",
            Self::Museum => "Museums",
            Self::Sport => "Sports Facilities",
        }
    }
}

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude
    pub latitude: f64,
    /// Longitude
    pub longitude: f64,
}

impl Coordinates {
    /// Builds a position from two optional components.
    ///
    /// Returns `None` unless both are present and finite, which is the
    /// condition for a record to take part in spatial queries.
    #[must_use]
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        let latitude = latitude.filter(|v| v.is_finite())?;
        let longitude = longitude.filter(|v| v.is_finite())?;
        Some(Self {
            latitude,
            longitude,
        })
    }
}

/// Canonical yes/no value for coded boolean-like source fields
/// (`1`/`0`, `Oui`/`Non`).
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Flag {
    /// yes
    #[serde(rename = "yes")]
    #[strum(serialize = "yes")]
    Yes,
    /// no
    #[serde(rename = "no")]
    #[strum(serialize = "no")]
    No,
    /// The source value was missing or not one of the known codes.
    #[default]
    #[serde(rename = "not specified")]
    #[strum(serialize = "not specified")]
    NotSpecified,
}

/// Anything with an optional position.
pub trait Located {
    /// Position of the record, if both coordinates are known.
    fn coordinates(&self) -> Option<Coordinates>;
}

/// Behaviour shared by all staged record types.
pub trait StagedRecord: Located {
    /// The category this record type belongs to.
    const CATEGORY: Category;

    /// Staged file header, in field order.
    const COLUMNS: &'static [&'static str];

    /// The original free-text address (or label, for streets).
    fn address(&self) -> &str;

    /// Normalized comparison key derived from [`Self::address`].
    fn address_key(&self) -> &str;
}

/// One row of the staged street dataset. A street name may span several
/// rows, one per district segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreetRecord {
    /// Street label as published (`typo`), e.g. `AVENUE DES CHAMPS ELYSEES`.
    pub label: String,
    /// Origin of the name.
    pub original_name: String,
    /// Former names.
    pub history: String,
    /// Road type (`avenue`, `rue`, ...).
    pub road_type: String,
    /// District (arrondissement) of this segment.
    pub district: String,
    /// Neighborhood (quartier) of this segment.
    pub neighborhood: String,
    /// Length in meters.
    pub length_m: Option<f64>,
    /// Width in meters.
    pub width_m: Option<f64>,
    /// Latitude (WGS84).
    pub latitude: Option<f64>,
    /// Longitude (WGS84).
    pub longitude: Option<f64>,
    /// Normalized label; the join key amenity addresses are matched against.
    pub street_type_key: String,
}

impl Located for StreetRecord {
    fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_parts(self.latitude, self.longitude)
    }
}

impl StagedRecord for StreetRecord {
    const CATEGORY: Category = Category::Street;
    const COLUMNS: &'static [&'static str] = &[
        "label",
        "original_name",
        "history",
        "road_type",
        "district",
        "neighborhood",
        "length_m",
        "width_m",
        "latitude",
        "longitude",
        "street_type_key",
    ];

    fn address(&self) -> &str {
        &self.label
    }

    fn address_key(&self) -> &str {
        &self.street_type_key
    }
}

/// One row of the staged parking dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkingRecord {
    /// Car park name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// INSEE commune code.
    pub insee: String,
    /// District derived from the INSEE code (`"08e"`).
    pub district: String,
    /// Number of spaces, as published.
    pub spaces: String,
    /// One hour rate in euros.
    #[serde(with = "sentinel::amount")]
    pub rate_1h: Option<f64>,
    /// Two hour rate in euros.
    #[serde(with = "sentinel::amount")]
    pub rate_2h: Option<f64>,
    /// Three hour rate in euros.
    #[serde(with = "sentinel::amount")]
    pub rate_3h: Option<f64>,
    /// Four hour rate in euros.
    #[serde(with = "sentinel::amount")]
    pub rate_4h: Option<f64>,
    /// Daily rate in euros.
    #[serde(with = "sentinel::amount")]
    pub rate_24h: Option<f64>,
    /// Maximum vehicle height in centimeters, as published.
    pub max_height: String,
    /// Whether parking is free.
    pub free: Flag,
    /// Latitude (WGS84).
    pub latitude: Option<f64>,
    /// Longitude (WGS84).
    pub longitude: Option<f64>,
    /// Normalized [`Self::address`].
    pub address_key: String,
}

impl Located for ParkingRecord {
    fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_parts(self.latitude, self.longitude)
    }
}

impl StagedRecord for ParkingRecord {
    const CATEGORY: Category = Category::Parking;
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "address",
        "insee",
        "district",
        "spaces",
        "rate_1h",
        "rate_2h",
        "rate_3h",
        "rate_4h",
        "rate_24h",
        "max_height",
        "free",
        "latitude",
        "longitude",
        "address_key",
    ];

    fn address(&self) -> &str {
        &self.address
    }

    fn address_key(&self) -> &str {
        &self.address_key
    }
}

/// One row of the staged public toilet dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToiletRecord {
    /// Street address.
    pub address: String,
    /// Opening hours, as published.
    pub schedule: String,
    /// Whether the toilet is accessible to people with reduced mobility.
    pub accessible: Flag,
    /// Latitude (WGS84).
    pub latitude: Option<f64>,
    /// Longitude (WGS84).
    pub longitude: Option<f64>,
    /// Normalized [`Self::address`].
    pub address_key: String,
}

impl Located for ToiletRecord {
    fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_parts(self.latitude, self.longitude)
    }
}

impl StagedRecord for ToiletRecord {
    const CATEGORY: Category = Category::Toilet;
    const COLUMNS: &'static [&'static str] = &[
        "address",
        "schedule",
        "accessible",
        "latitude",
        "longitude",
        "address_key",
    ];

    fn address(&self) -> &str {
        &self.address
    }

    fn address_key(&self) -> &str {
        &self.address_key
    }
}

/// One row of the staged museum dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MuseumRecord {
    /// Museum name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Postal code.
    pub postal_code: String,
    /// Latitude (WGS84).
    pub latitude: Option<f64>,
    /// Longitude (WGS84).
    pub longitude: Option<f64>,
    /// Normalized [`Self::address`].
    pub address_key: String,
}

impl Located for MuseumRecord {
    fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_parts(self.latitude, self.longitude)
    }
}

impl StagedRecord for MuseumRecord {
    const CATEGORY: Category = Category::Museum;
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "address",
        "postal_code",
        "latitude",
        "longitude",
        "address_key",
    ];

    fn address(&self) -> &str {
        &self.address
    }

    fn address_key(&self) -> &str {
        &self.address_key
    }
}

/// One row of the staged sports facility dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SportRecord {
    /// Facility name.
    pub name: String,
    /// Street address assembled from the number, suffix and street parts.
    pub address: String,
    /// Year the facility opened, as published.
    pub year_created: String,
    /// Public ownership marker, as published.
    pub public: String,
    /// Postal code.
    pub postal_code: String,
    /// Latitude (WGS84).
    pub latitude: Option<f64>,
    /// Longitude (WGS84).
    pub longitude: Option<f64>,
    /// Normalized [`Self::address`].
    pub address_key: String,
}

impl Located for SportRecord {
    fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_parts(self.latitude, self.longitude)
    }
}

impl StagedRecord for SportRecord {
    const CATEGORY: Category = Category::Sport;
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "address",
        "year_created",
        "public",
        "postal_code",
        "latitude",
        "longitude",
        "address_key",
    ];

    fn address(&self) -> &str {
        &self.address
    }

    fn address_key(&self) -> &str {
        &self.address_key
    }
}

/// A staged record of any amenity category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmenityRecord {
    /// Parking
    Parking(ParkingRecord),
    /// Public toilet
    Toilet(ToiletRecord),
    /// Museum
    Museum(MuseumRecord),
    /// Sports facility
    Sport(SportRecord),
}

impl AmenityRecord {
    /// The category of the wrapped record.
    #[must_use]
    pub const fn category(&self) -> Category {
        match self {
            Self::Parking(_) => Category::Parking,
            Self::Toilet(_) => Category::Toilet,
            Self::Museum(_) => Category::Museum,
            Self::Sport(_) => Category::Sport,
        }
    }

    /// Free-text address of the wrapped record.
    #[must_use]
    pub fn address(&self) -> &str {
        match self {
            Self::Parking(r) => r.address(),
            Self::Toilet(r) => r.address(),
            Self::Museum(r) => r.address(),
            Self::Sport(r) => r.address(),
        }
    }

    /// Normalized address key of the wrapped record.
    #[must_use]
    pub fn address_key(&self) -> &str {
        match self {
            Self::Parking(r) => r.address_key(),
            Self::Toilet(r) => r.address_key(),
            Self::Museum(r) => r.address_key(),
            Self::Sport(r) => r.address_key(),
        }
    }
}

impl Located for AmenityRecord {
    fn coordinates(&self) -> Option<Coordinates> {
        match self {
            Self::Parking(r) => r.coordinates(),
            Self::Toilet(r) => r.coordinates(),
            Self::Museum(r) => r.coordinates(),
            Self::Sport(r) => r.coordinates(),
        }
    }
}

impl From<ParkingRecord> for AmenityRecord {
    fn from(value: ParkingRecord) -> Self {
        Self::Parking(value)
    }
}

impl From<ToiletRecord> for AmenityRecord {
    fn from(value: ToiletRecord) -> Self {
        Self::Toilet(value)
    }
}

impl From<MuseumRecord> for AmenityRecord {
    fn from(value: MuseumRecord) -> Self {
        Self::Museum(value)
    }
}

impl From<SportRecord> for AmenityRecord {
    fn from(value: SportRecord) -> Self {
        Self::Sport(value)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    #[test]
    fn category_round_trips_through_strum() {
        for category in Category::ALL {
            let parsed = Category::from_str(category.as_ref()).unwrap();
            assert_eq!(parsed, *category);
        }
        assert_eq!(Category::Toilet.to_string(), "toilet");
    }

    #[test]
    fn file_stems_match_staged_file_names() {
        assert_eq!(Category::Toilet.file_stem(), "toilets");
        assert_eq!(Category::Sport.file_stem(), "sports");
        assert_eq!(Category::Street.file_stem(), "street");
    }

    #[test]
    fn amenities_exclude_streets() {
        assert!(!Category::AMENITIES.contains(&Category::Street));
        assert_eq!(Category::AMENITIES.len(), Category::ALL.len() - 1);
    }

    #[test]
    fn coordinates_require_both_parts() {
        assert!(Coordinates::from_parts(Some(48.8), None).is_none());
        assert!(Coordinates::from_parts(None, Some(2.3)).is_none());
        assert!(Coordinates::from_parts(Some(f64::NAN), Some(2.3)).is_none());
        let c = Coordinates::from_parts(Some(48.8), Some(2.3)).unwrap();
        assert!((c.latitude - 48.8).abs() < f64::EPSILON);
        assert!((c.longitude - 2.3).abs() < f64::EPSILON);
    }

    #[test]
    fn flag_displays_canonical_values() {
        assert_eq!(Flag::Yes.to_string(), "yes");
        assert_eq!(Flag::No.to_string(), "no");
        assert_eq!(Flag::NotSpecified.to_string(), NOT_SPECIFIED);
        assert_eq!(Flag::default(), Flag::NotSpecified);
    }

    #[test]
    fn parking_rates_serialize_sentinel_for_missing_values() {
        let record = ParkingRecord {
            name: "Parking Rivoli".to_string(),
            address: "1 rue de Rivoli".to_string(),
            insee: "75101".to_string(),
            district: "01e".to_string(),
            spaces: "120".to_string(),
            rate_1h: Some(3.5),
            rate_2h: None,
            rate_3h: None,
            rate_4h: None,
            rate_24h: Some(30.0),
            max_height: NOT_SPECIFIED.to_string(),
            free: Flag::No,
            latitude: Some(48.86),
            longitude: Some(2.34),
            address_key: "1ruerivoli".to_string(),
        };

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(&record).unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert!(row.contains(",3.5,not specified,not specified,not specified,30.0,"));
        assert!(row.contains(",no,"));

        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let back: ParkingRecord = reader.deserialize().next().unwrap().unwrap();
        assert_eq!(back, record);
    }

    fn header_of<T: Serialize>(record: &T) -> Vec<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(record).unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        text.lines().next().unwrap().split(',').map(String::from).collect()
    }

    #[test]
    fn columns_match_serialized_headers() {
        let street = StreetRecord {
            label: "RUE X".to_string(),
            original_name: NOT_SPECIFIED.to_string(),
            history: NOT_SPECIFIED.to_string(),
            road_type: "rue".to_string(),
            district: "01e".to_string(),
            neighborhood: NOT_SPECIFIED.to_string(),
            length_m: None,
            width_m: None,
            latitude: None,
            longitude: None,
            street_type_key: "ruex".to_string(),
        };
        let toilet = ToiletRecord {
            address: "1 rue X".to_string(),
            schedule: NOT_SPECIFIED.to_string(),
            accessible: Flag::NotSpecified,
            latitude: None,
            longitude: None,
            address_key: "1ruex".to_string(),
        };
        let museum = MuseumRecord {
            name: "Musee".to_string(),
            address: "1 rue X".to_string(),
            postal_code: "75001".to_string(),
            latitude: None,
            longitude: None,
            address_key: "1ruex".to_string(),
        };
        let sport = SportRecord {
            name: "Gymnase".to_string(),
            address: "1 rue X".to_string(),
            year_created: "1980".to_string(),
            public: "1".to_string(),
            postal_code: "75001".to_string(),
            latitude: None,
            longitude: None,
            address_key: "1ruex".to_string(),
        };
        let parking = ParkingRecord {
            name: "Parking".to_string(),
            address: "1 rue X".to_string(),
            insee: "75101".to_string(),
            district: "01e".to_string(),
            spaces: NOT_SPECIFIED.to_string(),
            rate_1h: None,
            rate_2h: None,
            rate_3h: None,
            rate_4h: None,
            rate_24h: None,
            max_height: NOT_SPECIFIED.to_string(),
            free: Flag::No,
            latitude: None,
            longitude: None,
            address_key: "1ruex".to_string(),
        };

        assert_eq!(header_of(&street), StreetRecord::COLUMNS);
        assert_eq!(header_of(&parking), ParkingRecord::COLUMNS);
        assert_eq!(header_of(&toilet), ToiletRecord::COLUMNS);
        assert_eq!(header_of(&museum), MuseumRecord::COLUMNS);
        assert_eq!(header_of(&sport), SportRecord::COLUMNS);
    }

    #[test]
    fn amenity_record_delegates_to_inner_record() {
        let museum = MuseumRecord {
            name: "Musee Carnavalet".to_string(),
            address: "23 rue de Sevigne".to_string(),
            postal_code: "75003".to_string(),
            latitude: Some(48.857),
            longitude: Some(2.362),
            address_key: "23ruesevigne".to_string(),
        };
        let amenity = AmenityRecord::from(museum);
        assert_eq!(amenity.category(), Category::Museum);
        assert_eq!(amenity.address(), "23 rue de Sevigne");
        assert_eq!(amenity.address_key(), "23ruesevigne");
        assert!(amenity.coordinates().is_some());
    }
}
