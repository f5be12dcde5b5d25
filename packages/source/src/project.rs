//! Projection of raw records into staged records.
//!
//! Each category has a fixed column mapping. Required columns missing from
//! a delimited header, required properties missing from a feature, and
//! features without a point geometry are fatal for the whole category.
//! Anything else that fails to parse becomes the sentinel or `None`.

use around_me_amenity_models::{
    MuseumRecord, ParkingRecord, SportRecord, StreetRecord, ToiletRecord, sentinel,
};
use around_me_normalize::normalize_opt;
use around_me_source_models::{CoordinateSource, SourceDefinition};

use crate::StagingError;
use crate::parsing::{
    district_from_code, flag_from_binary, flag_from_oui_non, matches_city_prefix, parse_f64,
    parse_lat_lng_pair,
};
use crate::raw::{RawDataset, RawRecord};

/// Address parts of a sports facility, in display order.
const SPORT_ADDRESS_PARTS: &[&str] = &[
    "n_voie",
    "c_suf1",
    "c_suf2",
    "c_suf3",
    "c_desi",
    "c_liaison",
    "l_voie",
];

/// Properties a sports facility feature must carry.
const SPORT_REQUIRED_PROPERTIES: &[&str] = &["l_ep_maj", "d_annee_cr", "b_public", "c_postal"];

/// Per-run projection state: the definition being staged and the number
/// of fields that failed to parse.
pub struct Projector<'a> {
    def: &'a SourceDefinition,
    city_prefix: &'a str,
    bad_coordinates: usize,
    bad_numbers: usize,
}

impl<'a> Projector<'a> {
    /// Creates a projector for one source definition.
    #[must_use]
    pub const fn new(def: &'a SourceDefinition, city_prefix: &'a str) -> Self {
        Self {
            def,
            city_prefix,
            bad_coordinates: 0,
            bad_numbers: 0,
        }
    }

    /// Fails unless every column is present in a delimited header.
    fn require_columns(&self, raw: &RawDataset, columns: &[&str]) -> Result<(), StagingError> {
        for column in columns.iter().copied().chain(self.coordinate_columns()) {
            if !raw.has_column(column) {
                return Err(StagingError::MissingColumn {
                    source_id: self.def.id.clone(),
                    column: column.to_string(),
                });
            }
        }
        Ok(())
    }

    fn coordinate_columns(&self) -> Vec<&str> {
        match &self.def.coordinates {
            CoordinateSource::Combined { field } => vec![field.as_str()],
            CoordinateSource::Split {
                latitude,
                longitude,
            } => vec![latitude.as_str(), longitude.as_str()],
            CoordinateSource::GeometryPoint => Vec::new(),
        }
    }

    /// Fails unless every property key is present on the feature.
    fn require_properties(&self, record: &RawRecord, properties: &[&str]) -> Result<(), StagingError> {
        for property in properties {
            if !record.has(property) {
                return Err(StagingError::MissingProperty {
                    source_id: self.def.id.clone(),
                    index: record.index,
                    property: (*property).to_string(),
                });
            }
        }
        Ok(())
    }

    /// Reads `(latitude, longitude)` from wherever the definition says.
    fn coordinates(&mut self, record: &RawRecord) -> Result<(Option<f64>, Option<f64>), StagingError> {
        let (latitude, longitude, present) = match &self.def.coordinates {
            CoordinateSource::Combined { field } => match record.text(field) {
                Some(text) => {
                    let (lat, lng) = parse_lat_lng_pair(&text);
                    (lat, lng, true)
                }
                None => (None, None, false),
            },
            CoordinateSource::Split {
                latitude,
                longitude,
            } => {
                let lat = record.text(latitude);
                let lng = record.text(longitude);
                let present = lat.is_some() || lng.is_some();
                (
                    lat.as_deref().and_then(parse_f64),
                    lng.as_deref().and_then(parse_f64),
                    present,
                )
            }
            CoordinateSource::GeometryPoint => {
                let [lng, lat] = record.geometry.ok_or_else(|| StagingError::MissingGeometry {
                    source_id: self.def.id.clone(),
                    index: record.index,
                })?;
                (Some(lat), Some(lng), true)
            }
        };

        if present && (latitude.is_none() || longitude.is_none()) {
            self.bad_coordinates += 1;
        }
        Ok((latitude, longitude))
    }

    fn number(&mut self, record: &RawRecord, field: &str) -> Option<f64> {
        let text = record.text(field)?;
        let value = parse_f64(&text);
        if value.is_none() {
            self.bad_numbers += 1;
        }
        value
    }

    fn amount(&mut self, record: &RawRecord, field: &str) -> Option<f64> {
        let text = record.text(field)?;
        sentinel::parse_amount(&text).unwrap_or_else(|_| {
            self.bad_numbers += 1;
            None
        })
    }

    fn keep(&self, record: &RawRecord) -> bool {
        self.def.city_filter.as_ref().is_none_or(|filter| {
            matches_city_prefix(record.text(&filter.field).as_deref(), self.city_prefix)
        })
    }

    /// Logs a single summary of recoverable parse failures.
    pub fn report(&self) {
        if self.bad_coordinates > 0 {
            log::warn!(
                "[{}] {} records have unparseable coordinates and will be excluded from radius queries",
                self.def.id,
                self.bad_coordinates
            );
        }
        if self.bad_numbers > 0 {
            log::warn!(
                "[{}] {} numeric fields could not be parsed and were left unspecified",
                self.def.id,
                self.bad_numbers
            );
        }
    }

    /// Projects the street dataset. Every column is required.
    ///
    /// # Errors
    ///
    /// Returns [`StagingError::MissingColumn`] if the header lacks a column.
    pub fn streets(&mut self, raw: &RawDataset) -> Result<Vec<StreetRecord>, StagingError> {
        self.require_columns(
            raw,
            &[
                "typo",
                "orig",
                "historique",
                "typvoie",
                "arrdt",
                "quartier",
                "longueur",
                "largeur",
            ],
        )?;

        let mut out = Vec::with_capacity(raw.records.len());
        for record in &raw.records {
            let (latitude, longitude) = self.coordinates(record)?;
            if !self.keep(record) {
                continue;
            }
            let label = record.text("typo");
            out.push(StreetRecord {
                street_type_key: normalize_opt(label.as_deref()),
                label: sentinel::or_not_specified(label.as_deref()),
                original_name: text_or_sentinel(record, "orig"),
                history: text_or_sentinel(record, "historique"),
                road_type: text_or_sentinel(record, "typvoie"),
                district: text_or_sentinel(record, "arrdt"),
                neighborhood: text_or_sentinel(record, "quartier"),
                length_m: self.number(record, "longueur"),
                width_m: self.number(record, "largeur"),
                latitude,
                longitude,
            });
        }
        Ok(out)
    }

    /// Projects the parking dataset.
    ///
    /// # Errors
    ///
    /// Returns [`StagingError::MissingColumn`] if a required column is
    /// absent.
    pub fn parking(&mut self, raw: &RawDataset) -> Result<Vec<ParkingRecord>, StagingError> {
        self.require_columns(raw, &["nom", "adresse", "insee", "gratuit"])?;

        let mut out = Vec::with_capacity(raw.records.len());
        for record in &raw.records {
            let (latitude, longitude) = self.coordinates(record)?;
            if !self.keep(record) {
                continue;
            }
            let address = record.text("adresse");
            let insee = record.text("insee");
            out.push(ParkingRecord {
                name: text_or_sentinel(record, "nom"),
                address_key: normalize_opt(address.as_deref()),
                address: sentinel::or_not_specified(address.as_deref()),
                district: district_from_code(insee.as_deref()),
                insee: sentinel::or_not_specified(insee.as_deref()),
                spaces: text_or_sentinel(record, "nb_places"),
                rate_1h: self.amount(record, "tarif_1h"),
                rate_2h: self.amount(record, "tarif_2h"),
                rate_3h: self.amount(record, "tarif_3h"),
                rate_4h: self.amount(record, "tarif_4h"),
                rate_24h: self.amount(record, "tarif_24h"),
                max_height: text_or_sentinel(record, "hauteur_max"),
                free: flag_from_binary(record.text("gratuit").as_deref()),
                latitude,
                longitude,
            });
        }
        Ok(out)
    }

    /// Projects the public toilet dataset.
    ///
    /// # Errors
    ///
    /// Returns [`StagingError::MissingColumn`] if a required column is
    /// absent.
    pub fn toilets(&mut self, raw: &RawDataset) -> Result<Vec<ToiletRecord>, StagingError> {
        self.require_columns(raw, &["ADRESSE", "ACCES_PMR"])?;

        let mut out = Vec::with_capacity(raw.records.len());
        for record in &raw.records {
            let (latitude, longitude) = self.coordinates(record)?;
            if !self.keep(record) {
                continue;
            }
            let address = record.text("ADRESSE");
            out.push(ToiletRecord {
                address_key: normalize_opt(address.as_deref()),
                address: sentinel::or_not_specified(address.as_deref()),
                schedule: text_or_sentinel(record, "HORAIRE"),
                accessible: flag_from_oui_non(record.text("ACCES_PMR").as_deref()),
                latitude,
                longitude,
            });
        }
        Ok(out)
    }

    /// Projects the museum dataset. Every property is optional.
    ///
    /// # Errors
    ///
    /// Returns [`StagingError::MissingGeometry`] for a feature without a
    /// point geometry.
    pub fn museums(&mut self, raw: &RawDataset) -> Result<Vec<MuseumRecord>, StagingError> {
        let mut out = Vec::with_capacity(raw.records.len());
        for record in &raw.records {
            let (latitude, longitude) = self.coordinates(record)?;
            if !self.keep(record) {
                continue;
            }
            let address = record.text("adresse");
            out.push(MuseumRecord {
                name: text_or_sentinel(record, "l_ep_min"),
                address_key: normalize_opt(address.as_deref()),
                address: sentinel::or_not_specified(address.as_deref()),
                postal_code: text_or_sentinel(record, "c_postal"),
                latitude,
                longitude,
            });
        }
        Ok(out)
    }

    /// Projects the sports facility dataset.
    ///
    /// # Errors
    ///
    /// Returns [`StagingError::MissingProperty`] if a feature lacks one of
    /// the required properties, or [`StagingError::MissingGeometry`] for a
    /// feature without a point geometry.
    pub fn sports(&mut self, raw: &RawDataset) -> Result<Vec<SportRecord>, StagingError> {
        let mut out = Vec::with_capacity(raw.records.len());
        for record in &raw.records {
            self.require_properties(record, SPORT_REQUIRED_PROPERTIES)?;
            let (latitude, longitude) = self.coordinates(record)?;
            if !self.keep(record) {
                continue;
            }
            let address = sport_address(record);
            out.push(SportRecord {
                name: text_or_sentinel(record, "l_ep_maj"),
                address_key: around_me_normalize::normalize(&address),
                address: sentinel::or_not_specified(Some(&address)),
                year_created: text_or_sentinel(record, "d_annee_cr"),
                public: text_or_sentinel(record, "b_public"),
                postal_code: text_or_sentinel(record, "c_postal"),
                latitude,
                longitude,
            });
        }
        Ok(out)
    }
}

fn text_or_sentinel(record: &RawRecord, field: &str) -> String {
    sentinel::or_not_specified(record.text(field).as_deref())
}

/// Joins the address parts with single spaces, each missing part empty.
fn sport_address(record: &RawRecord) -> String {
    SPORT_ADDRESS_PARTS
        .iter()
        .map(|part| record.text(part).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(" ")
}
