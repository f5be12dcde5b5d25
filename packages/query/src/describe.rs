//! Display descriptions of staged records.
//!
//! Pure formatting: one multi-line description per record. Nothing here
//! affects resolution or filtering.

use std::fmt::Write as _;

use around_me_amenity_models::{
    AmenityRecord, MuseumRecord, NOT_SPECIFIED, ParkingRecord, SportRecord, StreetRecord,
    ToiletRecord,
};

use crate::translate::{Translator, translate_or_keep};

/// Describes a street segment. The historical and original names go
/// through the translator.
#[must_use]
pub fn describe_street(
    street: &StreetRecord,
    translator: &dyn Translator,
    target_language: &str,
) -> String {
    format!(
        "Historical name: {}\nOriginal name: {}\nDistrict: {}\nNeighborhood: {}\n",
        translate_or_keep(translator, &street.history, target_language),
        translate_or_keep(translator, &street.original_name, target_language),
        street.district,
        street.neighborhood,
    )
}

fn rate(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_SPECIFIED.to_string(), |v| format!("{v:.2} €"))
}

/// Describes a car park, with rates in euros.
#[must_use]
pub fn describe_parking(parking: &ParkingRecord) -> String {
    let mut out = format!(
        "Name: {}\nAddress: {}\nNumber of Spaces: {}\n",
        parking.name, parking.address, parking.spaces
    );
    for (label, value) in [
        ("1h", parking.rate_1h),
        ("2h", parking.rate_2h),
        ("3h", parking.rate_3h),
        ("4h", parking.rate_4h),
        ("24h", parking.rate_24h),
    ] {
        let _ = writeln!(out, "Rate {label}: {}", rate(value));
    }
    let _ = writeln!(out, "Free: {}", parking.free);
    out
}

/// Describes a public toilet.
#[must_use]
pub fn describe_toilet(toilet: &ToiletRecord) -> String {
    format!(
        "Address: {}\nAccessible for disabled persons: {}\nOpening hours: {}\n",
        toilet.address, toilet.accessible, toilet.schedule
    )
}

/// Describes a museum.
#[must_use]
pub fn describe_museum(museum: &MuseumRecord) -> String {
    format!("Name: {}\nAddress: {}\n", museum.name, museum.address)
}

/// Describes a sports facility.
#[must_use]
pub fn describe_sport(sport: &SportRecord) -> String {
    format!("Name: {}\nAddress: {}\n", sport.name, sport.address)
}

/// Describes an amenity of any category.
#[must_use]
pub fn describe_amenity(record: &AmenityRecord) -> String {
    match record {
        AmenityRecord::Parking(r) => describe_parking(r),
        AmenityRecord::Toilet(r) => describe_toilet(r),
        AmenityRecord::Museum(r) => describe_museum(r),
        AmenityRecord::Sport(r) => describe_sport(r),
    }
}
