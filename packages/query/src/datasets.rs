//! Staged dataset loading.
//!
//! All five staged files are read once into an owned, immutable
//! [`Datasets`] value. A missing or unreadable file fails the whole load.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use around_me_amenity_models::{
    AmenityRecord, Category, MuseumRecord, ParkingRecord, SportRecord, StagedRecord, StreetRecord,
    ToiletRecord,
};
use around_me_config::paths::staged_path;
use serde::de::DeserializeOwned;

/// A staged dataset could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// The staged file does not exist; the category has not been staged.
    #[error("No staged {category} data at {path}")]
    Missing {
        /// Category of the file.
        category: Category,
        /// Expected location.
        path: PathBuf,
    },

    /// The staged file exists but cannot be parsed.
    #[error("Staged {category} data at {path} is unreadable: {source}")]
    Corrupt {
        /// Category of the file.
        category: Category,
        /// File location.
        path: PathBuf,
        /// Underlying parse error.
        source: csv::Error,
    },
}

/// Every staged dataset, read-only after loading.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Datasets {
    streets: Vec<StreetRecord>,
    amenities: BTreeMap<Category, Vec<AmenityRecord>>,
}

impl Datasets {
    /// Loads all staged files from the data directory.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] for the first file that is missing or
    /// corrupt.
    pub fn load(data_dir: &Path) -> Result<Self, DatasetError> {
        let streets = load_category::<StreetRecord>(data_dir)?;
        let parking = load_category::<ParkingRecord>(data_dir)?;
        let toilets = load_category::<ToiletRecord>(data_dir)?;
        let museums = load_category::<MuseumRecord>(data_dir)?;
        let sports = load_category::<SportRecord>(data_dir)?;

        let datasets = Self::from_records(streets, parking, toilets, museums, sports);
        log::info!(
            "Loaded {} street rows and {} amenities from {}",
            datasets.streets.len(),
            datasets.amenities.values().map(Vec::len).sum::<usize>(),
            data_dir.display()
        );
        Ok(datasets)
    }

    /// Builds datasets from records already in memory.
    #[must_use]
    pub fn from_records(
        streets: Vec<StreetRecord>,
        parking: Vec<ParkingRecord>,
        toilets: Vec<ToiletRecord>,
        museums: Vec<MuseumRecord>,
        sports: Vec<SportRecord>,
    ) -> Self {
        let mut amenities = BTreeMap::new();
        amenities.insert(Category::Parking, into_amenities(parking));
        amenities.insert(Category::Toilet, into_amenities(toilets));
        amenities.insert(Category::Museum, into_amenities(museums));
        amenities.insert(Category::Sport, into_amenities(sports));
        Self { streets, amenities }
    }

    /// Street rows in staged order.
    #[must_use]
    pub fn streets(&self) -> &[StreetRecord] {
        &self.streets
    }

    /// Amenity records of one category in staged order. Streets have no
    /// amenity records.
    #[must_use]
    pub fn amenities(&self, category: Category) -> &[AmenityRecord] {
        self.amenities
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

fn into_amenities<T: Into<AmenityRecord>>(records: Vec<T>) -> Vec<AmenityRecord> {
    records.into_iter().map(Into::into).collect()
}

/// Reads one category's staged file. An empty file holds no records.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file is missing or corrupt.
pub fn load_category<T>(data_dir: &Path) -> Result<Vec<T>, DatasetError>
where
    T: StagedRecord + DeserializeOwned,
{
    let category = T::CATEGORY;
    let path = staged_path(data_dir, category);
    if !path.is_file() {
        return Err(DatasetError::Missing { category, path });
    }

    let corrupt = |source| DatasetError::Corrupt {
        category,
        path: path.clone(),
        source,
    };

    let mut reader = csv::Reader::from_path(&path).map_err(corrupt)?;
    let records = reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(corrupt)?;

    log::debug!("Loaded {} {category} records", records.len());
    Ok(records)
}
