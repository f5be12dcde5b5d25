#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dataset staging: raw civic datasets into canonical per-category files.
//!
//! Each category has one embedded [`SourceDefinition`] (see [`registry`]).
//! Staging reads the raw file, projects every record into the category's
//! staged schema, keeps only records of the configured city where the
//! definition asks for it, and writes the result as the authoritative
//! staged dataset. Staging is idempotent: the same raw input always yields
//! byte-identical output.

pub mod parsing;
pub mod progress;
pub mod project;
pub mod raw;
pub mod registry;
pub mod writer;

use std::path::PathBuf;
use std::sync::Arc;

use around_me_amenity_models::{
    Category, MuseumRecord, ParkingRecord, SportRecord, StreetRecord, ToiletRecord,
};
use around_me_config::{Settings, paths};
use around_me_source_models::SourceDefinition;

use crate::progress::ProgressCallback;
use crate::project::Projector;
use crate::raw::RawDataset;

/// Errors that abort staging of one category.
#[derive(Debug, thiserror::Error)]
pub enum StagingError {
    /// The raw input file does not exist.
    #[error("Raw input file not found: {path}")]
    MissingInput {
        /// Expected location of the raw file.
        path: PathBuf,
    },

    /// I/O error (file read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited text could not be read or written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The raw file is not a `GeoJSON` feature collection.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// A required column is absent from the header row.
    #[error("[{source_id}] Required column '{column}' is missing")]
    MissingColumn {
        /// Source being staged.
        source_id: String,
        /// Missing column name.
        column: String,
    },

    /// A feature lacks a required property.
    #[error("[{source_id}] Feature {index} has no '{property}' property")]
    MissingProperty {
        /// Source being staged.
        source_id: String,
        /// Position of the feature in the collection.
        index: usize,
        /// Missing property name.
        property: String,
    },

    /// A feature has no point geometry.
    #[error("[{source_id}] Feature {index} has no point geometry")]
    MissingGeometry {
        /// Source being staged.
        source_id: String,
        /// Position of the feature in the collection.
        index: usize,
    },

    /// The source definition cannot be applied.
    #[error("Invalid source definition: {0}")]
    InvalidDefinition(String),
}

/// Where staging reads from and writes to.
#[derive(Debug, Clone)]
pub struct StageOptions {
    /// Directory holding the raw and staged files.
    pub data_dir: PathBuf,
    /// Postal/INSEE prefix of the target city.
    pub city_prefix: String,
}

impl From<&Settings> for StageOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            data_dir: settings.data_dir.clone(),
            city_prefix: settings.city_prefix.clone(),
        }
    }
}

/// The staged records of one category.
#[derive(Debug, Clone, PartialEq)]
pub enum StagedDataset {
    /// Streets
    Street(Vec<StreetRecord>),
    /// Parking
    Parking(Vec<ParkingRecord>),
    /// Public toilets
    Toilet(Vec<ToiletRecord>),
    /// Museums
    Museum(Vec<MuseumRecord>),
    /// Sports facilities
    Sport(Vec<SportRecord>),
}

impl StagedDataset {
    /// The category of the records.
    #[must_use]
    pub const fn category(&self) -> Category {
        match self {
            Self::Street(_) => Category::Street,
            Self::Parking(_) => Category::Parking,
            Self::Toilet(_) => Category::Toilet,
            Self::Museum(_) => Category::Museum,
            Self::Sport(_) => Category::Sport,
        }
    }

    /// Number of staged records.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Street(r) => r.len(),
            Self::Parking(r) => r.len(),
            Self::Toilet(r) => r.len(),
            Self::Museum(r) => r.len(),
            Self::Sport(r) => r.len(),
        }
    }

    /// Returns `true` if no record was staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Writes the records as the category's staged file.
    ///
    /// # Errors
    ///
    /// Returns [`StagingError`] if the file cannot be written.
    pub fn write(&self, path: &std::path::Path) -> Result<(), StagingError> {
        match self {
            Self::Street(r) => writer::write_staged(path, r),
            Self::Parking(r) => writer::write_staged(path, r),
            Self::Toilet(r) => writer::write_staged(path, r),
            Self::Museum(r) => writer::write_staged(path, r),
            Self::Sport(r) => writer::write_staged(path, r),
        }
    }
}

/// Outcome of a successful staging run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    /// Source that was staged.
    pub source_id: String,
    /// Category written.
    pub category: Category,
    /// Raw records read.
    pub read: usize,
    /// Records written after city filtering.
    pub staged: usize,
    /// Staged file path.
    pub path: PathBuf,
}

/// Projects an in-memory raw dataset. Pure: nothing is read or written.
///
/// # Errors
///
/// Returns [`StagingError`] if a required column, property or geometry is
/// missing.
pub fn stage_dataset(
    def: &SourceDefinition,
    raw: &RawDataset,
    city_prefix: &str,
) -> Result<StagedDataset, StagingError> {
    let mut projector = Projector::new(def, city_prefix);
    let staged = match def.category {
        Category::Street => StagedDataset::Street(projector.streets(raw)?),
        Category::Parking => StagedDataset::Parking(projector.parking(raw)?),
        Category::Toilet => StagedDataset::Toilet(projector.toilets(raw)?),
        Category::Museum => StagedDataset::Museum(projector.museums(raw)?),
        Category::Sport => StagedDataset::Sport(projector.sports(raw)?),
    };
    projector.report();
    Ok(staged)
}

/// Stages one source: reads its raw file from the data directory, projects
/// it, and replaces the category's staged file.
///
/// # Errors
///
/// Returns [`StagingError`] if the raw file is missing or malformed, or the
/// staged file cannot be written. Other categories are unaffected.
pub fn stage_source(
    def: &SourceDefinition,
    options: &StageOptions,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<StageReport, StagingError> {
    let raw_path = paths::raw_path(&options.data_dir, &def.raw_file);
    let staged_path = paths::staged_path(&options.data_dir, def.category);

    progress.set_message(format!("{}: reading", def.id));
    let raw = raw::read_file(&raw_path, &def.format)?;
    log::debug!("[{}] Read {} raw records", def.id, raw.records.len());

    progress.set_message(format!("{}: projecting", def.id));
    let staged = stage_dataset(def, &raw, &options.city_prefix)?;

    progress.set_message(format!("{}: writing", def.id));
    staged.write(&staged_path)?;

    log::info!(
        "[{}] Staged {} of {} records into {}",
        def.id,
        staged.len(),
        raw.records.len(),
        staged_path.display()
    );

    Ok(StageReport {
        source_id: def.id.clone(),
        category: def.category,
        read: raw.records.len(),
        staged: staged.len(),
        path: staged_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::null_progress;
    use crate::registry::source_for;

    const TOILETS_RAW: &str = "ADRESSE;HORAIRE;ACCES_PMR;geo_point_2d\n\
                               2 place de la Concorde;24 h / 24;Oui;48.8656, 2.3212\n\
                               18 avenue de l'Opera;6 h - 22 h;Non;48.8672, 2.3325\n";

    fn options(dir: &std::path::Path) -> StageOptions {
        StageOptions {
            data_dir: dir.to_path_buf(),
            city_prefix: "75".to_string(),
        }
    }

    #[test]
    fn stages_source_into_category_file() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("toilets_data_raw.csv"), TOILETS_RAW).unwrap();
        let def = source_for(Category::Toilet).unwrap();

        let report = stage_source(&def, &options(tmp.path()), &null_progress()).unwrap();

        assert_eq!(report.category, Category::Toilet);
        assert_eq!(report.read, 2);
        assert_eq!(report.staged, 2);
        assert_eq!(report.path, tmp.path().join("toilets_data_staged.csv"));
        assert!(report.path.is_file());
    }

    #[test]
    fn staging_twice_is_byte_identical() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("toilets_data_raw.csv"), TOILETS_RAW).unwrap();
        let def = source_for(Category::Toilet).unwrap();
        let opts = options(tmp.path());

        let first = stage_source(&def, &opts, &null_progress()).unwrap();
        let first_bytes = std::fs::read(&first.path).unwrap();
        let second = stage_source(&def, &opts, &null_progress()).unwrap();
        let second_bytes = std::fs::read(&second.path).unwrap();

        assert_eq!(first_bytes, second_bytes);
    }

    #[test]
    fn missing_raw_file_leaves_previous_output() {
        let tmp = tempfile::tempdir().unwrap();
        let staged = tmp.path().join("museum_data_staged.csv");
        std::fs::write(&staged, "previous").unwrap();
        let def = source_for(Category::Museum).unwrap();

        let err = stage_source(&def, &options(tmp.path()), &null_progress()).unwrap_err();

        assert!(matches!(err, StagingError::MissingInput { .. }));
        assert_eq!(std::fs::read_to_string(&staged).unwrap(), "previous");
    }

    #[test]
    fn stage_dataset_reports_category() {
        let raw = raw::parse_delimited(TOILETS_RAW.as_bytes(), ';').unwrap();
        let def = source_for(Category::Toilet).unwrap();
        let staged = stage_dataset(&def, &raw, "75").unwrap();
        assert_eq!(staged.category(), Category::Toilet);
        assert_eq!(staged.len(), 2);
        assert!(!staged.is_empty());
    }

    #[test]
    fn category_filtered_to_nothing_keeps_header() {
        let tmp = tempfile::tempdir().unwrap();
        let raw = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [2.24, 48.88] },
                "properties": { "l_ep_min": "Hors Paris", "c_postal": "92200" }
            }]
        }"#;
        std::fs::write(tmp.path().join("museum_data_raw.json"), raw).unwrap();
        let def = source_for(Category::Museum).unwrap();

        let report = stage_source(&def, &options(tmp.path()), &null_progress()).unwrap();

        assert_eq!(report.read, 1);
        assert_eq!(report.staged, 0);
        assert_eq!(
            std::fs::read_to_string(&report.path).unwrap(),
            "name,address,postal_code,latitude,longitude,address_key\n"
        );
    }

    #[derive(Default)]
    struct Recorder {
        messages: std::sync::Mutex<Vec<String>>,
    }

    impl ProgressCallback for Recorder {
        fn inc(&self, _delta: u64) {}

        fn set_message(&self, msg: String) {
            self.messages.lock().unwrap().push(msg);
        }

        fn finish(&self, _msg: String) {}
    }

    #[test]
    fn reports_each_staging_step() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("toilets_data_raw.csv"), TOILETS_RAW).unwrap();
        let def = source_for(Category::Toilet).unwrap();
        let recorder = Arc::new(Recorder::default());
        let progress: Arc<dyn ProgressCallback> = recorder.clone();

        stage_source(&def, &options(tmp.path()), &progress).unwrap();

        assert_eq!(
            *recorder.messages.lock().unwrap(),
            vec![
                "paris_toilets: reading",
                "paris_toilets: projecting",
                "paris_toilets: writing",
            ]
        );
    }
}
