//! Staged dataset writer.
//!
//! Output is comma-separated UTF-8 with a header row, written to a
//! temporary sibling and renamed over the previous file.

use std::path::Path;

use around_me_amenity_models::StagedRecord;
use serde::Serialize;

use crate::StagingError;

/// Writes records to `path`, replacing any previous content wholesale.
///
/// An empty record list produces a file holding only the header row.
///
/// # Errors
///
/// Returns [`StagingError::Io`] or [`StagingError::Csv`] if the file
/// cannot be written. The previous file is left untouched on failure.
pub fn write_staged<T: StagedRecord + Serialize>(path: &Path, records: &[T]) -> Result<(), StagingError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        around_me_config::paths::ensure_dir(parent)?;
    }

    let tmp_path = path.with_extension("csv.tmp");
    let result = write_csv(&tmp_path, records);
    if let Err(e) = result {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e);
    }

    // Atomic rename
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

fn write_csv<T: StagedRecord + Serialize>(path: &Path, records: &[T]) -> Result<(), StagingError> {
    let mut writer = csv::Writer::from_path(path)?;
    if records.is_empty() {
        writer.write_record(T::COLUMNS)?;
    }
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use around_me_amenity_models::{Flag, MuseumRecord, ToiletRecord};

    use super::*;

    fn toilet(address: &str) -> ToiletRecord {
        ToiletRecord {
            address: address.to_string(),
            schedule: "24 h / 24".to_string(),
            accessible: Flag::Yes,
            latitude: Some(48.85),
            longitude: None,
            address_key: around_me_normalize::normalize(address),
        }
    }

    #[test]
    fn writes_header_and_rows() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("toilets_data_staged.csv");

        write_staged(&path, &[toilet("1 rue X")]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("address,schedule,accessible,latitude,longitude,address_key")
        );
        assert_eq!(lines.next(), Some("1 rue X,24 h / 24,yes,48.85,,1ruex"));
        assert!(lines.next().is_none());
        assert!(!path.with_extension("csv.tmp").exists());
    }

    #[test]
    fn replaces_previous_output() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("toilets_data_staged.csv");

        write_staged(&path, &[toilet("1 rue X"), toilet("2 rue Y")]).unwrap();
        write_staged(&path, &[toilet("3 rue Z")]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("3 rue Z"));
        assert!(!text.contains("1 rue X"));
    }

    #[test]
    fn empty_dataset_writes_header_only() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("museum_data_staged.csv");

        write_staged::<MuseumRecord>(&path, &[]).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "name,address,postal_code,latitude,longitude,address_key\n"
        );
    }
}
