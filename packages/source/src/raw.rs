//! Raw dataset readers.
//!
//! Both delimited text and `GeoJSON` feature collections are read into the
//! same shape: a list of [`RawRecord`]s whose fields are JSON values keyed
//! by column or property name. Projection into staged records happens in
//! [`crate::project`].

use std::path::Path;

use around_me_source_models::RawFormat;
use geojson::{FeatureCollection, GeoJson};
use serde_json::{Map, Value};

use crate::StagingError;

/// One row of a delimited file or one feature of a feature collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    /// Zero-based position in the source, used in error messages.
    pub index: usize,
    /// Column values or feature properties.
    pub fields: Map<String, Value>,
    /// Point geometry as `[longitude, latitude]`, for features only.
    pub geometry: Option<[f64; 2]>,
}

impl RawRecord {
    /// Returns the field rendered as text, or `None` if it is absent,
    /// null, or blank.
    #[must_use]
    pub fn text(&self, field: &str) -> Option<String> {
        value_text(self.fields.get(field)?)
    }

    /// Returns `true` if the field key is present, even if null.
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }
}

/// All records of one raw source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDataset {
    /// Header row of a delimited source; `None` for feature collections,
    /// whose properties vary per feature.
    pub columns: Option<Vec<String>>,
    /// Records in source order.
    pub records: Vec<RawRecord>,
}

impl RawDataset {
    /// Returns `true` if a delimited source has the given column. Feature
    /// collections report every column as present.
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.columns
            .as_ref()
            .is_none_or(|cols| cols.iter().any(|c| c == column))
    }
}

/// Renders a JSON value as staged text. Null and blank strings are
/// missing; numbers and booleans use their JSON spelling.
#[must_use]
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Reads a raw file from disk.
///
/// # Errors
///
/// Returns [`StagingError::MissingInput`] if the file does not exist, or a
/// parse error if its contents do not match `format`.
pub fn read_file(path: &Path, format: &RawFormat) -> Result<RawDataset, StagingError> {
    if !path.is_file() {
        return Err(StagingError::MissingInput {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read(path)?;
    log::debug!("Read {} bytes from {}", contents.len(), path.display());

    match format {
        RawFormat::Delimited { delimiter } => parse_delimited(&contents, *delimiter),
        RawFormat::FeatureCollection => {
            let text = String::from_utf8_lossy(&contents);
            parse_feature_collection(&text)
        }
    }
}

/// Parses delimited text with a header row. Header names and cell values
/// are trimmed; short rows are padded with empty cells.
///
/// # Errors
///
/// Returns [`StagingError::Csv`] on malformed input and
/// [`StagingError::InvalidDefinition`] for a non-ASCII delimiter.
pub fn parse_delimited(bytes: &[u8], delimiter: char) -> Result<RawDataset, StagingError> {
    let delimiter = u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| {
            StagingError::InvalidDefinition(format!("delimiter '{delimiter}' is not ASCII"))
        })?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().trim_start_matches('\u{feff}').to_owned())
        .collect();

    let mut records = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let row = result?;
        let mut fields = Map::new();
        for (i, header) in headers.iter().enumerate() {
            let value = row.get(i).unwrap_or("").trim().to_owned();
            fields.insert(header.clone(), Value::String(value));
        }
        records.push(RawRecord {
            index,
            fields,
            geometry: None,
        });
    }

    Ok(RawDataset {
        columns: Some(headers),
        records,
    })
}

/// Parses a `GeoJSON` `FeatureCollection`. Features with a point geometry
/// keep its first two ordinates; any other geometry is recorded as absent.
///
/// # Errors
///
/// Returns [`StagingError::GeoJson`] if the text is not a feature
/// collection.
pub fn parse_feature_collection(text: &str) -> Result<RawDataset, StagingError> {
    let geojson: GeoJson = text.parse()?;
    let collection = FeatureCollection::try_from(geojson)?;

    let records = collection
        .features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| {
            let geometry = feature.geometry.as_ref().and_then(|g| match &g.value {
                geojson::Value::Point(position) if position.len() >= 2 => {
                    Some([position[0], position[1]])
                }
                _ => None,
            });
            RawRecord {
                index,
                fields: feature.properties.unwrap_or_default(),
                geometry,
            }
        })
        .collect();

    Ok(RawDataset {
        columns: None,
        records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_semicolon_delimited_rows() {
        let data = b" ADRESSE ;HORAIRE;ACCES_PMR\n1 rue X ; 24 h / 24;Oui\n";
        let dataset = parse_delimited(data, ';').unwrap();

        assert!(dataset.has_column("ADRESSE"));
        assert!(!dataset.has_column("geo_point_2d"));
        assert_eq!(dataset.records.len(), 1);
        let record = &dataset.records[0];
        assert_eq!(record.text("ADRESSE").as_deref(), Some("1 rue X"));
        assert_eq!(record.text("HORAIRE").as_deref(), Some("24 h / 24"));
    }

    #[test]
    fn quoted_fields_keep_embedded_delimiters() {
        let data = b"typo,geo_point_2d\nRUE X,\"48.85, 2.35\"\n";
        let dataset = parse_delimited(data, ',').unwrap();
        assert_eq!(
            dataset.records[0].text("geo_point_2d").as_deref(),
            Some("48.85, 2.35")
        );
    }

    #[test]
    fn short_rows_yield_missing_fields() {
        let data = b"a;b;c\n1;2\n";
        let dataset = parse_delimited(data, ';').unwrap();
        assert!(dataset.records[0].has("c"));
        assert!(dataset.records[0].text("c").is_none());
    }

    #[test]
    fn rejects_multibyte_delimiter() {
        let err = parse_delimited(b"a\n", '§').unwrap_err();
        assert!(matches!(err, StagingError::InvalidDefinition(_)));
    }

    #[test]
    fn rejects_delimiter_outside_ascii() {
        for delimiter in ['\u{a0}', 'ç', '€'] {
            let err = parse_delimited("a\n".as_bytes(), delimiter).unwrap_err();
            assert!(matches!(err, StagingError::InvalidDefinition(_)));
        }
        assert!(parse_delimited(b"a|b\n1|2\n", '|').is_ok());
    }

    #[test]
    fn reads_feature_points_in_lon_lat_order() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [2.35, 48.85] },
                    "properties": { "l_ep_min": "Musee", "c_postal": 75004, "x": null }
                },
                {
                    "type": "Feature",
                    "geometry": null,
                    "properties": null
                }
            ]
        }"#;
        let dataset = parse_feature_collection(text).unwrap();

        assert!(dataset.columns.is_none());
        assert!(dataset.has_column("anything"));
        assert_eq!(dataset.records.len(), 2);

        let first = &dataset.records[0];
        assert_eq!(first.geometry, Some([2.35, 48.85]));
        assert_eq!(first.text("c_postal").as_deref(), Some("75004"));
        assert!(first.has("x"));
        assert!(first.text("x").is_none());

        let second = &dataset.records[1];
        assert_eq!(second.index, 1);
        assert!(second.geometry.is_none());
        assert!(second.fields.is_empty());
    }

    #[test]
    fn rejects_non_collection_geojson() {
        let text = r#"{ "type": "Point", "coordinates": [2.35, 48.85] }"#;
        assert!(matches!(
            parse_feature_collection(text),
            Err(StagingError::GeoJson(_))
        ));
    }

    #[test]
    fn missing_file_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let err = read_file(
            &tmp.path().join("absent.csv"),
            &RawFormat::Delimited { delimiter: ',' },
        )
        .unwrap_err();
        assert!(matches!(err, StagingError::MissingInput { .. }));
    }
}
