#![allow(clippy::module_name_repetitions)]
//! Canonical file paths inside the data directory.

use std::path::{Path, PathBuf};

use around_me_amenity_models::Category;

/// Settings file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "around_me.toml";

/// Returns the path of a raw input file.
#[must_use]
pub fn raw_path(data_dir: &Path, file_name: &str) -> PathBuf {
    data_dir.join(file_name)
}

/// Returns the path of a category's staged dataset
/// (e.g. `data/toilets_data_staged.csv`).
#[must_use]
pub fn staged_path(data_dir: &Path, category: Category) -> PathBuf {
    data_dir.join(format!("{}_data_staged.csv", category.file_stem()))
}

/// Ensures a directory exists, creating it if necessary.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
