//! Source registry: the raw dataset definitions, embedded at compile time.
//!
//! Each `.toml` file in `packages/source/sources/` is baked into the binary
//! with [`include_str!`]. There is exactly one definition per category.

use around_me_amenity_models::Category;
use around_me_source_models::SourceDefinition;

/// TOML definitions embedded at compile time.
const SOURCE_TOMLS: &[(&str, &str)] = &[
    ("paris_streets", include_str!("../sources/paris_streets.toml")),
    ("paris_parking", include_str!("../sources/paris_parking.toml")),
    ("paris_toilets", include_str!("../sources/paris_toilets.toml")),
    ("paris_museums", include_str!("../sources/paris_museums.toml")),
    ("paris_sports", include_str!("../sources/paris_sports.toml")),
];

/// Parses a source definition from TOML text.
///
/// # Errors
///
/// Returns the TOML error message if the text is not a valid definition.
pub fn parse_source_toml(toml_str: &str) -> Result<SourceDefinition, String> {
    toml::de::from_str(toml_str).map_err(|e| e.to_string())
}

/// Returns every embedded source definition, in staging order.
///
/// # Panics
///
/// Panics if an embedded TOML file is malformed, which the tests below
/// rule out.
#[must_use]
pub fn all_sources() -> Vec<SourceDefinition> {
    SOURCE_TOMLS
        .iter()
        .map(|(name, toml)| {
            parse_source_toml(toml).unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
        })
        .collect()
}

/// Returns the definition staging the given category.
#[must_use]
pub fn source_for(category: Category) -> Option<SourceDefinition> {
    all_sources().into_iter().find(|s| s.category == category)
}

/// Returns the definition with the given id.
#[must_use]
pub fn find_source(id: &str) -> Option<SourceDefinition> {
    all_sources().into_iter().find(|s| s.id == id)
}
