//! Text report of a result set.

use std::fmt::Write as _;

use around_me_query::ResultSet;
use around_me_query::describe::{describe_amenity, describe_street};
use around_me_query::translate::Translator;

/// Renders the street section followed by one section per amenity
/// category.
pub fn render(results: &ResultSet<'_>, translator: &dyn Translator, target_language: &str) -> String {
    let mut out = format!("=== {} ===\n", results.street);
    for street in &results.streets {
        out.push_str(&describe_street(street, translator, target_language));
        out.push('\n');
    }

    for (category, found) in &results.per_category {
        let _ = writeln!(out, "--- {} ---", category.label());
        if found.is_empty() {
            let _ = writeln!(
                out,
                "No {} found within {} km.\n",
                category.label().to_lowercase(),
                results.radius_km
            );
            continue;
        }
        for nearby in found {
            out.push_str(&describe_amenity(nearby.record));
            let _ = writeln!(out, "Distance: {} km\n", nearby.distance_km);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use around_me_amenity_models::{
        AmenityRecord, Category, Coordinates, Flag, NOT_SPECIFIED, StreetRecord, ToiletRecord,
    };
    use around_me_query::translate::IdentityTranslator;
    use around_me_spatial::Nearby;

    use super::*;

    fn street() -> StreetRecord {
        StreetRecord {
            label: "RUE DE RIVOLI".to_string(),
            original_name: "Bataille de Rivoli".to_string(),
            history: NOT_SPECIFIED.to_string(),
            road_type: "rue".to_string(),
            district: "1er Arrdt".to_string(),
            neighborhood: "Halles".to_string(),
            length_m: None,
            width_m: None,
            latitude: Some(48.8606),
            longitude: Some(2.3376),
            street_type_key: "ruerivoli".to_string(),
        }
    }

    #[test]
    fn renders_sections_and_empty_categories() {
        let street = street();
        let toilet = AmenityRecord::from(ToiletRecord {
            address: "10 rue de Rivoli".to_string(),
            schedule: "24 h / 24".to_string(),
            accessible: Flag::Yes,
            latitude: Some(48.8606),
            longitude: Some(2.3376),
            address_key: "10ruerivoli".to_string(),
        });

        let mut per_category = BTreeMap::new();
        for category in Category::AMENITIES {
            per_category.insert(*category, Vec::new());
        }
        per_category.insert(
            Category::Toilet,
            vec![Nearby {
                record: &toilet,
                distance_km: 0,
            }],
        );

        let results = ResultSet {
            query: "rue de rivoli".to_string(),
            street: "RUE DE RIVOLI".to_string(),
            streets: vec![&street],
            center: Coordinates {
                latitude: 48.8606,
                longitude: 2.3376,
            },
            radius_km: 1.0,
            per_category,
        };

        let text = render(&results, &IdentityTranslator, "en");
        assert!(text.starts_with("=== RUE DE RIVOLI ===\nHistorical name: not specified\n"));
        assert!(text.contains("--- Parking ---\nNo parking found within 1 km.\n"));
        assert!(text.contains(
            "--- Public Toilets ---\nAddress: 10 rue de Rivoli\n\
             Accessible for disabled persons: yes\nOpening hours: 24 h / 24\nDistance: 0 km\n"
        ));
        assert!(text.contains("No sports facilities found within 1 km."));
    }
}
