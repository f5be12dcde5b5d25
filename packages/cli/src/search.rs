//! The `search` command.

use around_me_config::Settings;
use around_me_query::translate::IdentityTranslator;
use around_me_query::{Disambiguator, PresetChoice, Query, QueryAbort, QueryEngine, ResultSet};
use dialoguer::Select;

use crate::report;

/// How to run and print one search.
pub struct SearchOptions {
    /// Search radius in kilometers.
    pub radius_km: f64,
    /// Preset candidate for an ambiguous match, 1-based.
    pub select: Option<usize>,
    /// Print JSON instead of the text report.
    pub json: bool,
}

/// Asks the user to pick a candidate, with a trailing abort entry.
struct PromptChoice;

impl Disambiguator for PromptChoice {
    fn choose(&mut self, query: &str, candidates: &[String]) -> Option<String> {
        let mut items: Vec<&str> = candidates.iter().map(String::as_str).collect();
        items.push("Abort");

        match Select::new()
            .with_prompt(format!("Did you mean one of these for '{query}'?"))
            .items(&items)
            .default(0)
            .interact()
        {
            Ok(idx) => candidates.get(idx).cloned(),
            Err(e) => {
                log::warn!("Prompt failed: {e}");
                None
            }
        }
    }
}

/// Loads the staged datasets and runs one query. Returns `false` if the
/// query was aborted.
///
/// # Errors
///
/// Returns an error if the result cannot be serialized.
pub fn run(
    settings: &Settings,
    text: &str,
    options: &SearchOptions,
) -> Result<bool, Box<dyn std::error::Error>> {
    let engine = match QueryEngine::load(settings) {
        Ok(engine) => engine,
        Err(abort) => return Ok(report_abort(&abort)),
    };

    let query = Query::new(text, options.radius_km);
    let outcome = match options.select {
        Some(n) => engine.run(&query, &mut PresetChoice(n)),
        None => engine.run(&query, &mut PromptChoice),
    };

    match outcome {
        Ok(results) => {
            print_results(&results, settings, options.json)?;
            Ok(true)
        }
        Err(abort) => Ok(report_abort(&abort)),
    }
}

fn print_results(
    results: &ResultSet<'_>,
    settings: &Settings,
    json: bool,
) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
    } else {
        print!(
            "{}",
            report::render(results, &IdentityTranslator, &settings.target_language)
        );
        log::info!("{} amenities around {}", results.total(), results.street);
    }
    Ok(())
}

fn report_abort(abort: &QueryAbort) -> bool {
    eprintln!("{abort}");
    if matches!(abort, QueryAbort::Dataset(_)) {
        eprintln!("Run `around_me stage` first.");
    }
    false
}
