//! Prompt-driven mode used when no subcommand is given.

use around_me_cli_utils::MultiProgress;
use around_me_config::Settings;
use dialoguer::{Input, Select};

use crate::search::{self, SearchOptions};
use crate::stage;

enum Action {
    Search,
    Stage,
}

impl Action {
    const ALL: &[Self] = &[Self::Search, Self::Stage];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Search => "Search around a street",
            Self::Stage => "Stage all datasets",
        }
    }
}

/// Asks for an action and runs it. Returns `false` if it failed.
///
/// # Errors
///
/// Returns an error if a prompt fails.
pub fn run(multi: &MultiProgress, settings: &Settings) -> Result<bool, Box<dyn std::error::Error>> {
    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();
    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Action::ALL[idx] {
        Action::Stage => Ok(stage::run(multi, settings, &[])),
        Action::Search => {
            let query: String = Input::new()
                .with_prompt("Street name")
                .interact_text()?;
            let radius: f64 = Input::new()
                .with_prompt("Radius (km)")
                .default(settings.radius_km)
                .interact_text()?;
            let options = SearchOptions {
                radius_km: radius,
                select: None,
                json: false,
            };
            search::run(settings, &query, &options)
        }
    }
}
