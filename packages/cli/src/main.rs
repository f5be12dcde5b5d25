#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point: stage the raw civic datasets, then search
//! for amenities around a street.
//!
//! Without a subcommand the tool asks what to do.

mod interactive;
mod report;
mod search;
mod stage;

use std::path::PathBuf;

use around_me_config::Settings;
use around_me_source::registry::all_sources;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "around_me", about = "Find amenities around a Paris street")]
struct Cli {
    /// Settings file (defaults to `around_me.toml` in the working directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Stage raw datasets into the canonical staged files
    Stage {
        /// Source identifier to stage (repeatable; defaults to all)
        #[arg(long = "source")]
        sources: Vec<String>,
    },
    /// List the embedded source definitions
    Sources,
    /// Search for amenities around a street
    Search {
        /// Street name, e.g. "AVENUE DES CHAMPS ELYSEES"
        query: String,
        /// Search radius in kilometers (defaults to the configured radius)
        #[arg(long)]
        radius: Option<f64>,
        /// Pick the n-th candidate of an ambiguous match (1-based, 0 aborts)
        #[arg(long)]
        select: Option<usize>,
        /// Print the result set as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = around_me_cli_utils::init_logger();
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    let succeeded = match cli.command {
        None => interactive::run(&multi, &settings)?,
        Some(Commands::Sources) => {
            println!("{:<16} {:<8} {:<24} NAME", "ID", "CATEGORY", "RAW FILE");
            println!("{}", "-".repeat(80));
            for source in all_sources() {
                println!(
                    "{:<16} {:<8} {:<24} {}",
                    source.id(),
                    source.category,
                    source.raw_file,
                    source.name()
                );
            }
            true
        }
        Some(Commands::Stage { sources }) => stage::run(&multi, &settings, &sources),
        Some(Commands::Search {
            query,
            radius,
            select,
            json,
        }) => {
            let options = search::SearchOptions {
                radius_km: radius.unwrap_or(settings.radius_km),
                select,
                json,
            };
            search::run(&settings, &query, &options)?
        }
    };

    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}
