//! The `stage` command.

use std::sync::Arc;
use std::time::Instant;

use around_me_cli_utils::{IndicatifProgress, MultiProgress};
use around_me_config::Settings;
use around_me_source::progress::ProgressCallback;
use around_me_source::registry::{all_sources, find_source};
use around_me_source::{StageOptions, stage_source};
use around_me_source_models::SourceDefinition;

/// Resolves requested source ids; an empty request means every source.
/// Unknown ids are returned separately.
fn select_sources(requested: &[String]) -> (Vec<SourceDefinition>, Vec<String>) {
    if requested.is_empty() {
        return (all_sources(), Vec::new());
    }

    let mut found = Vec::new();
    let mut unknown = Vec::new();
    for id in requested {
        match find_source(id) {
            Some(def) => found.push(def),
            None => unknown.push(id.clone()),
        }
    }
    (found, unknown)
}

/// Stages the requested sources one after another. A failing source is
/// logged and the rest still run. Returns `false` if anything failed.
pub fn run(multi: &MultiProgress, settings: &Settings, requested: &[String]) -> bool {
    let start = Instant::now();
    let (sources, unknown) = select_sources(requested);
    for id in &unknown {
        log::error!("Unknown source '{id}' (see `around_me sources`)");
    }

    let options = StageOptions::from(settings);
    let progress: Arc<dyn ProgressCallback> =
        IndicatifProgress::steps_bar(multi, "Staging", sources.len() as u64);

    let mut failed = unknown.len();
    for def in &sources {
        match stage_source(def, &options, &progress) {
            Ok(report) => log::debug!(
                "[{}] {} -> {} records",
                report.source_id,
                report.read,
                report.staged
            ),
            Err(e) => {
                log::error!("[{}] Staging failed: {e}", def.id);
                failed += 1;
            }
        }
        progress.inc(1);
    }

    progress.finish(format!(
        "Staged {} of {} sources in {:.1}s",
        sources.len() + unknown.len() - failed,
        sources.len() + unknown.len(),
        start.elapsed().as_secs_f64()
    ));

    failed == 0
}
