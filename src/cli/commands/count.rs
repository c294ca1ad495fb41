use anyhow::{Context, Result};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::cli::Output;
use crate::config::Settings;
use crate::dispatch::{
    ChunkPlanner, CountRequest, Strategy, UnitFailure, WorkQueueDistributor, WorkUnit,
};

/// Count `files` with the resolved settings and report failed units.
///
/// Exits with status 1 when any file (or chunk) could not be counted.
pub async fn execute(settings: Settings, files: Vec<PathBuf>, output: Output) -> Result<ExitCode> {
    let request = CountRequest::new(settings.count.mode, settings.resolved_workers(), files)?;
    output.verbose(&format!(
        "Counting {} file(s), mode {}, {} worker(s)",
        request.files.len(),
        request.metric,
        request.workers
    ));

    let failures = tokio::task::spawn_blocking(move || dispatch(&request, &settings, &output))
        .await
        .context("Counting task failed to complete")??;

    for failure in &failures {
        output.error(&format!(
            "Failed to count \"{}\": {}",
            failure.path.display(),
            failure.reason
        ));
    }

    Ok(if failures.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Blocking part: plan, print the dispatch notices, then count onto stdout
fn dispatch(request: &CountRequest, settings: &Settings, output: &Output) -> Result<Vec<UnitFailure>> {
    let multiplier = settings.pool.channel_buffer_multiplier;

    match Strategy::select(request) {
        Strategy::Queue => {
            let distributor = WorkQueueDistributor::new(multiplier);
            let plan = distributor.plan(&request.files, request.workers)?;

            output.worker_notice(plan.workers);
            if plan.queued {
                output.notice("Number of files greater than number of workers, tasks will be queued");
            }
            output.blank_line();

            let mut out = io::stdout().lock();
            let summary = distributor.run(plan, request.metric, &mut out)?;
            Ok(summary.failures)
        }
        Strategy::Chunked => {
            let planner = ChunkPlanner::new(settings.count.split, multiplier);
            let file = &request.files[0];
            let plan = match planner.plan(file, request.workers) {
                Ok(plan) => plan,
                Err(error) => {
                    let unit = WorkUnit::WholeFile { path: file.clone() };
                    return Ok(vec![UnitFailure::new(&unit, &error)]);
                }
            };

            output.worker_notice(request.workers);
            output.notice("File contents were divided between the given workers");
            output.blank_line();

            let mut out = io::stdout().lock();
            let aggregate = planner.dispatch(plan, request.metric, &mut out)?;
            Ok(aggregate.failures)
        }
    }
}
