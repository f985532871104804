use std::io::{BufRead, Write};
use std::time::Duration;

use anyhow::Context;

use crate::application::services::resolver::ProcessResolver;
use crate::application::services::watcher::{WatchReport, WatchService};
use crate::domain::ports::liveness::LivenessProbe;
use crate::domain::ports::notifier::Notifier;
use crate::domain::ports::process_table::ProcessTable;
use crate::presentation::cli::app::Target;
use crate::presentation::cli::formatters::process_fmt::{format_report, print_process};

/// Resolve the target, check it is alive, then watch it to completion.
///
/// Name searches print their candidates on `output` and read the choice
/// from `input`.
///
/// # Errors
///
/// Returns an error if the process cannot be resolved or is not running
/// when the watch starts. Problems after that point are reported, not
/// returned.
pub async fn run_watch<R: BufRead, W: Write>(
    table: &dyn ProcessTable,
    probe: &dyn LivenessProbe,
    notifier: &dyn Notifier,
    target: &Target,
    interval: Duration,
    input: &mut R,
    output: &mut W,
) -> anyhow::Result<WatchReport> {
    let resolver = ProcessResolver::new(table);
    let process = match target {
        Target::Pid(pid) => resolver.resolve_by_identifier(*pid),
        Target::Name(pattern) => resolver.resolve_by_name(pattern, input, output),
    }
    .context("Could not resolve the process to watch")?;

    probe
        .check(&process)
        .with_context(|| format!("Process {} cannot be watched", process.pid()))?;

    print_process(&process);
    tracing::info!(
        "Watching {process} every {} ms",
        interval.as_millis()
    );

    let report = WatchService::new(probe, notifier, interval)
        .run(process)
        .await;
    println!("{}", format_report(&report));
    Ok(report)
}
