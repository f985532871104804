use colored::Colorize;

use crate::application::services::watcher::{EndReason, WatchReport};
use crate::domain::entities::process::{BestEffort, MonitoredProcess};

pub fn print_section_header(title: &str) {
    println!("{}", title.bold().cyan());
    let display_width = title.chars().count();
    println!("{}", "─".repeat(display_width).cyan());
}

/// Labelled detail lines for a resolved process.
#[must_use]
pub fn format_process(process: &MonitoredProcess) -> Vec<String> {
    vec![
        format!("  {}: {}", "PID".bold(), process.pid()),
        format!(
            "  {}: {}",
            "Working directory".bold(),
            describe(process.working_directory())
        ),
        format!(
            "  {}: {}",
            "Terminal".bold(),
            describe(process.controlling_terminal())
        ),
    ]
}

pub fn print_process(process: &MonitoredProcess) {
    print_section_header("Watching process");
    for line in format_process(process) {
        println!("{line}");
    }
}

/// One-line outcome of a watch.
#[must_use]
pub fn format_report(report: &WatchReport) -> String {
    let mark = match report.reason {
        EndReason::Finished => "✓".green().bold(),
        EndReason::LostTrack(_) => "!".yellow().bold(),
    };
    let delivery = match &report.dispatch_error {
        None => "notified".green().to_string(),
        Some(e) => format!("{} ({e})", "notification failed".red()),
    };
    format!(
        "{mark} {} after {} check(s) at {}, {delivery}",
        report.message,
        report.ticks,
        report.finished_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
}

fn describe(field: &BestEffort<String>) -> String {
    match field {
        BestEffort::Resolved(value) => value.clone(),
        BestEffort::Unavailable(reason) => format!("{} ({reason})", "unavailable".dimmed()),
    }
}
