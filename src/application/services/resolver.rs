use std::io::{BufRead, Write};

use thiserror::Error;

use crate::domain::entities::descriptor::{controlling_terminal, working_directory};
use crate::domain::entities::process::{BestEffort, MonitoredProcess, ProcessListing};
use crate::domain::ports::process_table::{ProcessTable, ProcessTableError};

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("cannot resolve pid {pid}: {reason}")]
    ResolutionFailure { pid: u32, reason: String },
    #[error("invalid selection: {0}")]
    InvalidSelection(String),
    #[error("no running process matches '{0}'")]
    NoMatch(String),
    #[error(transparent)]
    Query(#[from] ProcessTableError),
    #[error("interactive prompt failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Turns a pid, or a name plus an interactive pick, into a [`MonitoredProcess`].
pub struct ProcessResolver<'a> {
    table: &'a dyn ProcessTable,
}

impl<'a> ProcessResolver<'a> {
    #[must_use]
    pub fn new(table: &'a dyn ProcessTable) -> Self {
        Self { table }
    }

    /// Resolve a literal pid.
    ///
    /// The working directory and terminal are filled best-effort from the
    /// process's descriptor records; failing to read them is not an error.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::ResolutionFailure` if the pid is not a valid
    /// process id or no such process exists, `ResolveError::Query` if the
    /// process table cannot be read.
    pub fn resolve_by_identifier(&self, pid: u32) -> Result<MonitoredProcess, ResolveError> {
        if pid == 0 || i32::try_from(pid).is_err() {
            return Err(ResolveError::ResolutionFailure {
                pid,
                reason: "not a valid process id".into(),
            });
        }

        match self.table.find_process(pid) {
            Ok(listing) => tracing::debug!("Found {}", listing.line),
            Err(ProcessTableError::ProcessNotFound(_)) => {
                return Err(ResolveError::ResolutionFailure {
                    pid,
                    reason: "no such process".into(),
                });
            }
            Err(e) => return Err(e.into()),
        }

        let (cwd, tty) = match self.table.open_file_descriptors(pid) {
            Ok(records) => (
                BestEffort::from(
                    working_directory(&records)
                        .map(str::to_string)
                        .ok_or("no cwd descriptor"),
                ),
                BestEffort::from(
                    controlling_terminal(&records)
                        .map(str::to_string)
                        .ok_or("stdin is not a terminal"),
                ),
            ),
            Err(e) => {
                tracing::warn!("Working directory of pid {pid} unavailable: {e}");
                (
                    BestEffort::Unavailable(e.to_string()),
                    BestEffort::Unavailable(e.to_string()),
                )
            }
        };

        Ok(MonitoredProcess::new(pid, cwd, tty))
    }

    /// Resolve a name fragment by listing the matches on `output` and
    /// reading one index from `input`. Invalid input is not re-prompted.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::NoMatch` when nothing matches,
    /// `ResolveError::InvalidSelection` for a non-numeric, negative or
    /// out-of-range answer, and any error of [`Self::resolve_by_identifier`].
    pub fn resolve_by_name<R: BufRead, W: Write>(
        &self,
        pattern: &str,
        input: &mut R,
        output: &mut W,
    ) -> Result<MonitoredProcess, ResolveError> {
        let listings = self.table.list_processes()?;
        let candidates = matching(&listings, pattern);
        if candidates.is_empty() {
            return Err(ResolveError::NoMatch(pattern.to_string()));
        }

        for (i, listing) in candidates.iter().enumerate() {
            writeln!(output, "{i}: {}", listing.line)?;
        }
        writeln!(output, "\nThe correct process number:")?;
        output.flush()?;

        let mut answer = String::new();
        if input.read_line(&mut answer)? == 0 {
            return Err(ResolveError::InvalidSelection("no selection entered".into()));
        }
        let index = parse_selection(&answer, candidates.len())?;
        let pid = pid_from_line(&candidates[index].line)?;
        tracing::debug!("Selection {index} resolved to pid {pid}");

        self.resolve_by_identifier(pid)
    }
}

/// Listings whose line contains `pattern`, ignoring case, in table order.
#[must_use]
pub fn matching<'l>(listings: &'l [ProcessListing], pattern: &str) -> Vec<&'l ProcessListing> {
    let needle = pattern.to_lowercase();
    listings
        .iter()
        .filter(|l| l.line.to_lowercase().contains(&needle))
        .collect()
}

/// Validate a typed selection against a list of `count` entries.
///
/// # Errors
///
/// Returns `ResolveError::InvalidSelection` for anything but an integer
/// in `0..count`.
pub fn parse_selection(raw: &str, count: usize) -> Result<usize, ResolveError> {
    let raw = raw.trim();
    let value: i64 = raw
        .parse()
        .map_err(|_| ResolveError::InvalidSelection(format!("'{raw}' is not a number")))?;
    if value < 0 {
        return Err(ResolveError::InvalidSelection(format!(
            "{value} is negative"
        )));
    }
    usize::try_from(value)
        .ok()
        .filter(|&index| index < count)
        .ok_or_else(|| {
            ResolveError::InvalidSelection(format!("{value} is out of range 0..{count}"))
        })
}

/// The pid is the first whitespace-delimited token of a listing line.
///
/// # Errors
///
/// Returns `ResolveError::InvalidSelection` if that token is not a pid.
pub fn pid_from_line(line: &str) -> Result<u32, ResolveError> {
    let token = line.split_whitespace().next().unwrap_or_default();
    token.parse().map_err(|_| {
        ResolveError::InvalidSelection(format!("'{token}' in '{line}' is not a pid"))
    })
}
