use std::fmt;

use serde::{Deserialize, Serialize};

/// A value whose acquisition is allowed to fail without failing the
/// enclosing operation. The failure reason is kept for logging and display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BestEffort<T> {
    Resolved(T),
    Unavailable(String),
}

impl<T> BestEffort<T> {
    #[must_use]
    pub const fn as_option(&self) -> Option<&T> {
        match self {
            Self::Resolved(value) => Some(value),
            Self::Unavailable(_) => None,
        }
    }

    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

impl<T, E: fmt::Display> From<Result<T, E>> for BestEffort<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Resolved(value),
            Err(e) => Self::Unavailable(e.to_string()),
        }
    }
}

impl BestEffort<String> {
    /// The resolved string, or `""` when unavailable.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.as_option().map_or("", String::as_str)
    }
}

/// One row of the process table: the pid plus a human-readable line
/// whose first whitespace-delimited token is the pid itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessListing {
    pub pid: u32,
    pub line: String,
}

impl ProcessListing {
    #[must_use]
    pub fn new(pid: u32, name: &str, cmdline: &str) -> Self {
        let line = if cmdline.is_empty() {
            format!("{pid} {name} [{name}]")
        } else {
            format!("{pid} {name} {cmdline}")
        };
        Self { pid, line }
    }
}

/// The external process under observation.
///
/// Built once by the resolver and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoredProcess {
    pid: u32,
    working_directory: BestEffort<String>,
    controlling_terminal: BestEffort<String>,
}

impl MonitoredProcess {
    #[must_use]
    pub const fn new(
        pid: u32,
        working_directory: BestEffort<String>,
        controlling_terminal: BestEffort<String>,
    ) -> Self {
        Self {
            pid,
            working_directory,
            controlling_terminal,
        }
    }

    #[must_use]
    pub const fn pid(&self) -> u32 {
        self.pid
    }

    #[must_use]
    pub const fn working_directory(&self) -> &BestEffort<String> {
        &self.working_directory
    }

    #[must_use]
    pub const fn controlling_terminal(&self) -> &BestEffort<String> {
        &self.controlling_terminal
    }
}

impl fmt::Display for MonitoredProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pid {}", self.pid)?;
        if let Some(cwd) = self.working_directory.as_option() {
            write!(f, " (cwd {cwd})")?;
        }
        if let Some(tty) = self.controlling_terminal.as_option() {
            write!(f, " on {tty}")?;
        }
        Ok(())
    }
}
