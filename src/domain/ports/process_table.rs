use thiserror::Error;

use crate::domain::entities::descriptor::DescriptorRecord;
use crate::domain::entities::process::ProcessListing;

#[derive(Error, Debug)]
pub enum ProcessTableError {
    #[error("process table query failed: {0}")]
    QueryFailure(String),
    #[error("process not found: pid {0}")]
    ProcessNotFound(u32),
}

/// Read-only access to the operating system's process table.
pub trait ProcessTable: Send + Sync {
    /// List every running process.
    ///
    /// # Errors
    ///
    /// Returns `ProcessTableError::QueryFailure` if the process table
    /// cannot be read on this platform.
    fn list_processes(&self) -> Result<Vec<ProcessListing>, ProcessTableError>;

    /// List the open descriptors of a process, including its `cwd` entry.
    ///
    /// # Errors
    ///
    /// Returns `ProcessTableError::ProcessNotFound` if the pid no longer
    /// exists, `ProcessTableError::QueryFailure` if the query itself fails.
    fn open_file_descriptors(&self, pid: u32) -> Result<Vec<DescriptorRecord>, ProcessTableError>;

    /// Look a single pid up in the process table.
    ///
    /// # Errors
    ///
    /// Returns `ProcessTableError::ProcessNotFound` if no process has that pid.
    fn find_process(&self, pid: u32) -> Result<ProcessListing, ProcessTableError>;
}
