use thiserror::Error;

use crate::domain::entities::process::MonitoredProcess;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// The expected way a watch ends: the process is gone.
    #[error("process is not running: pid {0}")]
    NotRunning(u32),
    /// The probe itself failed; the process state is unknown.
    #[error("liveness probe failed for pid {pid}: {reason}")]
    ProbeFailed { pid: u32, reason: String },
}

/// Non-destructive liveness check against a monitored process.
pub trait LivenessProbe: Send + Sync {
    /// Probe the process without altering its state.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::NotRunning` once the process has exited and
    /// `ProbeError::ProbeFailed` when the OS call fails for another reason.
    fn check(&self, process: &MonitoredProcess) -> Result<(), ProbeError>;

    fn is_alive(&self, process: &MonitoredProcess) -> bool {
        self.check(process).is_ok()
    }
}
