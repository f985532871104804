use nix::errno::Errno;
use nix::sys::signal;
use nix::unistd::Pid;

use crate::domain::entities::process::MonitoredProcess;
use crate::domain::ports::liveness::{LivenessProbe, ProbeError};

/// Liveness probe using `kill(pid, 0)`: error checking only, no signal
/// is delivered to the target.
pub struct SignalProbe;

impl SignalProbe {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for SignalProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl LivenessProbe for SignalProbe {
    fn check(&self, process: &MonitoredProcess) -> Result<(), ProbeError> {
        let pid = process.pid();
        // PID 0 addresses the whole process group.
        if pid == 0 {
            return Err(ProbeError::ProbeFailed {
                pid,
                reason: "cannot probe PID 0 (process group)".into(),
            });
        }
        let raw = i32::try_from(pid).map_err(|_| ProbeError::ProbeFailed {
            pid,
            reason: format!("invalid pid: {pid}"),
        })?;

        match signal::kill(Pid::from_raw(raw), None) {
            Ok(()) => {}
            Err(Errno::ESRCH) => return Err(ProbeError::NotRunning(pid)),
            Err(Errno::EPERM) => {
                // Owned by another user, but it exists.
                tracing::debug!("pid {pid}: signal 0 denied, process still exists");
            }
            Err(other) => {
                return Err(ProbeError::ProbeFailed {
                    pid,
                    reason: other.to_string(),
                });
            }
        }

        if is_zombie(pid) {
            return Err(ProbeError::NotRunning(pid));
        }
        Ok(())
    }
}

/// A zombie still answers signal 0 until its parent reaps it.
#[cfg(target_os = "linux")]
fn is_zombie(pid: u32) -> bool {
    std::fs::read_to_string(format!("/proc/{pid}/stat"))
        .ok()
        .and_then(|stat| parse_stat_state(&stat))
        == Some('Z')
}

#[cfg(not(target_os = "linux"))]
const fn is_zombie(_pid: u32) -> bool {
    false
}

/// Extract the state letter from `/proc/<pid>/stat`. The command name is
/// parenthesised and may itself contain `)`, so split on the last one.
#[cfg(any(target_os = "linux", test))]
fn parse_stat_state(stat: &str) -> Option<char> {
    let (_, rest) = stat.rsplit_once(')')?;
    rest.trim_start().chars().next()
}
