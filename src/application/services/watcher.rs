use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::domain::entities::process::MonitoredProcess;
use crate::domain::ports::liveness::{LivenessProbe, ProbeError};
use crate::domain::ports::notifier::Notifier;

/// Phases of a watch. A watch only ever moves forward through these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Init,
    Polling,
    Notifying,
    Terminal,
}

impl fmt::Display for WatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Init => "init",
            Self::Polling => "polling",
            Self::Notifying => "notifying",
            Self::Terminal => "terminal",
        };
        write!(f, "{s}")
    }
}

/// Why polling stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndReason {
    /// The process no longer exists.
    Finished,
    /// The probe itself failed; the process state is unknown.
    LostTrack(String),
}

/// Summary of a completed watch.
#[derive(Debug, Clone)]
pub struct WatchReport {
    pub pid: u32,
    pub ticks: u64,
    pub reason: EndReason,
    pub message: String,
    /// `None` when the notification went out, the error text otherwise.
    pub dispatch_error: Option<String>,
    pub finished_at: DateTime<Utc>,
}

impl WatchReport {
    #[must_use]
    pub const fn delivered(&self) -> bool {
        self.dispatch_error.is_none()
    }
}

/// Message sent when the watched process is gone.
#[must_use]
pub fn finished_message(pid: u32) -> String {
    format!("Process with pid {pid} finished")
}

/// Message sent when the probe could no longer tell whether the process runs.
#[must_use]
pub fn lost_track_message(pid: u32, reason: &str) -> String {
    format!("Lost track of process with pid {pid}: {reason}")
}

/// Polls one process until it is gone, then notifies exactly once.
pub struct WatchService<'a> {
    probe: &'a dyn LivenessProbe,
    notifier: &'a dyn Notifier,
    interval: Duration,
}

impl<'a> WatchService<'a> {
    #[must_use]
    pub fn new(
        probe: &'a dyn LivenessProbe,
        notifier: &'a dyn Notifier,
        interval: Duration,
    ) -> Self {
        Self {
            probe,
            notifier,
            interval,
        }
    }

    /// Watch `process` to completion.
    ///
    /// The first liveness check happens immediately, later ones once per
    /// interval. A failed notification is logged and recorded in the
    /// report; the watch still completes.
    pub async fn run(&self, process: MonitoredProcess) -> WatchReport {
        let pid = process.pid();
        let mut state = WatchState::Init;
        let mut ticks = 0_u64;

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        advance(&mut state, WatchState::Polling, pid);

        let reason = loop {
            interval.tick().await;
            ticks += 1;
            match self.probe.check(&process) {
                Ok(()) => tracing::trace!("pid {pid} alive (tick {ticks})"),
                Err(ProbeError::NotRunning(_)) => break EndReason::Finished,
                Err(e @ ProbeError::ProbeFailed { .. }) => {
                    tracing::error!("{e}");
                    break EndReason::LostTrack(e.to_string());
                }
            }
        };

        advance(&mut state, WatchState::Notifying, pid);
        let message = match &reason {
            EndReason::Finished => finished_message(pid),
            EndReason::LostTrack(why) => lost_track_message(pid, why),
        };
        tracing::info!("{message}");

        let dispatch_error = match self.notifier.send(&message).await {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!("Notification for pid {pid} not delivered: {e}");
                Some(e.to_string())
            }
        };
        advance(&mut state, WatchState::Terminal, pid);

        WatchReport {
            pid,
            ticks,
            reason,
            message,
            dispatch_error,
            finished_at: Utc::now(),
        }
    }
}

fn advance(state: &mut WatchState, next: WatchState, pid: u32) {
    tracing::debug!("Watch of pid {pid}: {state} -> {next}");
    *state = next;
}
