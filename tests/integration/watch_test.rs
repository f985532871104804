//! End-to-end watches of real child processes.
#![cfg(unix)]
#![allow(clippy::expect_used)]

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::Instant;

use procwatch::application::services::resolver::ProcessResolver;
use procwatch::application::services::watcher::{EndReason, WatchService};
use procwatch::domain::ports::liveness::LivenessProbe;
use procwatch::domain::ports::notifier::{NotificationError, Notifier};
use procwatch::infrastructure::os::process_table::OsProcessTable;
use procwatch::infrastructure::os::signal_probe::SignalProbe;

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<(Instant, String)>>,
}

impl RecordingNotifier {
    fn sent(&self) -> Vec<(Instant, String)> {
        self.sent.lock().expect("lock").clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: &str) -> Result<(), NotificationError> {
        self.sent
            .lock()
            .expect("lock")
            .push((Instant::now(), message.to_string()));
        Ok(())
    }
}

#[tokio::test]
async fn killed_child_is_reported_once_and_promptly() {
    let mut child = Command::new("sleep").arg("30").spawn().expect("spawn sleep");
    let pid = child.id().expect("child pid");

    let table = OsProcessTable::new();
    let process = ProcessResolver::new(&table)
        .resolve_by_identifier(pid)
        .expect("resolve child");
    let probe = SignalProbe::new();
    assert!(probe.is_alive(&process));

    let killer = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        child.kill().await.expect("kill child");
        Instant::now()
    });

    let notifier = RecordingNotifier::default();
    let report = WatchService::new(&probe, &notifier, Duration::from_millis(50))
        .run(process)
        .await;
    let killed_at = killer.await.expect("killer task");

    assert_eq!(report.reason, EndReason::Finished);
    assert!(report.delivered());
    assert!(report.ticks >= 2);

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    let (sent_at, message) = &sent[0];
    assert!(message.contains(&pid.to_string()));
    assert!(
        sent_at.duration_since(killed_at) <= Duration::from_millis(250),
        "notified {:?} after exit",
        sent_at.duration_since(killed_at)
    );
}

#[tokio::test]
async fn child_exiting_on_its_own_is_reported() {
    let mut child = Command::new("sleep").arg("0.2").spawn().expect("spawn sleep");
    let pid = child.id().expect("child pid");

    let table = OsProcessTable::new();
    let process = ProcessResolver::new(&table)
        .resolve_by_identifier(pid)
        .expect("resolve child");

    let reaper = tokio::spawn(async move { child.wait().await.expect("wait child") });

    let probe = SignalProbe::new();
    let notifier = RecordingNotifier::default();
    let report = WatchService::new(&probe, &notifier, Duration::from_millis(20))
        .run(process)
        .await;
    reaper.await.expect("reaper task");

    assert_eq!(report.pid, pid);
    assert_eq!(report.message, format!("Process with pid {pid} finished"));
    assert_eq!(notifier.sent().len(), 1);
}
