//! Resolution against the live process table, using spawned `sleep` children.
#![cfg(unix)]
#![allow(clippy::expect_used)]

use std::io::Cursor;
use std::process::{Child, Command};
use std::time::Duration;

use procwatch::application::services::resolver::{ProcessResolver, ResolveError};
use procwatch::domain::ports::liveness::{LivenessProbe, ProbeError};
use procwatch::infrastructure::os::process_table::OsProcessTable;
use procwatch::infrastructure::os::signal_probe::SignalProbe;

/// Kills and reaps the child when dropped.
struct Sleeper(Child);

impl Sleeper {
    fn spawn(seconds: &str) -> Self {
        let child = Command::new("sleep")
            .arg(seconds)
            .spawn()
            .expect("spawn sleep");
        // Let exec replace the forked image before the table is read.
        std::thread::sleep(Duration::from_millis(150));
        Self(child)
    }

    fn pid(&self) -> u32 {
        self.0.id()
    }

    fn stop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

impl Drop for Sleeper {
    fn drop(&mut self) {
        self.stop();
    }
}

#[test]
fn resolve_live_child_by_pid() {
    let sleeper = Sleeper::spawn("30");
    let table = OsProcessTable::new();

    let process = ProcessResolver::new(&table)
        .resolve_by_identifier(sleeper.pid())
        .expect("resolve child");

    assert_eq!(process.pid(), sleeper.pid());
    assert!(SignalProbe::new().is_alive(&process));

    #[cfg(target_os = "linux")]
    {
        let cwd = std::env::current_dir().expect("current dir");
        assert_eq!(
            process.working_directory().as_str(),
            cwd.to_string_lossy().as_ref()
        );
    }
}

#[test]
fn probe_reports_child_gone_after_kill() {
    let mut sleeper = Sleeper::spawn("30");
    let table = OsProcessTable::new();
    let process = ProcessResolver::new(&table)
        .resolve_by_identifier(sleeper.pid())
        .expect("resolve child");

    sleeper.stop();

    assert_eq!(
        SignalProbe::new().check(&process),
        Err(ProbeError::NotRunning(sleeper.pid()))
    );
}

#[test]
fn reaped_pid_fails_resolution() {
    let mut sleeper = Sleeper::spawn("30");
    let pid = sleeper.pid();
    sleeper.stop();

    let table = OsProcessTable::new();
    let err = ProcessResolver::new(&table)
        .resolve_by_identifier(pid)
        .expect_err("dead pid should not resolve");
    assert!(matches!(err, ResolveError::ResolutionFailure { .. }));
}

#[test]
fn resolve_by_name_picks_indexed_candidate() {
    let first = Sleeper::spawn("41741");
    let second = Sleeper::spawn("41742");
    let table = OsProcessTable::new();

    let mut input = Cursor::new(b"1\n".to_vec());
    let mut output = Vec::new();
    let process = ProcessResolver::new(&table)
        .resolve_by_name("SLEEP 4174", &mut input, &mut output)
        .expect("resolve by name");

    // Candidates are listed in pid order.
    assert_eq!(process.pid(), first.pid().max(second.pid()));
    let listing = String::from_utf8(output).expect("utf8");
    assert!(listing.contains(&format!("0: {}", first.pid().min(second.pid()))));
    assert!(listing.contains("The correct process number:"));
}

#[test]
fn resolve_by_name_rejects_bad_selection() {
    let _sleeper = Sleeper::spawn("52525");
    let table = OsProcessTable::new();
    let resolver = ProcessResolver::new(&table);

    for answer in ["-1\n", "abc\n", "5\n"] {
        let mut input = Cursor::new(answer.as_bytes().to_vec());
        let mut output = Vec::new();
        let err = resolver
            .resolve_by_name("sleep 52525", &mut input, &mut output)
            .expect_err("selection should be rejected");
        assert!(
            matches!(err, ResolveError::InvalidSelection(_)),
            "{answer:?} gave {err}"
        );
    }
}

#[test]
fn resolve_by_name_without_match() {
    let table = OsProcessTable::new();
    let mut input = Cursor::new(b"0\n".to_vec());
    let mut output = Vec::new();
    let err = ProcessResolver::new(&table)
        .resolve_by_name("no-such-process-9f3c2a", &mut input, &mut output)
        .expect_err("nothing should match");
    assert!(matches!(err, ResolveError::NoMatch(_)));
}
