use std::sync::Mutex;

use sysinfo::{Pid, Process, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};

use crate::domain::entities::descriptor::DescriptorRecord;
use crate::domain::entities::process::ProcessListing;
use crate::domain::ports::process_table::{ProcessTable, ProcessTableError};

/// Process table backed by `sysinfo` for listings and by `/proc`
/// (Linux) or `lsof` (other Unix systems) for descriptor records.
///
/// Uses `Mutex<System>` for interior mutability since the `ProcessTable`
/// trait takes `&self` but `sysinfo::System` needs `&mut self` for refresh.
pub struct OsProcessTable {
    sys: Mutex<System>,
}

impl OsProcessTable {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sys: Mutex::new(System::new()),
        }
    }

    fn with_refreshed<T>(
        &self,
        which: ProcessesToUpdate<'_>,
        f: impl FnOnce(&System) -> T,
    ) -> Result<T, ProcessTableError> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(ProcessTableError::QueryFailure(
                "process listing is not supported on this platform".into(),
            ));
        }
        let mut sys = self.sys.lock().map_err(|e| {
            ProcessTableError::QueryFailure(format!("process table lock poisoned: {e}"))
        })?;
        sys.refresh_processes_specifics(
            which,
            true,
            ProcessRefreshKind::nothing().with_cmd(UpdateKind::OnlyIfNotSet),
        );
        Ok(f(&sys))
    }
}

impl Default for OsProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

fn to_listing(pid: Pid, process: &Process) -> ProcessListing {
    let cmdline = process
        .cmd()
        .iter()
        .map(|s| s.to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join(" ");
    ProcessListing::new(pid.as_u32(), &process.name().to_string_lossy(), &cmdline)
}

impl ProcessTable for OsProcessTable {
    fn list_processes(&self) -> Result<Vec<ProcessListing>, ProcessTableError> {
        let own_pid = std::process::id();
        let mut listings = self.with_refreshed(ProcessesToUpdate::All, |sys| {
            sys.processes()
                .iter()
                // Threads show up as processes on Linux; only keep real ones.
                .filter(|(_, process)| process.thread_kind().is_none())
                .filter(|(pid, _)| pid.as_u32() != own_pid)
                .map(|(pid, process)| to_listing(*pid, process))
                .collect::<Vec<_>>()
        })?;
        listings.sort_by_key(|l| l.pid);
        Ok(listings)
    }

    fn open_file_descriptors(&self, pid: u32) -> Result<Vec<DescriptorRecord>, ProcessTableError> {
        read_descriptors(pid)
    }

    fn find_process(&self, pid: u32) -> Result<ProcessListing, ProcessTableError> {
        let target = Pid::from_u32(pid);
        self.with_refreshed(ProcessesToUpdate::Some(&[target]), |sys| {
            sys.process(target).map(|p| to_listing(target, p))
        })?
        .ok_or(ProcessTableError::ProcessNotFound(pid))
    }
}

#[cfg(target_os = "linux")]
fn read_descriptors(pid: u32) -> Result<Vec<DescriptorRecord>, ProcessTableError> {
    use std::io::ErrorKind;
    use std::path::Path;

    let base = Path::new("/proc").join(pid.to_string());
    if !base.exists() {
        return Err(ProcessTableError::ProcessNotFound(pid));
    }

    let mut records = Vec::new();
    for (label, entry) in [("cwd", "cwd"), ("rtd", "root"), ("txt", "exe")] {
        match std::fs::read_link(base.join(entry)) {
            Ok(target) => records.push(DescriptorRecord::new(
                label,
                file_kind(&base.join(entry)),
                target.to_string_lossy(),
            )),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ProcessTableError::ProcessNotFound(pid));
            }
            Err(e) => tracing::debug!("pid {pid}: cannot read {entry}: {e}"),
        }
    }

    let entries = match std::fs::read_dir(base.join("fd")) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::PermissionDenied => return Ok(records),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ProcessTableError::ProcessNotFound(pid));
        }
        Err(e) => {
            return Err(ProcessTableError::QueryFailure(format!(
                "cannot list descriptors of pid {pid}: {e}"
            )));
        }
    };

    let mut numbered: Vec<(u32, DescriptorRecord)> = entries
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let fd: u32 = entry.file_name().to_str()?.parse().ok()?;
            let target = std::fs::read_link(entry.path()).ok()?;
            Some((
                fd,
                DescriptorRecord::new(
                    fd.to_string(),
                    file_kind(&entry.path()),
                    target.to_string_lossy(),
                ),
            ))
        })
        .collect();
    numbered.sort_by_key(|(fd, _)| *fd);
    records.extend(numbered.into_iter().map(|(_, record)| record));
    Ok(records)
}

#[cfg(target_os = "linux")]
fn file_kind(path: &std::path::Path) -> &'static str {
    use std::os::unix::fs::FileTypeExt;

    match std::fs::metadata(path) {
        Ok(meta) => {
            let ft = meta.file_type();
            if ft.is_dir() {
                "DIR"
            } else if ft.is_file() {
                "REG"
            } else if ft.is_char_device() {
                "CHR"
            } else if ft.is_block_device() {
                "BLK"
            } else if ft.is_fifo() {
                "FIFO"
            } else if ft.is_socket() {
                "sock"
            } else {
                "unknown"
            }
        }
        Err(_) => "unknown",
    }
}

#[cfg(not(target_os = "linux"))]
fn read_descriptors(pid: u32) -> Result<Vec<DescriptorRecord>, ProcessTableError> {
    let output = std::process::Command::new("lsof")
        .args(["-n", "-P", "-p", &pid.to_string()])
        .output()
        .map_err(|e| ProcessTableError::QueryFailure(format!("failed to run lsof: {e}")))?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !output.status.success() {
        // lsof exits 1 with no rows when the pid does not exist.
        if stdout.trim().is_empty() && output.status.code() == Some(1) {
            return Err(ProcessTableError::ProcessNotFound(pid));
        }
        return Err(ProcessTableError::QueryFailure(format!(
            "lsof exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(parse_lsof_output(&stdout))
}

/// Parse `lsof -p` output: `COMMAND PID USER FD TYPE DEVICE SIZE/OFF NODE NAME`.
///
/// The name column may contain spaces and is rejoined. Rows with fewer
/// than nine columns carry no usable name and are skipped.
#[must_use]
pub fn parse_lsof_output(output: &str) -> Vec<DescriptorRecord> {
    output
        .lines()
        .filter(|line| !line.starts_with("COMMAND"))
        .filter_map(|line| {
            let words: Vec<&str> = line.split_whitespace().collect();
            if words.len() < 9 {
                return None;
            }
            Some(DescriptorRecord::new(
                words[3],
                words[4],
                words[8..].join(" "),
            ))
        })
        .collect()
}
