use serde::{Deserialize, Serialize};

/// Label of the descriptor record pointing at the current working directory.
pub const CWD_LABEL: &str = "cwd";

/// An open file descriptor of a process, in the shape `lsof` reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorRecord {
    /// Descriptor label: a number with an optional access mode (`0u`, `3r`)
    /// or a special name (`cwd`, `rtd`, `txt`).
    pub fd: String,
    /// File type (`DIR`, `REG`, `CHR`, `FIFO`, `sock`, ...).
    pub kind: String,
    pub name: String,
}

impl DescriptorRecord {
    #[must_use]
    pub fn new(fd: impl Into<String>, kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            fd: fd.into(),
            kind: kind.into(),
            name: name.into(),
        }
    }

    #[must_use]
    pub fn is_cwd(&self) -> bool {
        self.fd == CWD_LABEL
    }

    /// Numeric descriptor, ignoring the trailing access-mode letters.
    #[must_use]
    pub fn number(&self) -> Option<u32> {
        let digits = self.fd.trim_end_matches(|c: char| c.is_ascii_alphabetic());
        digits.parse().ok()
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.name.starts_with("/dev/pts/")
            || self.name.starts_with("/dev/tty")
            || self.name == "/dev/console"
    }
}

/// Finds the working directory among a process's descriptor records.
#[must_use]
pub fn working_directory(records: &[DescriptorRecord]) -> Option<&str> {
    records
        .iter()
        .find(|r| r.is_cwd())
        .map(|r| r.name.trim())
        .filter(|name| !name.is_empty())
}

/// Finds the controlling terminal: the device behind standard input.
#[must_use]
pub fn controlling_terminal(records: &[DescriptorRecord]) -> Option<&str> {
    records
        .iter()
        .find(|r| r.number() == Some(0) && r.is_terminal())
        .map(|r| r.name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<DescriptorRecord> {
        vec![
            DescriptorRecord::new("cwd", "DIR", "/home/dev/project dir"),
            DescriptorRecord::new("txt", "REG", "/usr/bin/sleep"),
            DescriptorRecord::new("0u", "CHR", "/dev/pts/4"),
            DescriptorRecord::new("1u", "CHR", "/dev/pts/4"),
            DescriptorRecord::new("3r", "REG", "/etc/passwd"),
        ]
    }

    #[test]
    fn finds_working_directory_with_spaces() {
        assert_eq!(working_directory(&records()), Some("/home/dev/project dir"));
    }

    #[test]
    fn missing_cwd_yields_none() {
        let only_fds = vec![DescriptorRecord::new("0u", "CHR", "/dev/null")];
        assert_eq!(working_directory(&only_fds), None);
    }

    #[test]
    fn number_strips_access_mode() {
        assert_eq!(DescriptorRecord::new("12w", "REG", "x").number(), Some(12));
        assert_eq!(DescriptorRecord::new("0", "CHR", "x").number(), Some(0));
        assert_eq!(DescriptorRecord::new("cwd", "DIR", "x").number(), None);
    }

    #[test]
    fn finds_controlling_terminal_on_stdin() {
        assert_eq!(controlling_terminal(&records()), Some("/dev/pts/4"));
    }

    #[test]
    fn stdin_redirected_from_file_has_no_terminal() {
        let piped = vec![DescriptorRecord::new("0r", "REG", "/tmp/input.txt")];
        assert_eq!(controlling_terminal(&piped), None);
    }
}
