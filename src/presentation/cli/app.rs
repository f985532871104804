use clap::{ArgGroup, Parser};
use std::path::PathBuf;

/// procwatch: get notified when a running process finishes
///
/// Attaches to an existing process, by pid or by picking it from a name
/// search, polls it until it exits and then sends one notification to the
/// terminal and, when configured, a Slack direct message.
#[derive(Parser, Debug)]
#[command(name = "procwatch")]
#[command(version, about, long_about)]
#[command(group(ArgGroup::new("target").required(true).args(["pid", "name"])))]
pub struct Cli {
    /// Process ID to watch
    #[arg(short, long)]
    pub pid: Option<u32>,

    /// Case-insensitive fragment of the process name or command line
    #[arg(short, long)]
    pub name: Option<String>,

    /// Polling interval in milliseconds (default: config, 100)
    #[arg(short, long, value_name = "MS")]
    pub interval: Option<u64>,

    /// Slack bot token
    #[arg(long, env = "SLACK_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Slack user ID to message
    #[arg(long, env = "SLACK_USER")]
    pub user: Option<String>,

    /// Path to custom config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// How the process to watch is designated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Pid(u32),
    Name(String),
}

impl Cli {
    /// The designated process; `None` only if neither flag was given,
    /// which clap already rejects.
    #[must_use]
    pub fn target(&self) -> Option<Target> {
        self.pid
            .map(Target::Pid)
            .or_else(|| self.name.clone().map(Target::Name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap_or_else(|e| panic!("{e}"))
    }

    #[test]
    fn parse_pid() {
        let cli = parse(&["procwatch", "--pid", "4242"]);
        assert_eq!(cli.target(), Some(Target::Pid(4242)));
        assert!(cli.interval.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn parse_name_short() {
        let cli = parse(&["procwatch", "-n", "cargo"]);
        assert_eq!(cli.target(), Some(Target::Name("cargo".into())));
    }

    #[test]
    fn parse_interval_and_config() {
        let cli = parse(&["procwatch", "-p", "1", "-i", "250", "-c", "/tmp/pw.toml", "-v"]);
        assert_eq!(cli.interval, Some(250));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/pw.toml")));
        assert!(cli.verbose);
    }

    #[test]
    fn parse_slack_flags() {
        let cli = parse(&["procwatch", "-p", "1", "--token", "xoxb-1", "--user", "U1"]);
        assert_eq!(cli.token.as_deref(), Some("xoxb-1"));
        assert_eq!(cli.user.as_deref(), Some("U1"));
    }

    #[test]
    fn target_is_required() {
        assert!(Cli::try_parse_from(["procwatch"]).is_err());
        assert!(Cli::try_parse_from(["procwatch", "-v"]).is_err());
    }

    #[test]
    fn pid_and_name_are_exclusive() {
        assert!(Cli::try_parse_from(["procwatch", "-p", "1", "-n", "sleep"]).is_err());
    }

    #[test]
    fn negative_pid_is_rejected() {
        assert!(Cli::try_parse_from(["procwatch", "-p", "-5"]).is_err());
    }

    #[test]
    fn non_numeric_interval_is_rejected() {
        assert!(Cli::try_parse_from(["procwatch", "-p", "1", "-i", "fast"]).is_err());
    }
}
