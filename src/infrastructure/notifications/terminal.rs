use std::borrow::Cow;

use async_trait::async_trait;
use colored::Colorize;

use crate::domain::ports::notifier::{NotificationError, Notifier};

/// Prints the notification on standard output.
pub struct TerminalNotifier;

impl TerminalNotifier {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for TerminalNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for TerminalNotifier {
    async fn send(&self, message: &str) -> Result<(), NotificationError> {
        let time = chrono::Local::now().format("%H:%M:%S").to_string();
        println!("{}", format_line(message, &time));
        Ok(())
    }
}

fn format_line(message: &str, time: &str) -> String {
    format!(
        "{} {} {}",
        format!("[{time}]").as_str().dimmed(),
        "\u{1f514}".bold(),
        sanitize(message).as_ref().bold()
    )
}

/// Strip C0/C1 control characters so a message cannot smuggle escape
/// sequences into the terminal.
fn sanitize(s: &str) -> Cow<'_, str> {
    if s.chars().any(is_control) {
        Cow::Owned(s.chars().filter(|&c| !is_control(c)).collect())
    } else {
        Cow::Borrowed(s)
    }
}

const fn is_control(c: char) -> bool {
    matches!(c as u32, 0x00..=0x08 | 0x0B..=0x0C | 0x0E..=0x1F | 0x7F..=0x9F)
}
