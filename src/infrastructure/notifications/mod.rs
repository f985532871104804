pub mod composite;
pub mod slack;
pub mod terminal;

use crate::application::config::NotificationConfig;
use crate::domain::ports::notifier::{NotificationError, Notifier};

use self::composite::CompositeNotifier;
use self::slack::SlackNotifier;
use self::terminal::TerminalNotifier;

/// Build the notifier described by the configuration.
///
/// Slack is added only when both token and user are set; a missing
/// credential is logged, not fatal.
///
/// # Errors
///
/// Returns `NotificationError::ChannelUnavailable` if the Slack HTTP client
/// cannot be built.
pub fn create_notifier(config: &NotificationConfig) -> Result<CompositeNotifier, NotificationError> {
    let mut notifiers: Vec<Box<dyn Notifier>> = Vec::new();
    if config.terminal {
        notifiers.push(Box::new(TerminalNotifier::new()));
    }
    match config.slack.credentials() {
        Some((token, user)) => {
            notifiers.push(Box::new(SlackNotifier::new(
                &config.slack.api_url,
                token.to_string(),
                user.to_string(),
                config.slack.timeout(),
            )?));
        }
        None => {
            tracing::warn!("Slack token or user not configured, Slack notification disabled");
        }
    }
    if notifiers.is_empty() {
        tracing::warn!("No notification channel enabled, the finish will only be logged");
    }
    Ok(CompositeNotifier::new(notifiers))
}
