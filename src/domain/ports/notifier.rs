use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("failed to deliver notification: {0}")]
    DispatchFailure(String),
    #[error("notification channel unavailable: {0}")]
    ChannelUnavailable(String),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a single text message. One attempt, no retry.
    ///
    /// # Errors
    ///
    /// Returns `NotificationError` if the message could not be delivered
    /// or the channel is unavailable.
    async fn send(&self, message: &str) -> Result<(), NotificationError>;
}
