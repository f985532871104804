use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::ports::notifier::{NotificationError, Notifier};

pub const DEFAULT_API_URL: &str = "https://slack.com/api";

/// Sends a direct message to a Slack user through the Web API.
///
/// Delivery is two calls: `conversations.open` resolves the user to a DM
/// channel, then `chat.postMessage` posts into it. There is no compensation
/// if the second call fails after the first succeeded.
pub struct SlackNotifier {
    api_url: String,
    token: String,
    user: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct SlackResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    channel: Option<SlackChannel>,
}

#[derive(Debug, Deserialize)]
struct SlackChannel {
    id: String,
}

impl SlackNotifier {
    /// Creates a notifier for `user`, authenticated with a bot `token`.
    ///
    /// # Errors
    ///
    /// Returns `NotificationError::ChannelUnavailable` if the HTTP client
    /// cannot be initialized (e.g. TLS backend failure).
    pub fn new(
        api_url: &str,
        token: String,
        user: String,
        timeout: Duration,
    ) -> Result<Self, NotificationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                NotificationError::ChannelUnavailable(format!("cannot build HTTP client: {e}"))
            })?;

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
            user,
            client,
        })
    }

    async fn call(&self, method: &str, payload: &Value) -> Result<SlackResponse, NotificationError> {
        let url = format!("{}/{method}", self.api_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(payload)
            .send()
            .await
            .map_err(|e| NotificationError::DispatchFailure(format!("{method}: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(NotificationError::DispatchFailure(format!(
                "{method}: HTTP {status}"
            )));
        }

        let body: SlackResponse = resp.json().await.map_err(|e| {
            NotificationError::DispatchFailure(format!("{method}: invalid response: {e}"))
        })?;
        check_ok(method, body)
    }

    /// Resolve the configured user to a direct-message channel id.
    ///
    /// # Errors
    ///
    /// Returns `NotificationError::DispatchFailure` on transport errors or
    /// when Slack rejects the call.
    pub async fn open_channel(&self) -> Result<String, NotificationError> {
        let resp = self
            .call("conversations.open", &json!({ "users": self.user }))
            .await?;
        resp.channel.map(|c| c.id).ok_or_else(|| {
            NotificationError::DispatchFailure("conversations.open: no channel in response".into())
        })
    }

    /// Post `text` into `channel`.
    ///
    /// # Errors
    ///
    /// Returns `NotificationError::DispatchFailure` on transport errors or
    /// when Slack rejects the call.
    pub async fn post_message(&self, channel: &str, text: &str) -> Result<(), NotificationError> {
        self.call(
            "chat.postMessage",
            &json!({ "channel": channel, "text": text }),
        )
        .await
        .map(|_| ())
    }
}

fn check_ok(method: &str, body: SlackResponse) -> Result<SlackResponse, NotificationError> {
    if body.ok {
        Ok(body)
    } else {
        let reason = body.error.as_deref().unwrap_or("unknown error");
        Err(NotificationError::DispatchFailure(format!(
            "{method}: {reason}"
        )))
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn send(&self, message: &str) -> Result<(), NotificationError> {
        let channel = self.open_channel().await?;
        tracing::debug!("Slack DM channel {channel} opened for {}", self.user);
        self.post_message(&channel, message).await
    }
}
