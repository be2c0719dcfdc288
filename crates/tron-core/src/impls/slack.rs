//! SlackNotifier - Slack `chat.postMessage` による ChatNotifier 実装
//!
//! bot token を Bearer で渡します。Slack は API エラーでも 200 を返すので、
//! レスポンスの `ok` を見て判定します。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::RemoteError;
use crate::ports::ChatNotifier;

const API_BASE: &str = "https://slack.com/api";
const SERVICE: &str = "slack";

/// Posts plain-text messages with a bot token.
pub struct SlackNotifier {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

#[derive(Debug, Serialize)]
struct PostMessage<'a> {
    channel: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct SlackResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

impl SlackNotifier {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: API_BASE.to_string(),
            token: token.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl ChatNotifier for SlackNotifier {
    fn name(&self) -> &'static str {
        SERVICE
    }

    async fn post_notification(&self, channel: &str, text: &str) -> Result<(), RemoteError> {
        let response = self
            .client
            .post(format!("{}/chat.postMessage", self.base_url))
            .bearer_auth(&self.token)
            .json(&PostMessage { channel, text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                service: SERVICE,
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        // Slack answers 200 with `ok: false` for most API-level errors.
        let body: SlackResponse = response.json().await?;
        into_result(body)?;
        debug!(channel, "slack message posted");
        Ok(())
    }
}

fn into_result(body: SlackResponse) -> Result<(), RemoteError> {
    if body.ok {
        Ok(())
    } else {
        Err(RemoteError::Api {
            service: SERVICE,
            message: body.error.unwrap_or_else(|| "unknown error".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_ok_becomes_an_api_error() {
        let body: SlackResponse =
            serde_json::from_str(r#"{"ok": false, "error": "channel_not_found"}"#).unwrap();
        let err = into_result(body).unwrap_err();
        assert_eq!(err.to_string(), "slack API error: channel_not_found");
    }

    #[test]
    fn ok_is_success() {
        let body: SlackResponse = serde_json::from_str(r#"{"ok": true, "ts": "1.2"}"#).unwrap();
        assert!(into_result(body).is_ok());
    }

    #[test]
    fn message_payload_shape() {
        let payload = serde_json::to_value(PostMessage {
            channel: "#chores",
            text: "hi",
        })
        .unwrap();
        assert_eq!(payload, serde_json::json!({"channel": "#chores", "text": "hi"}));
    }
}
