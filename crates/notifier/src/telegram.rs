//! Telegram Bot API sender (`sendMessage`).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use hwbot_common::config::AppConfig;
use hwbot_common::error::NotifyError;

use crate::MessageSender;

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    description: Option<String>,
}

/// Sends messages to a single Telegram chat.
pub struct TelegramClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
    chat_id: String,
}

impl TelegramClient {
    pub fn new(
        api_url: impl Into<String>,
        token: impl Into<String>,
        chat_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let api_url: String = api_url.into();

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.into(),
            chat_id: chat_id.into(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, NotifyError> {
        Self::new(
            &config.telegram_api_url,
            &config.telegram_token,
            &config.telegram_chat_id,
            config.request_timeout(),
        )
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_url, self.token)
    }
}

impl MessageSender for TelegramClient {
    async fn send_message(&self, text: &str) -> Result<(), NotifyError> {
        let request = SendMessageRequest {
            chat_id: &self.chat_id,
            text,
        };

        // The URL carries the bot token, so it is stripped from transport errors.
        let response = self
            .http
            .post(self.send_message_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        let body: Option<TelegramResponse> = response.json().await.ok();

        match body {
            Some(TelegramResponse { ok: true, .. }) if status.is_success() => {
                tracing::debug!(chat_id = %self.chat_id, "Telegram accepted message");
                Ok(())
            }
            Some(TelegramResponse { description, .. }) => Err(NotifyError::Rejected {
                status: status.as_u16(),
                description: description.unwrap_or_else(|| "no description".to_string()),
            }),
            None => Err(NotifyError::Rejected {
                status: status.as_u16(),
                description: "unreadable response body".to_string(),
            }),
        }
    }
}
