use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use serde_json::Value;

use hwbot_common::config::AppConfig;
use hwbot_common::error::PollError;
use hwbot_common::types::PollCursor;

/// Source of homework status payloads.
pub trait StatusSource: Send + Sync {
    /// Fetch the raw status payload for homeworks updated since `cursor`.
    ///
    /// `None` means "since now".
    fn fetch(
        &self,
        cursor: Option<PollCursor>,
    ) -> impl Future<Output = Result<Value, PollError>> + Send;
}

/// HTTP client for the Practicum homework status endpoint.
pub struct PracticumClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl PracticumClient {
    pub fn new(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            token: token.into(),
        })
    }

    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        Self::new(
            &config.practicum_endpoint,
            &config.practicum_token,
            config.request_timeout(),
        )
    }
}

impl StatusSource for PracticumClient {
    async fn fetch(&self, cursor: Option<PollCursor>) -> Result<Value, PollError> {
        let from_date = cursor.unwrap_or_else(|| Utc::now().timestamp());

        let response = self
            .http
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, from_date, "Request to homework API failed");
                PollError::Transport(e.without_url().to_string())
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::error!(status = status.as_u16(), "Homework API is unavailable");
            return Err(PollError::ServerUnavailable {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to read homework API response body");
                PollError::Transport(e.without_url().to_string())
            })?;

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, "Homework API returned malformed JSON");
            PollError::MalformedPayload(e.to_string())
        })
    }
}
