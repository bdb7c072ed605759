use std::time::Duration;

use crate::error::ConfigError;

/// Default Practicum homework status endpoint.
pub const DEFAULT_PRACTICUM_ENDPOINT: &str =
    "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Default Telegram Bot API base URL.
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Application configuration loaded from environment variables.
///
/// Built once at startup and passed by reference to the components; nothing
/// reads the environment after that.
#[derive(Clone)]
pub struct AppConfig {
    /// OAuth token for the Practicum API
    pub practicum_token: String,

    /// Telegram bot token
    pub telegram_token: String,

    /// Chat that receives the notifications
    pub telegram_chat_id: String,

    /// Homework status endpoint (overridable for testing)
    pub practicum_endpoint: String,

    /// Telegram Bot API base URL (overridable for testing)
    pub telegram_api_url: String,

    /// Pause between poll cycles in seconds (default: 600)
    pub retry_interval_secs: u64,

    /// Per-request HTTP timeout in seconds (default: 30)
    pub request_timeout_secs: u64,

    /// Whether an empty homework list is reported as an error (default: true)
    pub empty_list_is_error: bool,
}

impl AppConfig {
    /// Load configuration from environment variables, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env file");
        }

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let practicum_token = required("PRACTICUM_TOKEN")?;
        let telegram_token = required("TELEGRAM_TOKEN")?;
        let telegram_chat_id = required("TELEGRAM_CHAT_ID")?;

        let retry_interval_secs = parse_positive(
            "RETRY_TIME_SECS",
            lookup("RETRY_TIME_SECS").unwrap_or_else(|| "600".to_string()),
        )?;
        let request_timeout_secs = parse_positive(
            "REQUEST_TIMEOUT_SECS",
            lookup("REQUEST_TIMEOUT_SECS").unwrap_or_else(|| "30".to_string()),
        )?;
        let empty_list_is_error = parse_bool(
            "EMPTY_LIST_IS_ERROR",
            lookup("EMPTY_LIST_IS_ERROR").unwrap_or_else(|| "true".to_string()),
        )?;

        Ok(Self {
            practicum_token,
            telegram_token,
            telegram_chat_id,
            practicum_endpoint: lookup("PRACTICUM_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_PRACTICUM_ENDPOINT.to_string()),
            telegram_api_url: lookup("TELEGRAM_API_URL")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
            retry_interval_secs,
            request_timeout_secs,
            empty_list_is_error,
        })
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("practicum_token", &"<redacted>")
            .field("telegram_token", &"<redacted>")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .field("practicum_endpoint", &self.practicum_endpoint)
            .field("telegram_api_url", &self.telegram_api_url)
            .field("retry_interval_secs", &self.retry_interval_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("empty_list_is_error", &self.empty_list_is_error)
            .finish()
    }
}

fn parse_positive(name: &'static str, value: String) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::Invalid {
            name,
            expected: "a positive integer",
            value,
        }),
    }
}

fn parse_bool(name: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            expected: "a boolean",
            value,
        }),
    }
}
