use thiserror::Error;

/// Failures of a single poll cycle.
///
/// Every variant is recoverable: the poller turns it into a (de-duplicated)
/// chat notification and tries again after the retry interval. The display
/// text ends up in that notification, so it is written for the user and is
/// fixed per failure category: details such as the HTTP status or the decoder
/// position are carried in the fields and logged, never displayed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    #[error("Сбой при запросе к API.")]
    Transport(String),

    #[error("Сервер не отвечает. Попробуйте позже.")]
    ServerUnavailable { status: u16 },

    #[error("API вернул некорректный JSON.")]
    MalformedPayload(String),

    #[error("Некорректный ответ API: {0}")]
    Shape(String),

    #[error("Список домашних заданий пуст.")]
    EmptyList,

    #[error("Отсутствует ключ {0}")]
    MissingField(&'static str),

    #[error("Неизвестный статус: {0}")]
    UnknownStatus(String),
}

impl PollError {
    /// Short machine-friendly name, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            PollError::Transport(_) => "transport",
            PollError::ServerUnavailable { .. } => "server_unavailable",
            PollError::MalformedPayload(_) => "malformed_payload",
            PollError::Shape(_) => "shape",
            PollError::EmptyList => "empty_list",
            PollError::MissingField(_) => "missing_field",
            PollError::UnknownStatus(_) => "unknown_status",
        }
    }
}

/// Startup configuration problems. Always fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{name} must be {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Failure to deliver a chat message. Never escapes the notifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Chat backend rejected message (HTTP {status}): {description}")]
    Rejected { status: u16, description: String },
}
