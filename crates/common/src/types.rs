use serde::{Deserialize, Serialize};

/// Review status of a homework submission, as reported by the Practicum API.
///
/// This is the whole status catalog: every code the bot understands maps to
/// exactly one variant, and every variant carries its verdict text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    /// All known statuses, in catalog order.
    pub const ALL: [HomeworkStatus; 3] = [
        HomeworkStatus::Approved,
        HomeworkStatus::Reviewing,
        HomeworkStatus::Rejected,
    ];

    /// Look up a status by its API code. Returns `None` for unknown codes.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "approved" => Some(HomeworkStatus::Approved),
            "reviewing" => Some(HomeworkStatus::Reviewing),
            "rejected" => Some(HomeworkStatus::Rejected),
            _ => None,
        }
    }

    /// The API code for this status.
    pub fn code(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "approved",
            HomeworkStatus::Reviewing => "reviewing",
            HomeworkStatus::Rejected => "rejected",
        }
    }

    /// Human-readable verdict sent to the user.
    pub fn verdict(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            HomeworkStatus::Reviewing => "Работа взята на проверку ревьюером.",
            HomeworkStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl std::fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A single homework entry from the `homeworks` list of a poll response.
///
/// Only the two fields the bot needs are kept; the API sends more.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HomeworkRecord {
    pub homework_name: String,
    pub status: String,
}

/// Result of extracting a status from a homework record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub homework_name: String,
    pub status: HomeworkStatus,
    /// Message ready for delivery to the chat.
    pub message: String,
}

/// Outcome of a single notification dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    Sent,
    Failed,
}

impl std::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryStatus::Sent => write!(f, "sent"),
            DeliveryStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Lower bound (unix seconds) for the `from_date` filter of the next poll.
pub type PollCursor = i64;
