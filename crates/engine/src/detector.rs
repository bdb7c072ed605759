//! Change detector: decides whether a poll result deserves a notification.
//!
//! The bot must tell the user about every status transition exactly once and
//! about every distinct failure exactly once, no matter how many consecutive
//! cycles report the same thing.
//!
//! State is held in memory only. After a restart the first observed status is
//! announced again, which is the conservative choice for a single user.

use hwbot_common::types::HomeworkStatus;

/// What to do with a freshly extracted status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusDecision {
    /// Status differs from the last notified one.
    Notify,
    /// Same as last time; stay quiet.
    Skip,
}

/// What to do with a failure message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorDecision {
    Notify,
    Suppress,
}

/// Remembers the last notified status and the last notified error message.
#[derive(Debug, Default)]
pub struct ChangeDetector {
    last_status: Option<HomeworkStatus>,
    last_error: Option<String>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare `status` with the last notified status.
    pub fn check_status(&self, status: HomeworkStatus) -> StatusDecision {
        if self.last_status == Some(status) {
            tracing::debug!(status = %status, "Homework status unchanged");
            StatusDecision::Skip
        } else {
            StatusDecision::Notify
        }
    }

    /// Remember `status` as notified.
    ///
    /// Called after every dispatch attempt, whether or not delivery succeeded.
    pub fn record_status(&mut self, status: HomeworkStatus) {
        self.last_status = Some(status);
    }

    /// Compare a failure message with the last notified one.
    pub fn check_error(&self, message: &str) -> ErrorDecision {
        if self.last_error.as_deref() == Some(message) {
            tracing::debug!(error_message = message, "Error already reported, suppressing");
            ErrorDecision::Suppress
        } else {
            ErrorDecision::Notify
        }
    }

    /// Remember `message` as notified.
    pub fn record_error(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    pub fn last_status(&self) -> Option<HomeworkStatus> {
        self.last_status
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
