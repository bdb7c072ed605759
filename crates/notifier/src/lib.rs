//! Chat notifications.
//!
//! `Notifier` is the only entry point the poller uses. It delivers through a
//! `MessageSender` (Telegram in production) and never fails: delivery errors
//! are logged and reported back as `DeliveryStatus::Failed`.

pub mod telegram;

use std::future::Future;

use hwbot_common::error::NotifyError;
use hwbot_common::types::DeliveryStatus;

pub use telegram::TelegramClient;

/// A chat backend that can deliver a text message to the configured chat.
pub trait MessageSender: Send + Sync {
    fn send_message(&self, text: &str) -> impl Future<Output = Result<(), NotifyError>> + Send;
}

/// Best-effort message dispatcher.
pub struct Notifier<S> {
    sender: S,
}

impl<S: MessageSender> Notifier<S> {
    pub fn new(sender: S) -> Self {
        Self { sender }
    }

    /// Deliver `message`. Errors are logged, never returned.
    pub async fn notify(&self, message: &str) -> DeliveryStatus {
        match self.sender.send_message(message).await {
            Ok(()) => {
                tracing::info!(text = message, "Notification sent");
                DeliveryStatus::Sent
            }
            Err(e) => {
                tracing::error!(error = %e, text = message, "Failed to send notification");
                DeliveryStatus::Failed
            }
        }
    }

    pub fn sender(&self) -> &S {
        &self.sender
    }
}
