use std::time::Duration;

use chrono::Utc;

use hwbot_common::config::AppConfig;
use hwbot_common::error::PollError;
use hwbot_common::types::{DeliveryStatus, PollCursor, StatusReport};
use hwbot_decoders::{check_response, parse_status};
use hwbot_engine::{ChangeDetector, ErrorDecision, StatusDecision};
use hwbot_notifier::{MessageSender, Notifier};

use crate::client::StatusSource;

/// Prefix of every failure notification.
const FAILURE_PREFIX: &str = "Сбой в работе программы";

/// Result of a single poll cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Status changed and a notification was dispatched.
    Notified(DeliveryStatus),
    /// Status is the one already announced.
    Unchanged,
    /// Empty homework list, treated as "nothing new".
    NothingNew,
    /// The cycle failed. `notified` is false when the same error was already reported.
    Failed { error: PollError, notified: bool },
}

/// Poll loop that watches one homework queue and reports status changes.
pub struct StatusPoller<C, S> {
    client: C,
    notifier: Notifier<S>,
    detector: ChangeDetector,
    cursor: PollCursor,
    retry_interval: Duration,
    empty_list_is_error: bool,
}

impl<C, S> StatusPoller<C, S>
where
    C: StatusSource,
    S: MessageSender,
{
    pub fn new(client: C, notifier: Notifier<S>, config: &AppConfig) -> Self {
        Self {
            client,
            notifier,
            detector: ChangeDetector::new(),
            cursor: Utc::now().timestamp(),
            retry_interval: config.retry_interval(),
            empty_list_is_error: config.empty_list_is_error,
        }
    }

    /// Start polling from `cursor` instead of the current time.
    pub fn with_cursor(mut self, cursor: PollCursor) -> Self {
        self.cursor = cursor;
        self
    }

    /// Run the poll loop forever, sleeping `retry_interval` after every cycle.
    pub async fn run(&mut self) {
        tracing::info!(
            from_date = self.cursor,
            retry_interval_secs = self.retry_interval.as_secs(),
            "Homework status poller started"
        );

        loop {
            let outcome = self.poll_once().await;
            tracing::debug!(?outcome, cursor = self.cursor, "Poll cycle finished");
            tokio::time::sleep(self.retry_interval).await;
        }
    }

    /// Run one fetch → validate → detect → notify cycle.
    pub async fn poll_once(&mut self) -> CycleOutcome {
        match self.check_homework().await {
            Ok(report) => {
                let outcome = match self.detector.check_status(report.status) {
                    StatusDecision::Notify => {
                        tracing::info!(
                            homework = %report.homework_name,
                            status = %report.status,
                            "Homework status changed"
                        );
                        let delivery = self.notifier.notify(&report.message).await;
                        self.detector.record_status(report.status);
                        CycleOutcome::Notified(delivery)
                    }
                    StatusDecision::Skip => CycleOutcome::Unchanged,
                };
                self.cursor = Utc::now().timestamp();
                outcome
            }
            Err(PollError::EmptyList) if !self.empty_list_is_error => {
                tracing::debug!(from_date = self.cursor, "No homework updates");
                CycleOutcome::NothingNew
            }
            Err(error) => self.handle_error(error).await,
        }
    }

    async fn check_homework(&self) -> Result<StatusReport, PollError> {
        let payload = self.client.fetch(Some(self.cursor)).await?;
        let homeworks = check_response(&payload)?;
        parse_status(&homeworks[0])
    }

    async fn handle_error(&mut self, error: PollError) -> CycleOutcome {
        let message = format!("{FAILURE_PREFIX}: {error}");
        tracing::error!(kind = error.kind(), error = %error, "Poll cycle failed");

        let notified = match self.detector.check_error(&message) {
            ErrorDecision::Notify => {
                self.notifier.notify(&message).await;
                self.detector.record_error(message);
                true
            }
            ErrorDecision::Suppress => false,
        };

        CycleOutcome::Failed { error, notified }
    }

    pub fn cursor(&self) -> PollCursor {
        self.cursor
    }

    pub fn detector(&self) -> &ChangeDetector {
        &self.detector
    }

    pub fn notifier(&self) -> &Notifier<S> {
        &self.notifier
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use serde_json::{Value, json};

    use hwbot_common::error::NotifyError;
    use hwbot_common::types::HomeworkStatus;

    use super::*;

    /// Replays a fixed sequence of fetch results and records the cursors it was asked for.
    #[derive(Default)]
    struct ScriptedSource {
        responses: Mutex<VecDeque<Result<Value, PollError>>>,
        cursors: Mutex<Vec<Option<PollCursor>>>,
    }

    impl ScriptedSource {
        fn new(responses: Vec<Result<Value, PollError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                cursors: Mutex::default(),
            }
        }
    }

    impl StatusSource for ScriptedSource {
        async fn fetch(&self, cursor: Option<PollCursor>) -> Result<Value, PollError> {
            self.cursors.lock().unwrap().push(cursor);
            // An exhausted script behaves like a gateway outage.
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(PollError::ServerUnavailable { status: 502 }))
        }
    }

    #[derive(Default)]
    struct RecordingSender {
        fail: bool,
        sent: Mutex<Vec<String>>,
    }

    impl MessageSender for RecordingSender {
        async fn send_message(&self, text: &str) -> Result<(), NotifyError> {
            self.sent.lock().unwrap().push(text.to_string());
            if self.fail {
                Err(NotifyError::Transport("telegram is down".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn test_config(empty_list_is_error: bool) -> AppConfig {
        AppConfig::from_lookup(|name| match name {
            "PRACTICUM_TOKEN" => Some("p".to_string()),
            "TELEGRAM_TOKEN" => Some("t".to_string()),
            "TELEGRAM_CHAT_ID" => Some("1".to_string()),
            "RETRY_TIME_SECS" => Some("5".to_string()),
            "EMPTY_LIST_IS_ERROR" => Some(empty_list_is_error.to_string()),
            _ => None,
        })
        .unwrap()
    }

    fn homeworks(status: &str) -> Result<Value, PollError> {
        Ok(json!({
            "homeworks": [{"homework_name": "hw05.zip", "status": status}],
            "current_date": 1700000000
        }))
    }

    fn poller(
        responses: Vec<Result<Value, PollError>>,
        sender: RecordingSender,
    ) -> StatusPoller<ScriptedSource, RecordingSender> {
        StatusPoller::new(
            ScriptedSource::new(responses),
            Notifier::new(sender),
            &test_config(true),
        )
        .with_cursor(1_000)
    }

    fn sent(poller: &StatusPoller<ScriptedSource, RecordingSender>) -> Vec<String> {
        poller.notifier().sender().sent.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn test_same_status_twice_notifies_once() {
        let mut poller = poller(
            vec![homeworks("reviewing"), homeworks("reviewing")],
            RecordingSender::default(),
        );

        assert_eq!(
            poller.poll_once().await,
            CycleOutcome::Notified(DeliveryStatus::Sent)
        );
        assert_eq!(poller.poll_once().await, CycleOutcome::Unchanged);
        assert_eq!(sent(&poller).len(), 1);
    }

    #[tokio::test]
    async fn test_status_transition_notifies_each_time() {
        let mut poller = poller(
            vec![homeworks("reviewing"), homeworks("approved")],
            RecordingSender::default(),
        );

        poller.poll_once().await;
        poller.poll_once().await;

        let messages = sent(&poller);
        assert_eq!(messages.len(), 2);
        assert_ne!(messages[0], messages[1]);
        assert!(messages[0].contains("взята на проверку"));
        assert!(messages[1].contains("ревьюеру всё понравилось"));
        assert_eq!(poller.detector().last_status(), Some(HomeworkStatus::Approved));
    }

    #[tokio::test]
    async fn test_repeated_error_notifies_once_until_it_changes() {
        let mut poller = poller(
            vec![
                Err(PollError::ServerUnavailable { status: 500 }),
                Err(PollError::ServerUnavailable { status: 500 }),
                Err(PollError::Transport("connection refused".to_string())),
            ],
            RecordingSender::default(),
        );

        assert!(matches!(
            poller.poll_once().await,
            CycleOutcome::Failed { notified: true, .. }
        ));
        assert!(matches!(
            poller.poll_once().await,
            CycleOutcome::Failed { notified: false, .. }
        ));
        assert!(matches!(
            poller.poll_once().await,
            CycleOutcome::Failed { notified: true, .. }
        ));

        let messages = sent(&poller);
        assert_eq!(messages.len(), 2);
        assert!(messages.iter().all(|m| m.starts_with("Сбой в работе программы: ")));
        assert_eq!(messages[1], "Сбой в работе программы: Сбой при запросе к API.");
    }

    #[tokio::test]
    async fn test_error_details_do_not_defeat_dedup() {
        let mut poller = poller(
            vec![
                Err(PollError::ServerUnavailable { status: 502 }),
                Err(PollError::ServerUnavailable { status: 503 }),
                Err(PollError::ServerUnavailable { status: 502 }),
                Err(PollError::MalformedPayload(
                    "expected value at line 1 column 1".to_string(),
                )),
                Err(PollError::MalformedPayload(
                    "expected value at line 2 column 1".to_string(),
                )),
            ],
            RecordingSender::default(),
        );

        for _ in 0..5 {
            poller.poll_once().await;
        }

        assert_eq!(
            sent(&poller),
            vec![
                "Сбой в работе программы: Сервер не отвечает. Попробуйте позже.".to_string(),
                "Сбой в работе программы: API вернул некорректный JSON.".to_string(),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_waits_retry_interval_between_cycles() {
        // RETRY_TIME_SECS is 5 in test_config: cycles start at t=0s, 5s, 10s, ...
        let mut poller = poller(vec![homeworks("reviewing")], RecordingSender::default());

        let elapsed = tokio::time::timeout(Duration::from_secs(11), poller.run()).await;
        assert!(elapsed.is_err(), "run() must never return on its own");

        let fetches = poller.client.cursors.lock().unwrap().len();
        assert_eq!(fetches, 3);

        // One status notification, then one for the repeated outage.
        assert_eq!(sent(&poller).len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_does_not_start_next_cycle_before_sleep_ends() {
        let mut poller = poller(vec![], RecordingSender::default());

        let _ = tokio::time::timeout(Duration::from_millis(4_999), poller.run()).await;
        assert_eq!(poller.client.cursors.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_error_leaves_cursor_untouched() {
        let mut poller = poller(
            vec![Err(PollError::EmptyList), homeworks("rejected")],
            RecordingSender::default(),
        );

        poller.poll_once().await;
        assert_eq!(poller.cursor(), 1_000);

        poller.poll_once().await;
        assert!(poller.cursor() > 1_000);

        let cursors = poller.client.cursors.lock().unwrap().clone();
        assert_eq!(cursors, vec![Some(1_000), Some(1_000)]);
    }

    #[tokio::test]
    async fn test_success_advances_cursor_even_without_notification() {
        let mut poller = poller(
            vec![homeworks("approved"), homeworks("approved")],
            RecordingSender::default(),
        );
        poller.poll_once().await;
        let first = poller.cursor();

        poller = poller.with_cursor(2_000);
        assert_eq!(poller.poll_once().await, CycleOutcome::Unchanged);
        assert!(poller.cursor() >= first);
    }

    #[tokio::test]
    async fn test_empty_list_is_reported_once() {
        let mut poller = poller(
            vec![
                Ok(json!({"homeworks": []})),
                Ok(json!({"homeworks": []})),
            ],
            RecordingSender::default(),
        );

        for _ in 0..2 {
            assert!(matches!(
                poller.poll_once().await,
                CycleOutcome::Failed {
                    error: PollError::EmptyList,
                    ..
                }
            ));
        }
        assert_eq!(
            sent(&poller),
            vec!["Сбой в работе программы: Список домашних заданий пуст.".to_string()]
        );
    }

    #[tokio::test]
    async fn test_empty_list_can_be_quiet() {
        let mut poller = StatusPoller::new(
            ScriptedSource::new(vec![Ok(json!({"homeworks": []}))]),
            Notifier::new(RecordingSender::default()),
            &test_config(false),
        )
        .with_cursor(1_000);

        assert_eq!(poller.poll_once().await, CycleOutcome::NothingNew);
        assert_eq!(poller.cursor(), 1_000);
        assert!(sent(&poller).is_empty());
    }

    #[tokio::test]
    async fn test_delivery_failure_does_not_block_bookkeeping() {
        let mut poller = poller(
            vec![
                homeworks("reviewing"),
                homeworks("reviewing"),
                Err(PollError::EmptyList),
                Err(PollError::EmptyList),
            ],
            RecordingSender {
                fail: true,
                ..Default::default()
            },
        );

        assert_eq!(
            poller.poll_once().await,
            CycleOutcome::Notified(DeliveryStatus::Failed)
        );
        assert!(poller.cursor() > 1_000);
        assert_eq!(poller.detector().last_status(), Some(HomeworkStatus::Reviewing));
        assert_eq!(poller.poll_once().await, CycleOutcome::Unchanged);

        poller.poll_once().await;
        assert!(poller.detector().last_error().is_some());
        assert!(matches!(
            poller.poll_once().await,
            CycleOutcome::Failed { notified: false, .. }
        ));

        assert_eq!(sent(&poller).len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_record_goes_through_error_path() {
        let mut poller = poller(
            vec![
                Ok(json!({"homeworks": [{"status": "approved"}]})),
                Ok(json!({"homeworks": [{"homework_name": "hw", "status": "lost"}]})),
            ],
            RecordingSender::default(),
        );

        poller.poll_once().await;
        poller.poll_once().await;

        let messages = sent(&poller);
        assert_eq!(messages.len(), 2);
        assert!(messages[0].contains("homework_name"));
        assert!(messages[1].contains("lost"));
        assert_eq!(poller.detector().last_status(), None);
    }
}
