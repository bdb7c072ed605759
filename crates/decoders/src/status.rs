use serde::Deserialize;
use serde_json::Value;

use hwbot_common::error::PollError;
use hwbot_common::types::{HomeworkRecord, HomeworkStatus, StatusReport};

/// Extract the required fields of a raw homework record.
///
/// Fails with `MissingField` if either `homework_name` or `status` is absent,
/// and with `Shape` if one of them is present but not a string.
pub fn parse_record(raw: &Value) -> Result<HomeworkRecord, PollError> {
    for field in ["homework_name", "status"] {
        if matches!(raw.get(field), None | Some(Value::Null)) {
            return Err(PollError::MissingField(field));
        }
    }

    HomeworkRecord::deserialize(raw).map_err(|e| {
        tracing::error!(error = %e, "Homework record has unexpected field types");
        PollError::Shape("homework_name/status is not a string".to_string())
    })
}

/// Turn a raw homework record into a status report with a ready-to-send message.
pub fn parse_status(raw: &Value) -> Result<StatusReport, PollError> {
    let record = parse_record(raw)?;

    let Some(status) = HomeworkStatus::from_code(&record.status) else {
        tracing::error!(
            homework = %record.homework_name,
            status = %record.status,
            "Unknown homework status"
        );
        return Err(PollError::UnknownStatus(record.status));
    };

    let message = status_message(&record.homework_name, status);
    Ok(StatusReport {
        homework_name: record.homework_name,
        status,
        message,
    })
}

/// Chat message announcing a homework's new status.
pub fn status_message(homework_name: &str, status: HomeworkStatus) -> String {
    format!(
        "Изменился статус проверки работы \"{}\". {}",
        homework_name,
        status.verdict()
    )
}
