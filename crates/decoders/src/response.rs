use serde_json::Value;

use hwbot_common::error::PollError;

/// Field of the poll response that holds the homework list.
pub const HOMEWORKS_FIELD: &str = "homeworks";

/// Validate a decoded poll response and extract its homework list.
///
/// The payload must be a JSON object whose `homeworks` field is a non-empty
/// array. Records are returned as-is, in API order.
///
/// An empty list is an error here even though it is the normal answer when
/// nothing changed since `from_date`; the poller decides how loudly to treat it.
pub fn check_response(payload: &Value) -> Result<&[Value], PollError> {
    let object = payload
        .as_object()
        .ok_or_else(|| PollError::Shape("not a mapping".to_string()))?;

    let homeworks = object
        .get(HOMEWORKS_FIELD)
        .and_then(Value::as_array)
        .ok_or_else(|| PollError::Shape("homeworks not a list".to_string()))?;

    if homeworks.is_empty() {
        return Err(PollError::EmptyList);
    }

    tracing::debug!(count = homeworks.len(), "Poll response contains homeworks");
    Ok(homeworks.as_slice())
}
