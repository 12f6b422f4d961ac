use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while validating a task descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error("Task descriptor is missing field: {0}")]
    MissingField(&'static str),
}

/// A validated download task.
///
/// Serializes to the wire form published on the downstream queue:
/// `{"file_id": "...", "chat_id": 42}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadTask {
    /// Opaque platform file reference, passed through untouched.
    pub file_id: String,
    /// Chat to notify.
    pub chat_id: i64,
}

impl DownloadTask {
    pub fn new(file_id: impl Into<String>, chat_id: i64) -> Self {
        Self {
            file_id: file_id.into(),
            chat_id,
        }
    }

    /// Encode as a queue message body.
    pub fn to_body(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// A task descriptor as read off the queue, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawTask {
    #[serde(default)]
    pub file_id: Option<String>,
    #[serde(default)]
    pub chat_id: Option<i64>,
}

impl RawTask {
    /// Decode a queue message body.
    pub fn parse(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    /// Check required fields. Empty `file_id` and zero `chat_id` count as missing.
    pub fn validate(self) -> Result<DownloadTask, TaskError> {
        let file_id = self
            .file_id
            .filter(|id| !id.is_empty())
            .ok_or(TaskError::MissingField("file_id"))?;
        let chat_id = self
            .chat_id
            .filter(|id| *id != 0)
            .ok_or(TaskError::MissingField("chat_id"))?;

        Ok(DownloadTask { file_id, chat_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        let task = DownloadTask::new("abc", 42);
        let body = task.to_body().unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value, serde_json::json!({"file_id": "abc", "chat_id": 42}));
    }

    #[test]
    fn test_parse_and_validate() {
        let raw = RawTask::parse(r#"{"file_id":"abc","chat_id":42}"#).unwrap();
        assert_eq!(raw.validate().unwrap(), DownloadTask::new("abc", 42));
    }

    #[test]
    fn test_missing_file_id() {
        let raw = RawTask::parse(r#"{"chat_id":42}"#).unwrap();
        assert_eq!(raw.chat_id, Some(42));
        assert_eq!(raw.validate(), Err(TaskError::MissingField("file_id")));
    }

    #[test]
    fn test_missing_chat_id() {
        let raw = RawTask::parse(r#"{"file_id":"abc"}"#).unwrap();
        assert_eq!(raw.chat_id, None);
        assert_eq!(raw.validate(), Err(TaskError::MissingField("chat_id")));
    }

    #[test]
    fn test_empty_values_count_as_missing() {
        let raw = RawTask::parse(r#"{"file_id":"","chat_id":42}"#).unwrap();
        assert_eq!(raw.validate(), Err(TaskError::MissingField("file_id")));

        let raw = RawTask::parse(r#"{"file_id":"abc","chat_id":0}"#).unwrap();
        assert_eq!(raw.validate(), Err(TaskError::MissingField("chat_id")));
    }

    #[test]
    fn test_null_fields() {
        let raw = RawTask::parse(r#"{"file_id":null,"chat_id":null}"#).unwrap();
        assert_eq!(raw, RawTask::default());
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(RawTask::parse("file_id=abc").is_err());
    }
}
