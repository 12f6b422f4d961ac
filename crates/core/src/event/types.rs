use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while decoding a trigger event.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("Event is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Event has unexpected shape: {0}")]
    InvalidShape(#[source] serde_json::Error),
}

/// A batch of queue messages delivered by a trigger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueEvent {
    #[serde(default)]
    pub messages: Vec<QueueMessage>,
}

/// One message of a trigger batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<MessageDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<MessageEnvelope>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl QueueEvent {
    /// Decode an event that may arrive either as an object or as a JSON string
    /// wrapping the object.
    pub fn from_value(value: Value) -> Result<Self, EventError> {
        match value {
            Value::String(raw) => Self::from_json(&raw),
            Value::Null => Ok(Self::default()),
            other => serde_json::from_value(other).map_err(EventError::InvalidShape),
        }
    }

    /// Decode an event from its raw JSON text.
    pub fn from_json(raw: &str) -> Result<Self, EventError> {
        let value: Value = serde_json::from_str(raw).map_err(EventError::InvalidJson)?;
        match value {
            // One level of string wrapping only.
            Value::String(inner) => serde_json::from_str(&inner).map_err(EventError::InvalidShape),
            other => Self::from_value(other),
        }
    }

    /// Wrap raw bodies into an event (test and tooling helper).
    pub fn from_bodies<I, S>(bodies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            messages: bodies.into_iter().map(QueueMessage::with_body).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl QueueMessage {
    pub fn with_body(body: impl Into<String>) -> Self {
        Self {
            details: Some(MessageDetails {
                message: Some(MessageEnvelope {
                    body: Some(body.into()),
                }),
            }),
        }
    }

    /// The message body, if present and non-empty.
    pub fn body(&self) -> Option<&str> {
        self.details
            .as_ref()?
            .message
            .as_ref()?
            .body
            .as_deref()
            .filter(|body| !body.is_empty())
    }
}
