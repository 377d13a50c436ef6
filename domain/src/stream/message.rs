//! Stream Message: one typed progress event pushed to a session's
//! subscriber over the Stream Hub.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single event in a turn's stream, tagged by kind so a client can
/// render the ReAct loop's progress without parsing free text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamMessage {
    SessionStart {
        session_id: String,
    },
    Thinking {
        session_id: String,
        thought: String,
    },
    Acting {
        session_id: String,
        tool_name: String,
    },
    Observing {
        session_id: String,
        observation: String,
    },
    ToolCall {
        session_id: String,
        tool_name: String,
        arguments: HashMap<String, serde_json::Value>,
    },
    PartialResponse {
        session_id: String,
        delta: String,
    },
    FinalResponse {
        session_id: String,
        text: String,
    },
    Error {
        session_id: String,
        message: String,
    },
    SessionEnd {
        session_id: String,
    },
}

impl StreamMessage {
    pub fn session_id(&self) -> &str {
        match self {
            StreamMessage::SessionStart { session_id }
            | StreamMessage::Thinking { session_id, .. }
            | StreamMessage::Acting { session_id, .. }
            | StreamMessage::Observing { session_id, .. }
            | StreamMessage::ToolCall { session_id, .. }
            | StreamMessage::PartialResponse { session_id, .. }
            | StreamMessage::FinalResponse { session_id, .. }
            | StreamMessage::Error { session_id, .. }
            | StreamMessage::SessionEnd { session_id } => session_id,
        }
    }

    /// Whether this message ends the turn's stream (success or failure).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StreamMessage::FinalResponse { .. }
                | StreamMessage::Error { .. }
                | StreamMessage::SessionEnd { .. }
        )
    }

    /// Envelope timestamp, stamped at send time by the Stream Hub rather
    /// than stored on the message itself (kept out of the tagged variant so
    /// equality in tests stays on content, not wall-clock time).
    pub fn stamped(self, at: DateTime<Utc>) -> StampedStreamMessage {
        StampedStreamMessage {
            message: self,
            timestamp: at,
        }
    }
}

/// A [`StreamMessage`] with the send-time timestamp the Stream Hub attaches
/// before enqueueing to subscribers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StampedStreamMessage {
    #[serde(flatten)]
    pub message: StreamMessage,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_variants() {
        assert!(StreamMessage::FinalResponse {
            session_id: "s".into(),
            text: "done".into()
        }
        .is_terminal());
        assert!(!StreamMessage::Thinking {
            session_id: "s".into(),
            thought: "hmm".into()
        }
        .is_terminal());
    }

    #[test]
    fn session_id_accessor_covers_all_variants() {
        let msg = StreamMessage::Acting {
            session_id: "sess-42".into(),
            tool_name: "get_weather".into(),
        };
        assert_eq!(msg.session_id(), "sess-42");
    }
}
