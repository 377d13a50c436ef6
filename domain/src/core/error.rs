//! Host-level error types.
//!
//! `HostError` is the single error enum threaded through every port in the
//! application layer. Each variant corresponds to a row of the error table
//! in the design: what raises it, and what the caller is expected to do
//! about it. The controlling principle is that the LLM is the error handler
//! of last resort — most of these variants are meant to be rendered into an
//! observation and fed back into the ReAct loop rather than aborting a turn.

use thiserror::Error;

/// Errors raised anywhere in the host's orchestration core.
#[derive(Error, Debug)]
pub enum HostError {
    /// Startup configuration failed validation. Aborts the process.
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    /// A server-inventory entry's subprocess could not be spawned.
    #[error("failed to spawn subprocess for server '{server_id}': {source}")]
    SubprocessSpawnFailed {
        server_id: String,
        #[source]
        source: std::io::Error,
    },

    /// No server in the catalogue owns the requested tool name.
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// The coercer could not produce a typed argument bag; the raw text is
    /// preserved under the `input` key. Non-fatal by design.
    #[error("schema coercion failed for tool '{tool_name}', degraded to raw input")]
    SchemaCoercionFailed { tool_name: String },

    /// A tool call exceeded its timeout.
    #[error("tool '{tool_name}' on server '{server_id}' timed out after {timeout_ms}ms")]
    ToolTimeout {
        server_id: String,
        tool_name: String,
        timeout_ms: u64,
    },

    /// A tool call's subprocess round-trip failed for a reason other than a
    /// timeout (malformed frame, RPC error object, broken pipe).
    #[error("tool '{tool_name}' on server '{server_id}' failed: {message}")]
    ToolExecutionError {
        server_id: String,
        tool_name: String,
        message: String,
    },

    /// The owning server's subprocess is known to be down.
    #[error("server '{0}' is down")]
    SubprocessDown(String),

    /// The LLM's streaming completion was interrupted mid-turn.
    #[error("LLM stream interrupted: {0}")]
    LLMStreamInterrupted(String),

    /// The classifier's fixed-line response could not be parsed at all
    /// (distinct from a single malformed field, which just degrades).
    #[error("LLM classification response malformed: {0}")]
    LLMClassificationMalformed(String),

    /// Referenced a session id with no backing record. Callers create-on-read
    /// rather than propagate this, but it's retained for audit logging.
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// A stream subscriber's queue was full; the connection was marked
    /// inactive rather than blocking the producer.
    #[error("stream queue full for connection '{0}'")]
    StreamQueueFull(String),

    /// The turn was cancelled by the caller (e.g. transport disconnect).
    #[error("turn cancelled")]
    TurnCancelled,

    /// The stream hub has reached its connection cap.
    #[error("stream hub connection limit reached")]
    ConnectionLimitReached,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HostError {
    /// True for errors that should stop a turn outright (vs. being fed back
    /// into the ReAct loop as an observation).
    pub fn is_cancelled(&self) -> bool {
        matches!(self, HostError::TurnCancelled)
    }

    /// True for errors that abort the whole process at startup rather than
    /// being scoped to a single turn.
    pub fn is_fatal_at_startup(&self) -> bool {
        matches!(
            self,
            HostError::ConfigInvalid(_) | HostError::SubprocessSpawnFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_is_cancelled() {
        assert!(HostError::TurnCancelled.is_cancelled());
        assert!(!HostError::ToolNotFound("x".into()).is_cancelled());
    }

    #[test]
    fn config_invalid_is_fatal_at_startup() {
        assert!(HostError::ConfigInvalid("bad".into()).is_fatal_at_startup());
        assert!(!HostError::ToolNotFound("x".into()).is_fatal_at_startup());
    }

    #[test]
    fn display_includes_identifying_fields() {
        let err = HostError::ToolTimeout {
            server_id: "weather".into(),
            tool_name: "get_weather".into(),
            timeout_ms: 30_000,
        };
        let text = err.to_string();
        assert!(text.contains("get_weather"));
        assert!(text.contains("weather"));
    }
}
