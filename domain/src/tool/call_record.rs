//! Tool Call Record: the audit trail of one dispatched tool invocation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A tool call's error, distinct from [`crate::HostError`] in that it is
/// meant to be rendered as LLM-facing observation text rather than handled
/// by the host itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallError {
    pub kind: ToolCallErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCallErrorKind {
    NotFound,
    SubprocessDown,
    Timeout,
    ExecutionError,
}

impl ToolCallError {
    pub fn new(kind: ToolCallErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ToolCallError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

/// Record of one dispatched tool call, kept for both the turn's working set
/// and for audit. Exactly one of `result`/`error` is set once `duration_ms`
/// is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRecord {
    pub server_id: String,
    pub tool_name: String,
    pub arguments: HashMap<String, serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolCallError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    pub jsonrpc_request_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsonrpc_response_text: Option<String>,
}

impl ToolCallRecord {
    pub fn success(
        server_id: impl Into<String>,
        tool_name: impl Into<String>,
        arguments: HashMap<String, serde_json::Value>,
        result: impl Into<String>,
        duration_ms: u64,
        jsonrpc_request_text: impl Into<String>,
        jsonrpc_response_text: impl Into<String>,
    ) -> Self {
        Self {
            server_id: server_id.into(),
            tool_name: tool_name.into(),
            arguments,
            result: Some(result.into()),
            error: None,
            duration_ms: Some(duration_ms),
            jsonrpc_request_text: jsonrpc_request_text.into(),
            jsonrpc_response_text: Some(jsonrpc_response_text.into()),
        }
    }

    pub fn failure(
        server_id: impl Into<String>,
        tool_name: impl Into<String>,
        arguments: HashMap<String, serde_json::Value>,
        error: ToolCallError,
        duration_ms: u64,
        jsonrpc_request_text: impl Into<String>,
        jsonrpc_response_text: Option<String>,
    ) -> Self {
        Self {
            server_id: server_id.into(),
            tool_name: tool_name.into(),
            arguments,
            result: None,
            error: Some(error),
            duration_ms: Some(duration_ms),
            jsonrpc_request_text: jsonrpc_request_text.into(),
            jsonrpc_response_text,
        }
    }

    pub fn is_successful(&self) -> bool {
        self.error.is_none() && self.result.is_some()
    }

    /// Render as `tool_name(args) → result` for inclusion in an LLM context,
    /// per the Responder Node's "general path" context assembly.
    pub fn render_summary(&self) -> String {
        let args = serde_json::to_string(&self.arguments).unwrap_or_default();
        match (&self.result, &self.error) {
            (Some(result), _) => format!("{}({}) → {}", self.tool_name, args, result),
            (None, Some(error)) => format!("{}({}) → error: {}", self.tool_name, args, error),
            (None, None) => format!("{}({}) → (pending)", self.tool_name, args),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_record_is_successful() {
        let record = ToolCallRecord::success(
            "weather-server",
            "get_weather",
            HashMap::new(),
            "sunny, 23C",
            120,
            "{}",
            "{}",
        );
        assert!(record.is_successful());
        assert!(record.render_summary().contains("sunny"));
    }

    #[test]
    fn failure_record_is_not_successful() {
        let record = ToolCallRecord::failure(
            "weather-server",
            "get_weather",
            HashMap::new(),
            ToolCallError::new(ToolCallErrorKind::Timeout, "upstream unavailable"),
            30_000,
            "{}",
            None,
        );
        assert!(!record.is_successful());
        assert!(record.render_summary().contains("upstream unavailable"));
    }
}
