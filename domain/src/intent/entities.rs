//! Intent entity produced by the Intent Classifier Node.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The kind of action a user message calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntentKind {
    ToolCall,
    GeneralChat,
    Help,
    ServerStatus,
    ToolList,
    Unknown,
}

impl IntentKind {
    /// Parse the classifier's fixed `INTENT:` line value. Unrecognized
    /// values fall back to `GeneralChat` per §4.4 (the caller is expected
    /// to also lower confidence in that case).
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "TOOL_CALL" => IntentKind::ToolCall,
            "GENERAL_CHAT" => IntentKind::GeneralChat,
            "HELP" => IntentKind::Help,
            "SERVER_STATUS" => IntentKind::ServerStatus,
            "TOOL_LIST" => IntentKind::ToolList,
            _ => IntentKind::Unknown,
        }
    }

    /// Whether this kind is answered directly from the Tool Registry's
    /// catalogue, bypassing an LLM call (§4.6 system information
    /// short-circuit).
    pub fn is_system_info(&self) -> bool {
        matches!(
            self,
            IntentKind::ToolList | IntentKind::ServerStatus | IntentKind::Help
        )
    }
}

/// A classified user message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    pub kind: IntentKind,
    pub confidence: f64,
    pub target_tool: Option<String>,
    pub raw_args_text: Option<String>,
    pub parameters: HashMap<String, serde_json::Value>,
}

impl Intent {
    pub fn new(kind: IntentKind, confidence: f64) -> Self {
        Self {
            kind,
            confidence: confidence.clamp(0.0, 1.0),
            target_tool: None,
            raw_args_text: None,
            parameters: HashMap::new(),
        }
    }

    pub fn general_chat(confidence: f64) -> Self {
        Self::new(IntentKind::GeneralChat, confidence)
    }

    pub fn with_target_tool(mut self, tool: impl Into<String>) -> Self {
        self.target_tool = Some(tool.into());
        self
    }

    pub fn with_raw_args_text(mut self, text: impl Into<String>) -> Self {
        self.raw_args_text = Some(text.into());
        self
    }

    pub fn with_parameters(mut self, parameters: HashMap<String, serde_json::Value>) -> Self {
        self.parameters = parameters;
        self
    }

    /// `is_mcp_action ⇔ kind = TOOL_CALL ∧ target_tool ≠ ∅`
    pub fn is_mcp_action(&self) -> bool {
        self.kind == IntentKind::ToolCall && self.target_tool.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_intent_string_parses_as_unknown() {
        assert_eq!(IntentKind::parse("FRIED_CHICKEN"), IntentKind::Unknown);
    }

    #[test]
    fn is_mcp_action_requires_target_tool() {
        let intent = Intent::new(IntentKind::ToolCall, 0.9);
        assert!(!intent.is_mcp_action());

        let intent = intent.with_target_tool("get_weather");
        assert!(intent.is_mcp_action());
    }

    #[test]
    fn system_info_kinds() {
        assert!(IntentKind::ToolList.is_system_info());
        assert!(IntentKind::ServerStatus.is_system_info());
        assert!(IntentKind::Help.is_system_info());
        assert!(!IntentKind::ToolCall.is_system_info());
        assert!(!IntentKind::GeneralChat.is_system_info());
    }

    #[test]
    fn confidence_is_clamped() {
        assert_eq!(Intent::new(IntentKind::Unknown, 5.0).confidence, 1.0);
        assert_eq!(Intent::new(IntentKind::Unknown, -2.0).confidence, 0.0);
    }
}
