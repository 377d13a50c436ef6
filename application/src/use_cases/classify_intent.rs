//! Intent Classifier Node (§4.4).

use super::shared::requires_react_mode;
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::tool_registry::ToolRegistryPort;
use mcphost_domain::{HostError, Intent, IntentKind, NextStep, TurnState};
use std::sync::Arc;
use tracing::warn;

const DEFAULT_CONFIDENCE: f64 = 0.5;
const MALFORMED_CONFIDENCE: f64 = 0.3;

pub struct IntentClassifierNode<G: LlmGateway> {
    gateway: Arc<G>,
    model: String,
}

impl<G: LlmGateway> IntentClassifierNode<G> {
    pub fn new(gateway: Arc<G>, model: impl Into<String>) -> Self {
        Self {
            gateway,
            model: model.into(),
        }
    }

    /// Run the complexity gate and, if it doesn't fire, a single classifier
    /// LLM call. Always leaves `turn.intent` set and `turn.next_step`
    /// pointing at `tool_call`, `respond`, or `react_think`.
    pub async fn classify(
        &self,
        turn: &mut TurnState,
        registry: &dyn ToolRegistryPort,
    ) -> Result<(), HostError> {
        if requires_react_mode(&turn.current_message) {
            turn.intent = Some(Intent::new(IntentKind::ToolCall, 1.0));
            turn.advance_to(NextStep::ReactThink);
            return Ok(());
        }

        let catalogue = registry.catalogue();
        let system_prompt = build_system_prompt(&catalogue);

        let session = self
            .gateway
            .create_session_with_system_prompt(&self.model, &system_prompt)
            .await
            .map_err(|_| HostError::LLMClassificationMalformed)?;

        let raw = session
            .send(&turn.current_message)
            .await
            .unwrap_or_default();

        let mut intent = parse_classification(&raw);

        if let Some(target) = &intent.target_tool
            && registry.describe(target).is_none()
        {
            warn!(tool = %target, "classifier named an unknown tool, downgrading to general chat");
            intent = Intent::general_chat(MALFORMED_CONFIDENCE);
        }

        let next = if intent.is_mcp_action() {
            NextStep::ToolCall
        } else {
            NextStep::Respond
        };

        turn.intent = Some(intent);
        turn.advance_to(next);
        Ok(())
    }
}

fn build_system_prompt(catalogue: &[mcphost_domain::ToolDescriptor]) -> String {
    let mut prompt = String::from(
        "Classify the user's message into one of: TOOL_CALL, GENERAL_CHAT, HELP, SERVER_STATUS, TOOL_LIST.\n\
         Respond with exactly these lines:\n\
         INTENT: <kind>\nCONFIDENCE: <0-1>\nTARGET_TOOL: <tool name or NONE>\n\
         PARAMETERS: <JSON object or {}>\nREASONING: <one line>\n\n\
         Available tools:\n",
    );
    if catalogue.is_empty() {
        prompt.push_str("(none)\n");
    } else {
        for tool in catalogue {
            prompt.push_str(&format!("- {}: {}\n", tool.name, tool.description));
        }
    }
    prompt
}

fn parse_classification(raw: &str) -> Intent {
    let mut kind: Option<IntentKind> = None;
    let mut confidence = DEFAULT_CONFIDENCE;
    let mut target_tool: Option<String> = None;
    let mut parameters = std::collections::HashMap::new();

    for line in raw.lines() {
        let line = line.trim();
        if let Some(value) = line.strip_prefix("INTENT:") {
            kind = Some(IntentKind::parse(value.trim()));
        } else if let Some(value) = line.strip_prefix("CONFIDENCE:") {
            confidence = value.trim().parse().unwrap_or(DEFAULT_CONFIDENCE);
        } else if let Some(value) = line.strip_prefix("TARGET_TOOL:") {
            let value = value.trim();
            if !value.is_empty() && !value.eq_ignore_ascii_case("none") {
                target_tool = Some(value.to_string());
            }
        } else if let Some(value) = line.strip_prefix("PARAMETERS:") {
            if let Ok(serde_json::Value::Object(map)) = serde_json::from_str(value.trim()) {
                parameters = map.into_iter().collect();
            }
        }
    }

    match kind {
        Some(kind) => {
            let mut intent = Intent::new(kind, confidence).with_parameters(parameters);
            if let Some(tool) = target_tool {
                intent = intent.with_target_tool(tool).with_raw_args_text(raw.to_string());
            }
            intent
        }
        None => Intent::general_chat(MALFORMED_CONFIDENCE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_classification() {
        let raw = "INTENT: TOOL_CALL\nCONFIDENCE: 0.9\nTARGET_TOOL: get_weather\nPARAMETERS: {\"location\": \"Seoul\"}\nREASONING: weather request";
        let intent = parse_classification(raw);
        assert_eq!(intent.kind, IntentKind::ToolCall);
        assert_eq!(intent.confidence, 0.9);
        assert_eq!(intent.target_tool.as_deref(), Some("get_weather"));
    }

    #[test]
    fn malformed_classification_defaults_to_general_chat() {
        let intent = parse_classification("not a classification at all");
        assert_eq!(intent.kind, IntentKind::GeneralChat);
        assert_eq!(intent.confidence, MALFORMED_CONFIDENCE);
    }
}
