//! Tool-Call Node (§4.5).

use crate::ports::schema_coercer::coerce_arguments;
use crate::ports::tool_registry::ToolRegistryPort;
use mcphost_domain::{NextStep, ToolCallError, ToolCallErrorKind, ToolCallRecord, TurnState};
use std::collections::HashMap;

pub struct ToolCallNode;

impl ToolCallNode {
    pub fn new() -> Self {
        Self
    }

    /// Resolve the intent's target tool via the registry, coerce its raw
    /// argument text against the tool's schema, dispatch, and always append
    /// a record — errors flow to the responder as observation material
    /// rather than failing the turn.
    pub async fn call(&self, turn: &mut TurnState, registry: &dyn ToolRegistryPort) {
        let intent = match &turn.intent {
            Some(intent) if intent.is_mcp_action() => intent.clone(),
            _ => {
                turn.advance_to(NextStep::Respond);
                return;
            }
        };

        let tool_name = intent.target_tool.clone().unwrap_or_default();

        let Some(descriptor) = registry.describe(&tool_name) else {
            turn.record_tool_call(ToolCallRecord::failure(
                "unknown",
                &tool_name,
                HashMap::new(),
                ToolCallError::new(ToolCallErrorKind::NotFound, "tool not found in catalogue"),
                0,
                "{}",
                None,
            ));
            turn.advance_to(NextStep::Respond);
            return;
        };

        let arguments = if !intent.parameters.is_empty() {
            intent.parameters.clone()
        } else {
            let raw_text = intent.raw_args_text.as_deref().unwrap_or("");
            coerce_arguments(raw_text, &descriptor.arg_schema).unwrap_or_else(|_| {
                let mut fallback = HashMap::new();
                fallback.insert(
                    "input".to_string(),
                    serde_json::Value::String(raw_text.to_string()),
                );
                fallback
            })
        };

        match registry.call(&tool_name, arguments).await {
            Ok(record) => turn.record_tool_call(record),
            Err(err) => {
                turn.record_tool_call(ToolCallRecord::failure(
                    &descriptor.server_id,
                    &tool_name,
                    HashMap::new(),
                    ToolCallError::new(ToolCallErrorKind::ExecutionError, err.to_string()),
                    0,
                    "{}",
                    None,
                ));
            }
        }

        turn.advance_to(NextStep::Respond);
    }
}

impl Default for ToolCallNode {
    fn default() -> Self {
        Self::new()
    }
}
