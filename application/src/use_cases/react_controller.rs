//! ReAct Controller (§4.7): the think/act/observe sub-loop entered when the
//! complexity gate or an intent classified as a multi-step action fires.

use super::call_tool::ToolCallNode;
use super::shared::{jaccard_similarity, looks_like_failure};
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::session_store::SessionStorePort;
use crate::ports::stream_hub::StreamHubPort;
use crate::ports::tool_registry::ToolRegistryPort;
use mcphost_domain::{
    Intent, IntentKind, Message, NextStep, ReactState, StreamMessage, ToolCallRecord, TurnState,
};
use std::sync::Arc;

const DEFAULT_MAX_ITERATIONS: u32 = 10;
const DEFAULT_MAX_CONSECUTIVE_FAILURES: u32 = 3;

pub struct ReactController<G: LlmGateway> {
    gateway: Arc<G>,
    model: String,
    tool_call: ToolCallNode,
}

enum ThinkOutcome {
    Act { action_text: String },
    Final { answer: String },
}

impl<G: LlmGateway> ReactController<G> {
    pub fn new(gateway: Arc<G>, model: impl Into<String>) -> Self {
        Self {
            gateway,
            model: model.into(),
            tool_call: ToolCallNode::new(),
        }
    }

    /// Drive the sub-loop to completion (it never suspends the workflow
    /// executor mid-loop — `next_step` is `Respond` only once finalized, via
    /// [`Self::finalize`]).
    pub async fn run(
        &self,
        turn: &mut TurnState,
        registry: &dyn ToolRegistryPort,
        sessions: &dyn SessionStorePort,
        hub: &dyn StreamHubPort,
    ) {
        let mut react = turn
            .react
            .take()
            .unwrap_or_else(|| ReactState::new(DEFAULT_MAX_ITERATIONS));

        loop {
            react.advance();

            hub.send_to_session(
                &turn.session_id,
                StreamMessage::Thinking {
                    session_id: turn.session_id.clone(),
                    thought: format!("iteration {}/{}", react.iteration, react.max_iterations),
                },
            )
            .await;

            let remaining_tasks = self.remaining_tasks(turn).await;
            let force_act = !remaining_tasks.is_empty();
            let outcome = self.think(turn, registry, &remaining_tasks).await;

            // Force `act` even on a proposed Final Answer when tasks remain,
            // preventing premature termination on multi-subject requests.
            let action_text = match outcome {
                ThinkOutcome::Final { answer } if !force_act => {
                    react.final_answer = Some(answer);
                    break;
                }
                ThinkOutcome::Final { answer } => answer,
                ThinkOutcome::Act { action_text } => action_text,
            };

            react.action = Some(action_text.clone());
            self.act(turn, &mut react, registry, &action_text, hub).await;

            if !react.should_continue {
                break;
            }

            self.observe(turn, &mut react, sessions, hub).await;

            if !react.should_continue || react.iteration >= react.max_iterations {
                break;
            }
        }

        turn.react = Some(react);
        self.finalize(turn, sessions, hub).await;
    }

    /// Ask the LLM to enumerate atomic tasks implied by the original
    /// message, minus those already reflected in successful tool calls.
    async fn remaining_tasks(&self, turn: &TurnState) -> Vec<String> {
        let completed = turn
            .tool_calls
            .iter()
            .filter(|r| r.is_successful())
            .map(|r| r.render_summary())
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = format!(
            "Original request: {}\n\nTasks already completed:\n{}\n\nList the remaining atomic \
             tasks (one per line, empty if none).",
            turn.current_message, completed
        );

        let Ok(session) = self.gateway.create_session(&self.model).await else {
            return Vec::new();
        };
        match session.send(&prompt).await {
            Ok(text) => text.lines().map(str::trim).filter(|l| !l.is_empty()).map(str::to_string).collect(),
            Err(_) => Vec::new(),
        }
    }

    async fn think(
        &self,
        turn: &TurnState,
        _registry: &dyn ToolRegistryPort,
        remaining_tasks: &[String],
    ) -> ThinkOutcome {
        let history_summary = turn
            .tool_calls
            .iter()
            .map(|r| r.render_summary())
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = format!(
            "Request: {}\n\nTool calls so far:\n{}\n\nRemaining tasks:\n{}\n\n\
             Respond with either:\nThought: <reasoning>\nAction: <what to do next>\nor:\n\
             Final Answer: <answer>",
            turn.current_message,
            history_summary,
            remaining_tasks.join("\n")
        );

        let Ok(session) = self.gateway.create_session(&self.model).await else {
            return ThinkOutcome::Final {
                answer: "unable to reach the reasoning model".to_string(),
            };
        };

        let raw = session.send(&prompt).await.unwrap_or_default();

        if let Some(idx) = raw.find("Final Answer:") {
            return ThinkOutcome::Final {
                answer: raw[idx + "Final Answer:".len()..].trim().to_string(),
            };
        }

        if let Some(idx) = raw.find("Action:") {
            return ThinkOutcome::Act {
                action_text: raw[idx + "Action:".len()..].trim().to_string(),
            };
        }

        ThinkOutcome::Final { answer: raw }
    }

    /// Parse the natural-language action via a second LLM call into
    /// `{tool_name, arguments, reasoning}`, then dispatch through the
    /// Tool-Call Node.
    async fn act(
        &self,
        turn: &mut TurnState,
        react: &mut ReactState,
        registry: &dyn ToolRegistryPort,
        action_text: &str,
        hub: &dyn StreamHubPort,
    ) {
        let catalogue = registry.catalogue();
        let tool_list = catalogue
            .iter()
            .map(|t| format!("- {}: {}", t.name, t.description))
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = format!(
            "Action to perform: {action_text}\n\nAvailable tools:\n{tool_list}\n\n\
             Reply with exactly one JSON object: {{\"tool_name\": <name or \"NO_TOOL\">, \
             \"arguments\": {{...}}, \"reasoning\": <text>}}"
        );

        let parsed = match self.gateway.create_session(&self.model).await {
            Ok(session) => session
                .send(&prompt)
                .await
                .ok()
                .and_then(|raw| parse_action_json(&raw)),
            Err(_) => None,
        };

        let Some((tool_name, arguments)) = parsed.filter(|(name, _)| name != "NO_TOOL") else {
            react.record_failure();
            if react.consecutive_failures >= DEFAULT_MAX_CONSECUTIVE_FAILURES {
                react.should_continue = false;
            }
            return;
        };

        hub.send_to_session(
            &turn.session_id,
            StreamMessage::Acting {
                session_id: turn.session_id.clone(),
                tool_name: tool_name.clone(),
            },
        )
        .await;

        turn.intent = Some(
            Intent::new(IntentKind::ToolCall, 1.0)
                .with_target_tool(tool_name)
                .with_parameters(arguments),
        );
        self.tool_call.call(turn, registry).await;

        match turn.tool_calls.last() {
            Some(record) if record.is_successful() => react.record_success(),
            _ => {
                react.record_failure();
                if react.consecutive_failures >= DEFAULT_MAX_CONSECUTIVE_FAILURES {
                    react.should_continue = false;
                }
            }
        }
    }

    async fn observe(
        &self,
        turn: &mut TurnState,
        react: &mut ReactState,
        sessions: &dyn SessionStorePort,
        hub: &dyn StreamHubPort,
    ) {
        let observation = turn
            .tool_calls
            .last()
            .map(|r: &ToolCallRecord| r.render_summary())
            .unwrap_or_else(|| "(no result)".to_string());

        react.observation = Some(observation.clone());

        let message = Message::tool(format!("관찰: {observation}"))
            .with_metadata("react_step", serde_json::json!("observe"));
        let _ = sessions.append_message(&turn.session_id, message).await;

        hub.send_to_session(
            &turn.session_id,
            StreamMessage::Observing {
                session_id: turn.session_id.clone(),
                observation: observation.clone(),
            },
        )
        .await;

        if turn.tool_calls.len() >= 2 {
            let last_two: Vec<&str> = turn
                .tool_calls
                .iter()
                .rev()
                .take(2)
                .map(|r| r.result.as_deref().or(r.error.as_ref().map(|e| e.message.as_str())).unwrap_or(""))
                .collect();

            if last_two.iter().all(|text| looks_like_failure(text))
                && jaccard_similarity(last_two[0], last_two[1]) > 0.8
            {
                react.should_continue = false;
            }
        }

        if react.iteration >= react.max_iterations {
            react.should_continue = false;
        }
    }

    /// Finalize state: equivalent to the Responder Node but synthesizing
    /// from accumulated tool-call results rather than a plain chat reply.
    async fn finalize(&self, turn: &mut TurnState, sessions: &dyn SessionStorePort, hub: &dyn StreamHubPort) {
        let react = turn.react.clone().unwrap_or_default();

        let text = if let Some(answer) = react.final_answer {
            answer
        } else {
            let prompt = format!(
                "Synthesize a final answer to: {}\n\nAccumulated results:\n{}",
                turn.current_message,
                turn.tool_calls
                    .iter()
                    .map(|r| r.render_summary())
                    .collect::<Vec<_>>()
                    .join("\n")
            );

            match self.gateway.create_session(&self.model).await {
                Ok(session) => session.send(&prompt).await.unwrap_or_else(|_| deterministic_summary(turn)),
                Err(_) => deterministic_summary(turn),
            }
        };

        let _ = sessions
            .append_message(&turn.session_id, Message::assistant(text.clone()))
            .await;

        hub.send_to_session(
            &turn.session_id,
            StreamMessage::FinalResponse {
                session_id: turn.session_id.clone(),
                text: text.clone(),
            },
        )
        .await;

        turn.finish(text);
        turn.advance_to(NextStep::Done);
    }
}

fn parse_action_json(raw: &str) -> Option<(String, std::collections::HashMap<String, serde_json::Value>)> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    let slice = &raw[start..=end];
    let value: serde_json::Value = serde_json::from_str(slice).ok()?;
    let tool_name = value.get("tool_name")?.as_str()?.to_string();
    let arguments = value
        .get("arguments")
        .and_then(|v| v.as_object())
        .map(|map| map.clone().into_iter().collect())
        .unwrap_or_default();
    Some((tool_name, arguments))
}

fn deterministic_summary(turn: &TurnState) -> String {
    if turn.tool_calls.is_empty() {
        "I wasn't able to complete this request.".to_string()
    } else {
        turn.tool_calls
            .iter()
            .map(|r| r.render_summary())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_action_json_extracts_tool_call() {
        let raw = "Here you go: {\"tool_name\": \"get_weather\", \"arguments\": {\"location\": \"Busan\"}, \"reasoning\": \"ok\"}";
        let (tool_name, arguments) = parse_action_json(raw).unwrap();
        assert_eq!(tool_name, "get_weather");
        assert_eq!(arguments["location"], serde_json::json!("Busan"));
    }

    #[test]
    fn parse_action_json_rejects_missing_object() {
        assert!(parse_action_json("no json here").is_none());
    }
}
