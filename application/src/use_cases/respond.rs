//! Responder Node (§4.6) and the streaming policy it shares with the ReAct
//! Controller's finalize state.

use crate::ports::llm_gateway::LlmGateway;
use crate::ports::session_store::SessionStorePort;
use crate::ports::stream_hub::StreamHubPort;
use crate::ports::tool_registry::ToolRegistryPort;
use mcphost_domain::{IntentKind, Message, StreamEvent, StreamMessage, TurnState};
use std::sync::Arc;
use std::time::Duration;

const PUNCTUATION: &[char] = &[
    '.', ',', '!', '?', ';', ':', '(', ')', '[', ']', '{', '}', '、', '。', '！', '？', '；', '：',
    '（', '）', '【', '】',
];
const MAX_DELAY_MS: u64 = 150;

pub struct ResponderNode<G: LlmGateway> {
    gateway: Arc<G>,
    model: String,
}

impl<G: LlmGateway> ResponderNode<G> {
    pub fn new(gateway: Arc<G>, model: impl Into<String>) -> Self {
        Self {
            gateway,
            model: model.into(),
        }
    }

    pub async fn respond(
        &self,
        turn: &mut TurnState,
        registry: &dyn ToolRegistryPort,
        sessions: &dyn SessionStorePort,
        hub: &dyn StreamHubPort,
    ) {
        let intent_kind = turn.intent.as_ref().map(|i| i.kind);

        let text = if matches!(
            intent_kind,
            Some(IntentKind::ToolList) | Some(IntentKind::ServerStatus) | Some(IntentKind::Help)
        ) {
            synthesize_system_info(intent_kind.unwrap(), registry)
        } else {
            match self.stream_general_reply(turn, sessions, hub).await {
                Ok(text) => text,
                Err(_) => fallback_summary(turn),
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
    }

    async fn stream_general_reply(
        &self,
        turn: &TurnState,
        sessions: &dyn SessionStorePort,
        hub: &dyn StreamHubPort,
    ) -> Result<String, ()> {
        let history = sessions
            .messages(&turn.session_id)
            .await
            .unwrap_or_default();

        let prompt = build_general_prompt(turn, &history);

        let session = self
            .gateway
            .create_session(&self.model)
            .await
            .map_err(|_| ())?;

        let mut handle = session.send_streaming(&prompt).await.map_err(|_| ())?;

        let mut full_text = String::new();
        let mut buffer = String::new();
        let mut total_tokens: u64 = 0;
        let mut since_batch: u64 = 0;

        while let Some(event) = handle.receiver.recv().await {
            match event {
                StreamEvent::Delta(token) => {
                    total_tokens += 1;
                    since_batch += 1;
                    buffer.push_str(&token);
                    full_text.push_str(&token);

                    let last_char = token.chars().last();
                    let hit_punctuation = last_char.map(|c| PUNCTUATION.contains(&c)).unwrap_or(false);
                    let adaptive_len = 8 + last_char.map(|c| c.len_utf8()).unwrap_or(1) / 3;
                    let batch_threshold = 10 + total_tokens / 20;

                    if hit_punctuation || buffer.len() >= adaptive_len || since_batch >= batch_threshold
                    {
                        hub.send_to_session(
                            &turn.session_id,
                            StreamMessage::PartialResponse {
                                session_id: turn.session_id.clone(),
                                delta: std::mem::take(&mut buffer),
                            },
                        )
                        .await;
                        since_batch = 0;

                        let delay = if hit_punctuation { MAX_DELAY_MS } else { MAX_DELAY_MS / 3 };
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                    }
                }
                StreamEvent::Completed(text) => {
                    if full_text.is_empty() {
                        full_text = text;
                    }
                    break;
                }
                StreamEvent::Error(_) => return Err(()),
            }
        }

        if !buffer.is_empty() {
            hub.send_to_session(
                &turn.session_id,
                StreamMessage::PartialResponse {
                    session_id: turn.session_id.clone(),
                    delta: buffer,
                },
            )
            .await;
        }

        Ok(full_text)
    }
}

fn build_general_prompt(turn: &TurnState, history: &[Message]) -> String {
    let mut prompt = String::from(
        "Respond in markdown, matching the user's language. Use prior context where relevant.\n\n",
    );

    for message in history.iter().rev().skip(1).rev() {
        prompt.push_str(&format!("{:?}: {}\n", message.role, message.content));
    }

    prompt.push_str(&format!("\nUser: {}\n", turn.current_message));

    for record in turn.tool_calls.iter().filter(|r| r.is_successful()) {
        prompt.push_str(&format!("\n{}\n", record.render_summary()));
    }

    prompt
}

fn synthesize_system_info(kind: IntentKind, registry: &dyn ToolRegistryPort) -> String {
    match kind {
        IntentKind::ToolList => {
            let catalogue = registry.catalogue();
            if catalogue.is_empty() {
                "No tools are currently registered.".to_string()
            } else {
                let lines: Vec<String> = catalogue
                    .iter()
                    .map(|t| format!("- **{}**: {}", t.name, t.description))
                    .collect();
                format!("Available tools:\n{}", lines.join("\n"))
            }
        }
        IntentKind::ServerStatus => {
            let servers = registry.server_ids();
            if servers.is_empty() {
                "No MCP servers are currently connected.".to_string()
            } else {
                format!("Connected servers: {}", servers.join(", "))
            }
        }
        IntentKind::Help => {
            "Ask me to look something up, or say \"list tools\" / \"server status\" for diagnostics."
                .to_string()
        }
        _ => unreachable!("synthesize_system_info called for a non-system-info intent"),
    }
}

fn fallback_summary(turn: &TurnState) -> String {
    if turn.tool_calls.is_empty() {
        "Sorry, I wasn't able to generate a response.".to_string()
    } else {
        let lines: Vec<String> = turn.tool_calls.iter().map(|r| r.render_summary()).collect();
        format!("Here's what I found:\n{}", lines.join("\n"))
    }
}
