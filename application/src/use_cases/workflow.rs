//! Workflow Executor: wires the nodes into a dispatch loop over
//! `TurnState::next_step` (§9's "tagged-variant state machine" note).

use super::call_tool::ToolCallNode;
use super::classify_intent::IntentClassifierNode;
use super::react_controller::ReactController;
use super::respond::ResponderNode;
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::session_store::SessionStorePort;
use crate::ports::stream_hub::StreamHubPort;
use crate::ports::tool_registry::ToolRegistryPort;
use mcphost_domain::{Message, NextStep, StreamMessage, TurnState};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// One turn's dependencies and the nodes it threads through.
pub struct WorkflowExecutor<G: LlmGateway> {
    registry: Arc<dyn ToolRegistryPort>,
    sessions: Arc<dyn SessionStorePort>,
    hub: Arc<dyn StreamHubPort>,
    classifier: IntentClassifierNode<G>,
    tool_call: ToolCallNode,
    responder: ResponderNode<G>,
    react: ReactController<G>,
}

impl<G: LlmGateway + 'static> WorkflowExecutor<G> {
    pub fn new(
        gateway: Arc<G>,
        registry: Arc<dyn ToolRegistryPort>,
        sessions: Arc<dyn SessionStorePort>,
        hub: Arc<dyn StreamHubPort>,
        classifier_model: impl Into<String>,
        responder_model: impl Into<String>,
        react_model: impl Into<String>,
    ) -> Self {
        let classifier_model = classifier_model.into();
        let responder_model = responder_model.into();
        let react_model = react_model.into();
        Self {
            registry,
            sessions,
            hub,
            classifier: IntentClassifierNode::new(gateway.clone(), classifier_model),
            tool_call: ToolCallNode::new(),
            responder: ResponderNode::new(gateway.clone(), responder_model),
            react: ReactController::new(gateway, react_model),
        }
    }

    /// Run one full turn: append the user message, dispatch the state
    /// machine to completion, and return the finished `TurnState`.
    pub async fn execute(&self, session_id: &str, text: &str) -> TurnState {
        self.execute_cancellable(session_id, text, CancellationToken::new())
            .await
    }

    /// As [`Self::execute`], but checked against `cancellation` between each
    /// node dispatch. On cancellation: stop work, emit `session_end`, and
    /// skip the assistant-append (§5's cancellation contract) — tool calls
    /// already recorded on the turn are left intact.
    pub async fn execute_cancellable(
        &self,
        session_id: &str,
        text: &str,
        cancellation: CancellationToken,
    ) -> TurnState {
        self.hub
            .send_to_session(
                session_id,
                StreamMessage::SessionStart {
                    session_id: session_id.to_string(),
                },
            )
            .await;

        let _ = self
            .sessions
            .append_message(session_id, Message::user(text.to_string()))
            .await;

        let messages = self.sessions.messages(session_id).await.unwrap_or_default();
        let mut turn = TurnState::new(session_id, text).with_messages(messages);

        loop {
            if cancellation.is_cancelled() {
                turn.fail("turn cancelled");
                self.hub
                    .send_to_session(
                        session_id,
                        StreamMessage::SessionEnd {
                            session_id: session_id.to_string(),
                        },
                    )
                    .await;
                return turn;
            }

            match turn.next_step {
                NextStep::ClassifyIntent => {
                    if self
                        .classifier
                        .classify(&mut turn, self.registry.as_ref())
                        .await
                        .is_err()
                    {
                        turn.advance_to(NextStep::Respond);
                    }
                }
                NextStep::ToolCall => {
                    self.tool_call.call(&mut turn, self.registry.as_ref()).await;
                }
                NextStep::ReactThink => {
                    self.react
                        .run(
                            &mut turn,
                            self.registry.as_ref(),
                            self.sessions.as_ref(),
                            self.hub.as_ref(),
                        )
                        .await;
                }
                NextStep::Respond => {
                    self.responder
                        .respond(
                            &mut turn,
                            self.registry.as_ref(),
                            self.sessions.as_ref(),
                            self.hub.as_ref(),
                        )
                        .await;
                }
                NextStep::Done => break,
            }
        }

        self.hub
            .send_to_session(
                session_id,
                StreamMessage::SessionEnd {
                    session_id: session_id.to_string(),
                },
            )
            .await;

        turn
    }
}
