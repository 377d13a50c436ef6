//! Turn State: the working set threaded through the workflow executor's
//! nodes for one user message, start to finish.

use crate::intent::Intent;
use crate::session::entities::Message;
use crate::tool::call_record::ToolCallRecord;
use serde::{Deserialize, Serialize};

/// Which node the Workflow Executor should dispatch to next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextStep {
    ClassifyIntent,
    ToolCall,
    ReactThink,
    Respond,
    Done,
}

/// The ReAct sub-loop's own working set, grouped together per the
/// "Reason-Act-Observe" control flow rather than flattened into `TurnState`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReactState {
    pub iteration: u32,
    pub max_iterations: u32,
    pub thought: Option<String>,
    pub action: Option<String>,
    pub observation: Option<String>,
    pub final_answer: Option<String>,
    pub should_continue: bool,
    pub consecutive_failures: u32,
}

impl ReactState {
    pub fn new(max_iterations: u32) -> Self {
        Self {
            iteration: 0,
            max_iterations,
            thought: None,
            action: None,
            observation: None,
            final_answer: None,
            should_continue: true,
            consecutive_failures: 0,
        }
    }

    pub fn advance(&mut self) {
        self.iteration += 1;
        if self.iteration >= self.max_iterations {
            self.should_continue = false;
        }
    }

    pub fn record_failure(&mut self) {
        self.consecutive_failures += 1;
    }

    pub fn record_success(&mut self) {
        self.consecutive_failures = 0;
    }
}

/// One turn's accumulated state as it moves through the workflow's nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnState {
    pub session_id: String,
    pub current_message: String,
    pub messages: Vec<Message>,
    pub intent: Option<Intent>,
    pub tool_calls: Vec<ToolCallRecord>,
    pub react: Option<ReactState>,
    pub response: String,
    pub success: bool,
    pub error: Option<String>,
    pub step_count: u32,
    pub next_step: NextStep,
}

impl TurnState {
    pub fn new(session_id: impl Into<String>, current_message: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            current_message: current_message.into(),
            messages: Vec::new(),
            intent: None,
            tool_calls: Vec::new(),
            react: None,
            response: String::new(),
            success: false,
            error: None,
            step_count: 0,
            next_step: NextStep::ClassifyIntent,
        }
    }

    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    pub fn advance_to(&mut self, next: NextStep) {
        self.step_count += 1;
        self.next_step = next;
    }

    pub fn record_tool_call(&mut self, record: ToolCallRecord) {
        self.tool_calls.push(record);
    }

    pub fn finish(&mut self, response: impl Into<String>) {
        self.response = response.into();
        self.success = true;
        self.next_step = NextStep::Done;
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
        self.success = false;
        self.next_step = NextStep::Done;
    }

    pub fn is_done(&self) -> bool {
        self.next_step == NextStep::Done
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_turn_starts_at_classify_intent() {
        let turn = TurnState::new("sess-1", "what's the weather?");
        assert_eq!(turn.next_step, NextStep::ClassifyIntent);
        assert_eq!(turn.step_count, 0);
    }

    #[test]
    fn finish_marks_done_and_successful() {
        let mut turn = TurnState::new("sess-1", "hi");
        turn.finish("hello there");
        assert!(turn.success);
        assert!(turn.is_done());
        assert_eq!(turn.response, "hello there");
    }

    #[test]
    fn fail_marks_done_and_unsuccessful() {
        let mut turn = TurnState::new("sess-1", "hi");
        turn.fail("boom");
        assert!(!turn.success);
        assert!(turn.is_done());
        assert_eq!(turn.error.as_deref(), Some("boom"));
    }

    #[test]
    fn react_state_stops_at_max_iterations() {
        let mut react = ReactState::new(2);
        react.advance();
        assert!(react.should_continue);
        react.advance();
        assert!(!react.should_continue);
    }
}
