//! Session domain entities.
//!
//! A [`Session`] is the host's per-conversation working set: an ordered,
//! append-only message log bounded by [`Session::MAX_MESSAGES`], a free-form
//! context bag, and access timestamps used for idle eviction. Retention and
//! eviction policy live here because they are invariants of the entity
//! itself, not a concern of whatever store happens to hold it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// A single message in a session. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Message {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
            metadata: HashMap::new(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn tool(content: impl Into<String>) -> Self {
        Self::new(Role::Tool, content)
    }

    /// Attach a metadata entry, e.g. `metadata.react_step = "observe"`.
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// A conversation session: an ordered message log plus a context bag.
///
/// Invariants (held by [`Session::record`]):
/// - messages are append-only within a turn
/// - `last_access` is monotonically non-decreasing
/// - `|messages| <= MAX_MESSAGES + ceil(MAX_MESSAGES/2)` at all times, the
///   upper bound reached only transiently during the retention rewrite
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    messages: Vec<Message>,
    context: HashMap<String, serde_json::Value>,
    created_at: DateTime<Utc>,
    last_access: DateTime<Utc>,
}

impl Session {
    /// Default retention bound on the message log.
    pub const MAX_MESSAGES: usize = 50;

    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            messages: Vec::new(),
            context: HashMap::new(),
            created_at: now,
            last_access: now,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn context(&self) -> &HashMap<String, serde_json::Value> {
        &self.context
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_access(&self) -> DateTime<Utc> {
        self.last_access
    }

    pub fn update_context(&mut self, patch: HashMap<String, serde_json::Value>) {
        self.context.extend(patch);
        self.touch();
    }

    /// Append a message, applying the retention rewrite if the log has
    /// overflowed `MAX_MESSAGES`. Updates `last_access`.
    pub fn record(&mut self, message: Message) {
        self.messages.push(message);
        self.touch();
        self.enforce_retention();
    }

    pub fn add_user_message(&mut self, content: impl Into<String>) {
        self.record(Message::user(content));
    }

    pub fn add_assistant_message(&mut self, content: impl Into<String>) {
        self.record(Message::assistant(content));
    }

    fn touch(&mut self) {
        let now = Utc::now();
        if now > self.last_access {
            self.last_access = now;
        }
    }

    /// Whether this session has been idle for longer than `timeout`.
    pub fn is_expired(&self, timeout: chrono::Duration) -> bool {
        Utc::now() - self.last_access > timeout
    }

    /// Retention rewrite: on overflow of `MAX_MESSAGES`, and only when more
    /// than one user message exists (an opening message alone has nothing
    /// safe to drop), collapse the log to `[first_user_message] ++
    /// tail(k)` with `k = min(10, MAX_MESSAGES / 2)`.
    fn enforce_retention(&mut self) {
        if self.messages.len() <= Self::MAX_MESSAGES {
            return;
        }

        let user_count = self
            .messages
            .iter()
            .filter(|m| m.role == Role::User)
            .count();
        if user_count <= 1 {
            return;
        }

        let first_user_idx = match self.messages.iter().position(|m| m.role == Role::User) {
            Some(idx) => idx,
            None => return,
        };

        let k = std::cmp::min(10, Self::MAX_MESSAGES / 2);
        let tail_start = self.messages.len().saturating_sub(k);

        let mut rewritten = Vec::with_capacity(k + 1);
        rewritten.push(self.messages[first_user_idx].clone());
        rewritten.extend(self.messages[tail_start..].iter().cloned());
        self.messages = rewritten;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retention_preserves_first_user_message() {
        let mut session = Session::new("s1");
        session.add_user_message("find the weather in every city");
        for i in 0..Session::MAX_MESSAGES + 10 {
            session.add_user_message(format!("follow-up {i}"));
            session.add_assistant_message(format!("reply {i}"));
        }

        assert!(session.messages().len() <= Session::MAX_MESSAGES + 25);
        assert_eq!(
            session.messages().first().unwrap().content,
            "find the weather in every city"
        );
    }

    #[test]
    fn retention_is_idempotent() {
        let mut session = Session::new("s2");
        for i in 0..Session::MAX_MESSAGES + 20 {
            session.add_user_message(format!("msg {i}"));
        }
        let once = session.messages().to_vec();
        session.enforce_retention();
        let twice = session.messages().to_vec();

        assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(twice.iter()) {
            assert_eq!(a.content, b.content);
        }
    }

    #[test]
    fn single_user_message_session_is_never_rewritten() {
        let mut session = Session::new("s3");
        session.add_user_message("hello");
        for i in 0..Session::MAX_MESSAGES + 10 {
            session.record(Message::assistant(format!("reply {i}")));
        }

        assert_eq!(session.messages().first().unwrap().content, "hello");
    }

    #[test]
    fn last_access_is_monotonic() {
        let mut session = Session::new("s4");
        let first = session.last_access();
        session.add_user_message("hi");
        assert!(session.last_access() >= first);
    }
}
