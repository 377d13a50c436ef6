//! Session Store port.

use async_trait::async_trait;
use mcphost_domain::{HostError, Message, Session};

#[async_trait]
pub trait SessionStorePort: Send + Sync {
    /// Get an existing session or create a fresh one for `session_id`.
    async fn get_or_create(&self, session_id: &str) -> Session;

    /// Append a message to a session, enforcing retention, and touch its
    /// last-access time.
    async fn append_message(&self, session_id: &str, message: Message) -> Result<(), HostError>;

    /// A snapshot of a session's current message log, for building prompts.
    async fn messages(&self, session_id: &str) -> Result<Vec<Message>, HostError>;

    /// Explicitly remove a session (idle eviction calls this internally;
    /// exposed here for tests and administrative cleanup).
    async fn evict(&self, session_id: &str);

    /// Number of sessions currently held.
    async fn len(&self) -> usize;
}
