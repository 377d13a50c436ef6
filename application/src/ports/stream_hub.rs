//! Stream Hub port.
//!
//! Fans turn progress out to at most one subscriber per session.

use async_trait::async_trait;
use mcphost_domain::{HostError, StreamMessage};

#[async_trait]
pub trait StreamHubPort: Send + Sync {
    /// Register a new subscriber for `session_id`, displacing any existing
    /// one (the single-subscriber-per-session invariant — the displaced
    /// connection is marked inactive, not torn down synchronously).
    async fn open(&self, session_id: &str) -> Result<String, HostError>;

    /// Close a specific connection explicitly (client disconnect).
    async fn close(&self, connection_id: &str);

    /// Best-effort send to a session's current subscriber, if any. Never
    /// blocks indefinitely — a full queue drops the message rather than
    /// stalling the turn that produced it.
    async fn send_to_session(&self, session_id: &str, message: StreamMessage);
}
