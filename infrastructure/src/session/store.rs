//! `SessionStorePort` adapter: an `Arc<Mutex<HashMap<..>>>`-backed store
//! (§5's "following the teacher's `Mutex`-guarded shared-state idiom") with a
//! background sweep task spawned once at construction, mirroring the
//! reference session manager's `start()`/`_cleanup_loop()` shape (§4.3) —
//! the same `tokio::time::interval` idiom the pack's MCP connection manager
//! uses for periodic background maintenance.

use async_trait::async_trait;
use chrono::Duration as ChronoDuration;
use mcphost_application::ports::session_store::SessionStorePort;
use mcphost_domain::{HostError, Message, Session};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Default background-sweep cadence (§4.3).
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(5 * 60);
/// Default idle timeout before a session is evicted (§6).
pub const DEFAULT_IDLE_TIMEOUT_MINUTES: i64 = 30;

pub struct InMemorySessionStore {
    sessions: Arc<Mutex<HashMap<String, Session>>>,
    idle_timeout: ChronoDuration,
}

impl InMemorySessionStore {
    /// Construct the store and spawn its background eviction task. The task
    /// runs for the store's lifetime (it holds an `Arc` clone of the map, so
    /// dropping the store's handle alone does not stop it — by design, as
    /// the store is meant to live for the whole process).
    pub fn start(cleanup_interval: Duration, idle_timeout_minutes: i64) -> Arc<Self> {
        let store = Arc::new(Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            idle_timeout: ChronoDuration::minutes(idle_timeout_minutes),
        });

        let sessions = Arc::clone(&store.sessions);
        let idle_timeout = store.idle_timeout;
        tokio::spawn(async move {
            Self::cleanup_loop(sessions, cleanup_interval, idle_timeout).await;
        });

        store
    }

    /// Convenience constructor using the §6 defaults.
    pub fn start_default() -> Arc<Self> {
        Self::start(DEFAULT_CLEANUP_INTERVAL, DEFAULT_IDLE_TIMEOUT_MINUTES)
    }

    async fn cleanup_loop(
        sessions: Arc<Mutex<HashMap<String, Session>>>,
        cleanup_interval: Duration,
        idle_timeout: ChronoDuration,
    ) {
        let mut ticker = tokio::time::interval(cleanup_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            let mut sessions = sessions.lock().await;
            let before = sessions.len();
            sessions.retain(|_, session| !session.is_expired(idle_timeout));
            let evicted = before - sessions.len();
            if evicted > 0 {
                info!("session store: evicted {evicted} idle session(s)");
            } else {
                debug!("session store: cleanup tick, nothing to evict");
            }
        }
    }
}

#[async_trait]
impl SessionStorePort for InMemorySessionStore {
    async fn get_or_create(&self, session_id: &str) -> Session {
        let mut sessions = self.sessions.lock().await;
        sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Session::new(session_id))
            .clone()
    }

    async fn append_message(&self, session_id: &str, message: Message) -> Result<(), HostError> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Session::new(session_id));
        session.record(message);
        Ok(())
    }

    async fn messages(&self, session_id: &str) -> Result<Vec<Message>, HostError> {
        let sessions = self.sessions.lock().await;
        Ok(sessions
            .get(session_id)
            .map(|s| s.messages().to_vec())
            .unwrap_or_default())
    }

    async fn evict(&self, session_id: &str) {
        let mut sessions = self.sessions.lock().await;
        sessions.remove(session_id);
    }

    async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_or_create_is_idempotent() {
        let store = InMemorySessionStore::start(Duration::from_secs(3600), 30);
        store.get_or_create("s1").await;
        store
            .append_message("s1", Message::user("hi"))
            .await
            .unwrap();
        assert_eq!(store.len().await, 1);
        let messages = store.messages("s1").await.unwrap();
        assert_eq!(messages.len(), 1);
    }

    #[tokio::test]
    async fn evict_removes_session() {
        let store = InMemorySessionStore::start(Duration::from_secs(3600), 30);
        store.get_or_create("s1").await;
        store.evict("s1").await;
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn unknown_session_has_empty_history() {
        let store = InMemorySessionStore::start(Duration::from_secs(3600), 30);
        let messages = store.messages("ghost").await.unwrap();
        assert!(messages.is_empty());
    }
}
