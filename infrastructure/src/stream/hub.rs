//! `StreamHubPort` adapter.
//!
//! One subscriber per session (§4.8): opening a new connection displaces
//! the existing one by sending it a `SessionEnd` and marking it inactive,
//! rather than tearing it down synchronously. Sends are best-effort: a full
//! per-connection queue drops the message and marks the connection inactive
//! instead of blocking the turn that produced it. A background sweep closes
//! connections that have gone quiet, and a separate heartbeat keeps idle
//! subscribers alive against proxy/connection timeouts.

use async_trait::async_trait;
use chrono::Utc;
use mcphost_application::ports::stream_hub::StreamHubPort;
use mcphost_domain::{HostError, StreamConnection, StreamMessage};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, warn};

/// Per-connection outbound queue depth (§4.8).
const QUEUE_DEPTH: usize = 64;
/// Default hub-wide connection cap (§4.8).
pub const DEFAULT_MAX_CONNECTIONS: usize = 50;
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);
const INACTIVE_SWEEP_INTERVAL: Duration = Duration::from_secs(60);
const INACTIVE_LIMIT: Duration = Duration::from_secs(60 * 60);

static CONNECTION_SEQ: AtomicU64 = AtomicU64::new(1);

fn next_connection_id() -> String {
    format!("conn-{}", CONNECTION_SEQ.fetch_add(1, Ordering::Relaxed))
}

struct Subscriber {
    connection: StreamConnection,
    sender: mpsc::Sender<StreamMessage>,
}

pub struct StreamHub {
    /// session_id -> current subscriber, if any.
    subscribers: Arc<RwLock<HashMap<String, Subscriber>>>,
    max_connections: usize,
}

impl StreamHub {
    pub fn start(max_connections: usize) -> Arc<Self> {
        let hub = Arc::new(Self {
            subscribers: Arc::new(RwLock::new(HashMap::new())),
            max_connections,
        });

        let sweep_subscribers = Arc::clone(&hub.subscribers);
        tokio::spawn(async move {
            Self::inactive_sweep_loop(sweep_subscribers).await;
        });

        let heartbeat_subscribers = Arc::clone(&hub.subscribers);
        tokio::spawn(async move {
            Self::heartbeat_loop(heartbeat_subscribers).await;
        });

        hub
    }

    pub fn start_default() -> Arc<Self> {
        Self::start(DEFAULT_MAX_CONNECTIONS)
    }

    /// Returns the subscriber's receiver so a caller (the presentation
    /// layer) can drain it toward its transport of choice.
    pub async fn open_with_receiver(
        &self,
        session_id: &str,
    ) -> Result<(String, mpsc::Receiver<StreamMessage>), HostError> {
        let mut subscribers = self.subscribers.write().await;

        if subscribers.len() >= self.max_connections && !subscribers.contains_key(session_id) {
            return Err(HostError::ConnectionLimitReached);
        }

        if let Some(existing) = subscribers.get(session_id) {
            let _ = existing
                .sender
                .try_send(StreamMessage::SessionEnd {
                    session_id: session_id.to_string(),
                });
        }

        let connection_id = next_connection_id();
        let (tx, rx) = mpsc::channel(QUEUE_DEPTH);
        let connection = StreamConnection::new(connection_id.clone(), session_id, Utc::now());
        subscribers.insert(
            session_id.to_string(),
            Subscriber {
                connection,
                sender: tx,
            },
        );

        Ok((connection_id, rx))
    }

    async fn inactive_sweep_loop(subscribers: Arc<RwLock<HashMap<String, Subscriber>>>) {
        let mut ticker = tokio::time::interval(INACTIVE_SWEEP_INTERVAL);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            let now = Utc::now();
            let idle_limit = chrono::Duration::from_std(INACTIVE_LIMIT).unwrap();

            let mut subscribers = subscribers.write().await;
            let before = subscribers.len();
            subscribers.retain(|_, sub| !sub.connection.is_inactive(now, idle_limit));
            let closed = before - subscribers.len();
            if closed > 0 {
                debug!("stream hub: swept {closed} inactive connection(s)");
            }
        }
    }

    async fn heartbeat_loop(subscribers: Arc<RwLock<HashMap<String, Subscriber>>>) {
        let mut ticker = tokio::time::interval(HEARTBEAT_INTERVAL);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            let subscribers = subscribers.read().await;
            for (session_id, sub) in subscribers.iter() {
                if !sub.connection.active {
                    continue;
                }
                if sub
                    .sender
                    .try_send(StreamMessage::Thinking {
                        session_id: session_id.clone(),
                        thought: String::new(),
                    })
                    .is_err()
                {
                    warn!(%session_id, "stream hub: heartbeat dropped, queue full or closed");
                }
            }
        }
    }
}

#[async_trait]
impl StreamHubPort for StreamHub {
    async fn open(&self, session_id: &str) -> Result<String, HostError> {
        let (connection_id, mut rx) = self.open_with_receiver(session_id).await?;
        // Presentation-layer callers should use `open_with_receiver` directly
        // to retain the receiver; this port-level `open` exists for callers
        // that only need the connection id and will drain the queue via a
        // side channel registered elsewhere. Draining here would starve the
        // queue before a real subscriber attaches, so just release it.
        rx.close();
        Ok(connection_id)
    }

    async fn close(&self, connection_id: &str) {
        let mut subscribers = self.subscribers.write().await;
        subscribers.retain(|_, sub| sub.connection.connection_id != connection_id);
    }

    async fn send_to_session(&self, session_id: &str, message: StreamMessage) {
        let mut subscribers = self.subscribers.write().await;
        let Some(sub) = subscribers.get_mut(session_id) else {
            return;
        };
        if !sub.connection.active {
            return;
        }

        sub.connection.touch(Utc::now());
        if sub.sender.try_send(message).is_err() {
            warn!(%session_id, "stream hub: queue full, marking connection inactive");
            sub.connection.displace();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn opening_a_second_connection_displaces_the_first() {
        let hub = StreamHub::start(DEFAULT_MAX_CONNECTIONS);
        let (_id1, mut rx1) = hub.open_with_receiver("s1").await.unwrap();
        let (_id2, _rx2) = hub.open_with_receiver("s1").await.unwrap();

        let displaced = rx1.recv().await.unwrap();
        assert!(matches!(displaced, StreamMessage::SessionEnd { .. }));
    }

    #[tokio::test]
    async fn send_to_unknown_session_is_a_no_op() {
        let hub = StreamHub::start(DEFAULT_MAX_CONNECTIONS);
        hub.send_to_session(
            "ghost",
            StreamMessage::FinalResponse {
                session_id: "ghost".to_string(),
                text: "unreachable".to_string(),
            },
        )
        .await;
    }

    #[tokio::test]
    async fn close_removes_the_connection() {
        let hub = StreamHub::start(DEFAULT_MAX_CONNECTIONS);
        let (connection_id, _rx) = hub.open_with_receiver("s1").await.unwrap();
        hub.close(&connection_id).await;

        hub.send_to_session(
            "s1",
            StreamMessage::FinalResponse {
                session_id: "s1".to_string(),
                text: "x".to_string(),
            },
        )
        .await;

        let (_id, mut rx) = hub.open_with_receiver("s1").await.unwrap();
        assert!(rx.try_recv().is_err());
    }
}
