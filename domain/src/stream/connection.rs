//! Stream Connection: a subscriber's registration with the Stream Hub.
//!
//! The queue itself (an mpsc sender bounded for backpressure) is an
//! infrastructure concern; this type holds only the metadata the domain
//! needs to reason about the single-subscriber-per-session invariant and
//! the inactivity sweep.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConnection {
    pub connection_id: String,
    pub session_id: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl StreamConnection {
    pub fn new(connection_id: impl Into<String>, session_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            connection_id: connection_id.into(),
            session_id: session_id.into(),
            active: true,
            created_at: now,
            last_activity: now,
        }
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_activity = now;
    }

    pub fn displace(&mut self) {
        self.active = false;
    }

    pub fn is_inactive(&self, now: DateTime<Utc>, idle_limit: chrono::Duration) -> bool {
        now - self.last_activity >= idle_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displaced_connection_is_inactive_for_dispatch() {
        let mut conn = StreamConnection::new("c1", "s1", Utc::now());
        assert!(conn.active);
        conn.displace();
        assert!(!conn.active);
    }

    #[test]
    fn idle_sweep_threshold() {
        let now = Utc::now();
        let conn = StreamConnection::new("c1", "s1", now - chrono::Duration::hours(2));
        assert!(conn.is_inactive(now, chrono::Duration::hours(1)));
    }
}
