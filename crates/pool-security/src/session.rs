//! Server-held sessions keyed by an opaque per-browser token.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use sha2::{Digest, Sha256};
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use pool_shared::constants::SESSION_TOKEN_BYTES;

/// Opaque session token handed to the browser.
///
/// `Debug` and `Display` print a short fingerprint instead of the token so
/// it can appear in logs.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn generate() -> Self {
        let bytes: [u8; SESSION_TOKEN_BYTES] = rand::random();
        Self(hex::encode(bytes))
    }

    /// Wraps a token received from a client. Blank input is not a token.
    pub fn from_raw(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.0.as_bytes());
        hex::encode(&digest[..6])
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionToken({})", self.fingerprint())
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fingerprint())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SessionEntry {
    pub user_id: Uuid,
    pub issued_at: Instant,
}

impl SessionEntry {
    pub fn is_expired(&self, max_age: Duration) -> bool {
        self.issued_at.elapsed() >= max_age
    }
}

/// Thread-safe token -> user id map.
///
/// Each token is its own DashMap key, so sessions of different browsers
/// never contend on the same entry.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<DashMap<SessionToken, SessionEntry>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `user_id` for the token, replacing any previous identity.
    pub fn insert(&self, token: &SessionToken, user_id: Uuid) {
        let entry = SessionEntry {
            user_id,
            issued_at: Instant::now(),
        };
        if let Some(previous) = self.sessions.insert(token.clone(), entry) {
            debug!(
                "Session {} rebound from user {} to {}",
                token, previous.user_id, user_id
            );
        }
    }

    pub fn user_id(&self, token: &SessionToken) -> Option<Uuid> {
        self.sessions.get(token).map(|entry| entry.user_id)
    }

    pub fn entry(&self, token: &SessionToken) -> Option<SessionEntry> {
        self.sessions.get(token).map(|entry| *entry.value())
    }

    pub fn remove(&self, token: &SessionToken) -> Option<SessionEntry> {
        self.sessions.remove(token).map(|(_, entry)| entry)
    }

    /// Drops sessions older than `max_age`, returning how many went.
    pub fn purge_expired(&self, max_age: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, entry| !entry.is_expired(max_age));
        before.saturating_sub(self.sessions.len())
    }

    /// Drops every session. Intended for tests and controlled resets.
    pub fn clear(&self) {
        self.sessions.clear();
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
