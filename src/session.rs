//! Per-browser session state.
//!
//! ARCHITECTURE
//! ============
//! A `Session` is an explicit value handed to every dashboard operation:
//! created when a browser first arrives (or when the CLI starts), mutated
//! only by login/logout/generate/history, discarded when it goes idle or
//! the store goes away. The web server keys sessions by an opaque random id carried in an
//! HttpOnly cookie; nothing is persisted, and idle sessions are evicted.

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::backend::types::{GenerationResult, HistoryEntry};
use crate::config::{DEFAULT_MAX_SESSIONS, DEFAULT_SESSION_IDLE_SECS, DEV_BYPASS_TOKEN, DashboardConfig};

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a random 32-byte hex session id.
#[must_use]
pub fn generate_session_id() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

// =============================================================================
// SESSION
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    /// Bearer token returned by the backend login.
    pub token: Option<String>,
    pub user_email: Option<String>,
    /// Result of the most recent generate action.
    pub last_generation: Option<GenerationResult>,
    /// Last successfully loaded history list.
    pub history: Option<Vec<HistoryEntry>>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// New session, pre-authenticated when the developer bypass is active.
    #[must_use]
    pub fn for_config(config: &DashboardConfig) -> Self {
        let mut session = Self::new();
        if config.dev_bypass_active() {
            session.login(DEV_BYPASS_TOKEN.to_owned(), config.admin_email.clone());
        }
        session
    }

    pub fn login(&mut self, token: String, email: String) {
        self.token = Some(token);
        self.user_email = Some(email);
    }

    pub fn logout(&mut self) {
        self.token = None;
        self.user_email = None;
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.bearer().is_some()
    }

    /// Token to attach as a bearer credential, if any.
    #[must_use]
    pub fn bearer(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    #[must_use]
    pub fn is_dev_bypass(&self) -> bool {
        self.token.as_deref() == Some(DEV_BYPASS_TOKEN)
    }
}

// =============================================================================
// STORE
// =============================================================================

/// Shared handle to one session. Handlers hold its lock for a whole action
/// so concurrent requests from the same browser apply in order.
pub type SessionHandle = Arc<Mutex<Session>>;

struct Entry {
    session: SessionHandle,
    last_seen: Instant,
}

/// In-memory map of live sessions. Clone shares the same map.
///
/// Entries idle longer than `idle_timeout` are evicted whenever a session is
/// created, and the map never holds more than `max_sessions` entries: when
/// full, the least recently seen session is dropped.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Entry>>>,
    idle_timeout: Duration,
    max_sessions: usize,
}

impl SessionStore {
    #[must_use]
    pub fn new(idle_timeout: Duration, max_sessions: usize) -> Self {
        Self { sessions: Arc::default(), idle_timeout, max_sessions: max_sessions.max(1) }
    }

    /// Insert `session` under a fresh id and return the id with its handle.
    pub async fn create(&self, session: Session) -> (String, SessionHandle) {
        let id = generate_session_id();
        let handle = Arc::new(Mutex::new(session));
        let now = Instant::now();

        let mut sessions = self.sessions.write().await;
        let idle_timeout = self.idle_timeout;
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_seen) < idle_timeout);
        let expired = before - sessions.len();
        if expired > 0 {
            debug!(expired, "idle sessions evicted");
        }

        while sessions.len() >= self.max_sessions {
            let Some(oldest) = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| id.clone())
            else {
                break;
            };
            sessions.remove(&oldest);
            warn!(max_sessions = self.max_sessions, "session store full, dropped least recently seen");
        }

        sessions.insert(id.clone(), Entry { session: handle.clone(), last_seen: now });
        (id, handle)
    }

    /// Handle for `id`, refreshing its idle timer. Expired sessions are
    /// removed and reported as unknown.
    pub async fn get(&self, id: &str) -> Option<SessionHandle> {
        let now = Instant::now();
        {
            let mut sessions = self.sessions.write().await;
            let entry = sessions.get_mut(id)?;
            if now.duration_since(entry.last_seen) < self.idle_timeout {
                entry.last_seen = now;
                return Some(entry.session.clone());
            }
        }
        debug!("idle session expired");
        self.remove(id).await;
        None
    }

    pub async fn remove(&self, id: &str) -> Option<SessionHandle> {
        self.sessions.write().await.remove(id).map(|entry| entry.session)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_SESSION_IDLE_SECS), DEFAULT_MAX_SESSIONS)
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
