//! Per-session translation state and the store the web host keeps it in

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

/// State of one interaction session
///
/// `translate_result` is always the translation of `last_input`, or empty
/// when no call has succeeded yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    last_input: String,
    translate_result: String,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_input(&self) -> &str {
        &self.last_input
    }

    pub fn translate_result(&self) -> &str {
        &self.translate_result
    }

    /// Cached translation for `text`, if it is the last translated input
    pub fn cached_for(&self, text: &str) -> Option<&str> {
        if !self.translate_result.is_empty() && self.last_input == text {
            Some(&self.translate_result)
        } else {
            None
        }
    }

    /// Store a successful translation
    pub(crate) fn record(&mut self, input: &str, result: String) {
        self.last_input = input.to_string();
        self.translate_result = result;
    }

    /// Whether a UI trigger should attempt a translation
    ///
    /// Fires on an explicit click or when the text differs from the last
    /// translated input; blank text never fires.
    pub fn should_translate(&self, text: &str, clicked: bool) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        clicked || text != self.last_input
    }
}

/// Shared handle to one session's state
pub type SessionHandle = Arc<Mutex<SessionState>>;

#[derive(Debug)]
struct SessionEntry {
    state: SessionHandle,
    last_seen: DateTime<Utc>,
}

/// In-memory sessions keyed by cookie id
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<Uuid, SessionEntry>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `id`, or start a new session when it is missing or unknown
    pub fn get_or_create(&self, id: Option<Uuid>) -> (Uuid, SessionHandle) {
        let now = Utc::now();

        if let Some(id) = id {
            if let Some(mut entry) = self.sessions.get_mut(&id) {
                entry.last_seen = now;
                return (id, entry.state.clone());
            }
        }

        let id = Uuid::new_v4();
        let state = SessionHandle::default();
        self.sessions.insert(
            id,
            SessionEntry {
                state: state.clone(),
                last_seen: now,
            },
        );
        debug!("Started session {}", id);

        (id, state)
    }

    /// Drop sessions idle for longer than `max_idle`, returning how many went
    pub fn prune_idle(&self, max_idle: Duration) -> usize {
        let max_idle = chrono::Duration::from_std(max_idle).unwrap_or_else(|_| chrono::Duration::days(36_500));
        let cutoff = Utc::now() - max_idle;
        let before = self.sessions.len();

        self.sessions.retain(|_, entry| entry.last_seen >= cutoff);

        let pruned = before.saturating_sub(self.sessions.len());
        if pruned > 0 {
            info!("Pruned {} idle sessions", pruned);
        }
        pruned
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_empty() {
        let state = SessionState::new();
        assert_eq!(state.last_input(), "");
        assert_eq!(state.translate_result(), "");
        assert!(state.cached_for("").is_none());
    }

    #[test]
    fn test_cache_matches_exact_input() {
        let mut state = SessionState::new();
        state.record("Hello", "Salaam".to_string());

        assert_eq!(state.cached_for("Hello"), Some("Salaam"));
        assert!(state.cached_for("Hello ").is_none());
        assert!(state.cached_for("hello").is_none());
    }

    #[test]
    fn test_trigger_rules() {
        let mut state = SessionState::new();

        assert!(!state.should_translate("   ", true));
        assert!(state.should_translate("Hello", false));

        state.record("Hello", "Salaam".to_string());
        assert!(!state.should_translate("Hello", false));
        assert!(state.should_translate("Hello", true));
        assert!(state.should_translate("Shukriya", false));
    }

    #[tokio::test]
    async fn test_store_reuses_known_session() {
        let store = SessionStore::new();
        let (id, handle) = store.get_or_create(None);
        handle.lock().await.record("Hello", "Salaam".to_string());

        let (same_id, same) = store.get_or_create(Some(id));
        assert_eq!(same_id, id);
        assert_eq!(same.lock().await.translate_result(), "Salaam");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_replaces_unknown_id() {
        let store = SessionStore::new();
        let stale = Uuid::new_v4();

        let (id, _) = store.get_or_create(Some(stale));
        assert_ne!(id, stale);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_prune_idle() {
        let store = SessionStore::new();
        store.get_or_create(None);
        store.get_or_create(None);

        assert_eq!(store.prune_idle(Duration::from_secs(3600)), 0);
        assert_eq!(store.len(), 2);

        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(store.prune_idle(Duration::from_millis(1)), 2);
        assert!(store.is_empty());
    }
}
