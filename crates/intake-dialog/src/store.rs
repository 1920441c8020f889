//! Session storage keyed by call identifier.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use intake_types::CallSession;

/// Storage for active call sessions.
///
/// The platform delivers events for one call strictly in sequence, so the
/// engine is the single writer per call id; implementations only need to be
/// safe for concurrent access across *different* call ids.
pub trait SessionStore: Send + Sync {
    /// Returns a copy of the session for the given call id, if one exists.
    fn get(&self, call_id: &str) -> Option<CallSession>;

    /// Inserts or replaces the session for its call id.
    fn put(&self, session: CallSession);

    /// Removes and returns the session for the given call id.
    fn remove(&self, call_id: &str) -> Option<CallSession>;
}

/// In-memory session store.
///
/// Uses `std::sync::RwLock` intentionally: all lock acquisitions are brief
/// HashMap operations (get/insert/remove) that never span `.await` points,
/// making a synchronous lock safe and cheaper than an async one. Sessions
/// are plain data, so a poisoned lock is recovered rather than propagated;
/// the worst case is one lost update on a call that already panicked.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    sessions: Arc<RwLock<HashMap<String, CallSession>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of active sessions.
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, call_id: &str) -> Option<CallSession> {
        self.sessions
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(call_id)
            .cloned()
    }

    fn put(&self, session: CallSession) {
        self.sessions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(session.call_id.clone(), session);
    }

    fn remove(&self, call_id: &str) -> Option<CallSession> {
        self.sessions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(call_id)
    }
}
