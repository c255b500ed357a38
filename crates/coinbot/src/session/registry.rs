//! In-memory session table with one async mutex per user
//!
//! The outer map is guarded by a short-lived std mutex that is never held
//! across an `.await`. Each session sits behind its own tokio mutex, held
//! for the whole handling of one event, so events for the same user queue
//! up while different users proceed in parallel.

use super::Session;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::debug;

/// Exclusive access to one user's session, released on drop
pub type SessionGuard = OwnedMutexGuard<Session>;

/// Process-lifetime table of user sessions
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, Arc<AsyncMutex<Session>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, user_id: &str) -> Arc<AsyncMutex<Session>> {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(slot) = sessions.get(user_id) {
            return Arc::clone(slot);
        }

        debug!(user_id, "creating session");
        let slot = Arc::new(AsyncMutex::new(Session::new(user_id)));
        sessions.insert(user_id.to_string(), Arc::clone(&slot));
        slot
    }

    /// Lock the session of `user_id`, creating it on first use
    pub async fn lock(&self, user_id: &str) -> SessionGuard {
        let mut guard = self.slot(user_id).lock_owned().await;
        debug!(user_id, last_active = %guard.last_active, "session locked");
        guard.update_activity();
        guard
    }

    fn existing(&self, user_id: &str) -> Option<Arc<AsyncMutex<Session>>> {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(user_id)
            .cloned()
    }

    /// Read the session of `user_id` without creating it
    ///
    /// Waits for any in-flight event. Returns `None` for an unknown user.
    pub async fn read<T>(&self, user_id: &str, f: impl FnOnce(&Session) -> T) -> Option<T> {
        let slot = self.existing(user_id)?;
        let session = slot.lock().await;
        Some(f(&session))
    }

    /// Copy of the current session, waiting for any in-flight event
    pub async fn snapshot(&self, user_id: &str) -> Option<Session> {
        self.read(user_id, Session::clone).await
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.existing(user_id).is_some()
    }
}
