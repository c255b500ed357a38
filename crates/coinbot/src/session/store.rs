//! Favorites keyed by user id
//!
//! Each call takes the user's session lock, so concurrent mutations for the
//! same user are serialized and the duplicate-free invariant holds.

use super::{AddOutcome, ClearOutcome, RemoveOutcome, SessionRegistry};
use std::sync::Arc;
use tracing::info;

/// Favorites operations over the shared session registry
#[derive(Debug, Clone)]
pub struct FavoritesStore {
    sessions: Arc<SessionRegistry>,
}

impl FavoritesStore {
    pub fn new(sessions: Arc<SessionRegistry>) -> Self {
        Self { sessions }
    }

    pub async fn add(&self, user_id: &str, coin_id: &str) -> AddOutcome {
        let outcome = self.sessions.lock(user_id).await.favorites.add(coin_id);
        info!(user_id, coin_id, ?outcome, "add favorite");
        outcome
    }

    pub async fn remove(&self, user_id: &str, coin_id: &str) -> RemoveOutcome {
        let outcome = self.sessions.lock(user_id).await.favorites.remove(coin_id);
        info!(user_id, coin_id, ?outcome, "remove favorite");
        outcome
    }

    pub async fn clear(&self, user_id: &str) -> ClearOutcome {
        let outcome = self.sessions.lock(user_id).await.favorites.clear();
        info!(user_id, "cleared favorites");
        outcome
    }

    /// Favorite coin ids in insertion order, empty for an unknown user
    pub async fn list(&self, user_id: &str) -> Vec<String> {
        self.sessions
            .read(user_id, |session| session.favorites.list().to_vec())
            .await
            .unwrap_or_default()
    }

    pub async fn contains(&self, user_id: &str, coin_id: &str) -> bool {
        self.sessions
            .read(user_id, |session| session.favorites.contains(coin_id))
            .await
            .unwrap_or(false)
    }
}
