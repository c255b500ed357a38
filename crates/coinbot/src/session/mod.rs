//! Session management for bot users
//!
//! A [`Session`] bundles the navigation state and the favorites of one
//! user. Sessions live in a [`SessionRegistry`] for the lifetime of the
//! process; there is no expiry and nothing is persisted.

pub mod favorites;
pub mod registry;
pub mod store;

pub use favorites::{AddOutcome, ClearOutcome, Favorites, RemoveOutcome};
pub use registry::{SessionGuard, SessionRegistry};
pub use store::FavoritesStore;

use crate::navigation::NavState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-user state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub nav_state: NavState,
    pub favorites: Favorites,
    pub last_active: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            nav_state: NavState::Idle,
            favorites: Favorites::new(),
            last_active: Utc::now(),
        }
    }

    pub fn update_activity(&mut self) {
        self.last_active = Utc::now();
    }
}
