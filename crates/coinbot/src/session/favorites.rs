//! Per-user favorites list
//!
//! An insertion ordered, duplicate-free sequence of coin ids. Mutations
//! report what happened instead of failing.

use serde::{Deserialize, Serialize};

/// Result of adding a coin to the favorites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
}

/// Result of removing a coin from the favorites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemoveOutcome {
    Removed,
    NotPresent,
}

/// Result of clearing the favorites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClearOutcome {
    Cleared,
}

/// Ordered set of favorite coin ids
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorites {
    coin_ids: Vec<String>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `coin_id` unless it is already present
    pub fn add(&mut self, coin_id: impl Into<String>) -> AddOutcome {
        let coin_id = coin_id.into();
        if self.contains(&coin_id) {
            AddOutcome::AlreadyPresent
        } else {
            self.coin_ids.push(coin_id);
            AddOutcome::Added
        }
    }

    /// Remove `coin_id`, keeping the order of the remaining ids
    pub fn remove(&mut self, coin_id: &str) -> RemoveOutcome {
        match self.coin_ids.iter().position(|id| id == coin_id) {
            Some(pos) => {
                self.coin_ids.remove(pos);
                RemoveOutcome::Removed
            }
            None => RemoveOutcome::NotPresent,
        }
    }

    pub fn clear(&mut self) -> ClearOutcome {
        self.coin_ids.clear();
        ClearOutcome::Cleared
    }

    pub fn contains(&self, coin_id: &str) -> bool {
        self.coin_ids.iter().any(|id| id == coin_id)
    }

    /// Ids in insertion order
    pub fn list(&self) -> &[String] {
        &self.coin_ids
    }

    pub fn len(&self) -> usize {
        self.coin_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coin_ids.is_empty()
    }
}
