//! Serialization of the dashboard state to a [`KeyValueStore`].
//!
//! Posts and statistics live under two separate keys and are always written
//! together.  Loading never fails: anything unreadable is treated as a first
//! run.

use feedboard_shared::constants::{POSTS_KEY, STATS_KEY};

use crate::error::{Result, StoreError};
use crate::kv::KeyValueStore;
use crate::models::{Post, Statistics};

/// Everything that survives a reload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedState {
    pub posts: Vec<Post>,
    pub statistics: Statistics,
}

impl PersistedState {
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty() && self.statistics == Statistics::default()
    }
}

/// Persistence adapter over a key-value backend.
pub struct Persistence<K> {
    kv: K,
}

impl<K: KeyValueStore> Persistence<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    pub fn backend(&self) -> &K {
        &self.kv
    }

    pub fn backend_mut(&mut self) -> &mut K {
        &mut self.kv
    }

    /// Overwrite both stored values with the given state.
    pub fn save(&mut self, posts: &[Post], statistics: &Statistics) -> Result<()> {
        let posts_json = serde_json::to_string(posts)?;
        let stats_json = serde_json::to_string(statistics)?;

        self.kv.set_many(&[
            (POSTS_KEY, posts_json.as_str()),
            (STATS_KEY, stats_json.as_str()),
        ])?;

        tracing::debug!(
            posts = posts.len(),
            bytes = posts_json.len() + stats_json.len(),
            "state saved"
        );
        Ok(())
    }

    /// Load the stored state, falling back to the default on any failure.
    pub fn load(&self) -> PersistedState {
        match self.try_load() {
            Ok(Some(state)) => {
                tracing::info!(posts = state.posts.len(), "state loaded");
                state
            }
            Ok(None) => {
                tracing::info!("no stored state, starting fresh");
                PersistedState::default()
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load stored state, starting fresh");
                PersistedState::default()
            }
        }
    }

    /// Load the stored state, surfacing read and parse errors.
    ///
    /// Returns `Ok(None)` when no posts have ever been stored.  Statistics
    /// that disagree with the stored posts are replaced by the recomputed
    /// counters.
    pub fn try_load(&self) -> Result<Option<PersistedState>> {
        let Some(posts_json) = self.kv.get(POSTS_KEY)? else {
            return Ok(None);
        };
        let posts: Vec<Post> = serde_json::from_str(&posts_json)?;

        let expected = Statistics::from_posts(&posts).ok_or_else(|| {
            StoreError::Inconsistent("statistics of stored posts overflow".to_string())
        })?;
        let statistics = match self.kv.get(STATS_KEY)? {
            Some(stats_json) => {
                let stored: Statistics = serde_json::from_str(&stats_json)?;
                if stored != expected {
                    tracing::warn!(
                        ?stored,
                        ?expected,
                        "stored statistics disagree with posts, using recomputed counters"
                    );
                }
                expected
            }
            None => {
                tracing::warn!("statistics missing from store, recomputing");
                expected
            }
        };

        Ok(Some(PersistedState { posts, statistics }))
    }

    /// Remove both stored values.
    pub fn clear(&mut self) -> Result<()> {
        self.kv.remove_many(&[POSTS_KEY, STATS_KEY])?;
        tracing::info!("stored state cleared");
        Ok(())
    }
}
