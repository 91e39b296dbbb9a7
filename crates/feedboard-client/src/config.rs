//! Dashboard configuration loaded from environment variables.
//!
//! All settings have defaults so the dashboard starts with zero
//! configuration.

use std::path::PathBuf;

use feedboard_shared::constants::{DEFAULT_AUTHOR, DEFAULT_TRENDING_MIN_LIKES};
use feedboard_store::{Database, Result as StoreResult};

/// Dashboard configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// SQLite file holding the persisted state.
    /// Env: `FEEDBOARD_DB_PATH`
    /// Default: `feedboard.db` in the platform data directory.
    pub db_path: Option<PathBuf>,

    /// Display name stamped on new posts and comments.
    /// Env: `FEEDBOARD_AUTHOR`
    /// Default: `"You"`
    pub author: String,

    /// Minimum like count for the trending view.
    /// Env: `FEEDBOARD_TRENDING_MIN_LIKES`
    /// Default: `1`
    pub trending_min_likes: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            author: DEFAULT_AUTHOR.to_string(),
            trending_min_likes: DEFAULT_TRENDING_MIN_LIKES,
        }
    }
}

impl DashboardConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup("FEEDBOARD_DB_PATH") {
            if !path.trim().is_empty() {
                config.db_path = Some(PathBuf::from(path));
            }
        }

        if let Some(author) = lookup("FEEDBOARD_AUTHOR") {
            let author = author.trim();
            if !author.is_empty() {
                config.author = author.to_string();
            }
        }

        if let Some(val) = lookup("FEEDBOARD_TRENDING_MIN_LIKES") {
            match val.trim().parse::<u64>() {
                Ok(n) => config.trending_min_likes = n,
                Err(e) => {
                    tracing::warn!(
                        value = %val,
                        error = %e,
                        "Invalid FEEDBOARD_TRENDING_MIN_LIKES, using default"
                    );
                }
            }
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter.

        config
    }

    /// Open the configured database.
    pub fn open_database(&self) -> StoreResult<Database> {
        match &self.db_path {
            Some(path) => Database::open_at(path),
            None => Database::new(),
        }
    }
}
