use feedboard_shared::DashboardError;
use thiserror::Error;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite error.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A stored value could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to determine a platform data directory.
    #[error("Could not determine application data directory")]
    NoDataDir,

    /// Generic I/O error (e.g. creating the database directory).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored values parse but cannot describe a valid state.
    #[error("Inconsistent stored state: {0}")]
    Inconsistent(String),

    /// Migration failure.
    #[error("Migration error: {0}")]
    Migration(String),
}

impl From<StoreError> for DashboardError {
    fn from(e: StoreError) -> Self {
        DashboardError::Persistence(e.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
