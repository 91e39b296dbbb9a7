//! # feedboard-store
//!
//! Local durable storage for the dashboard.
//!
//! State is kept as JSON text under string keys.  The crate exposes the
//! [`KeyValueStore`] seam, a SQLite-backed [`Database`] implementing it, an
//! in-memory [`MemoryStore`], and the [`Persistence`] adapter that maps the
//! post collection and statistics onto their two storage keys.

pub mod database;
pub mod kv;
pub mod migrations;
pub mod models;
pub mod persistence;

mod error;

pub use database::Database;
pub use error::{Result, StoreError};
pub use kv::{KeyValueStore, MemoryStore};
pub use models::*;
pub use persistence::{PersistedState, Persistence};
