//! # feedboard-shared
//!
//! Identifiers, enumerations, constants and the error taxonomy used by both
//! the storage layer and the dashboard client.

pub mod constants;
pub mod error;
pub mod types;

pub use error::{DashboardError, Result};
pub use types::{Category, CategoryFilter, CommentId, EmptyId, PostId, View};
