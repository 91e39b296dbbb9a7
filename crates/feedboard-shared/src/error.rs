use thiserror::Error;

use crate::types::{CommentId, PostId};

/// Failure taxonomy shared by every layer of the dashboard.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    /// A required text field was empty after trimming.
    #[error("Validation error: {field} must not be empty")]
    Validation { field: &'static str },

    #[error("Post not found: {0}")]
    PostNotFound(PostId),

    #[error("Comment {comment} not found on post {post}")]
    CommentNotFound { post: PostId, comment: CommentId },

    /// Aggregate counters or markup tags are not what they must be.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl DashboardError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PostNotFound(_) | Self::CommentNotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
