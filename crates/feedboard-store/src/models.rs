//! Domain model structs persisted in the key-value store.
//!
//! Field names on the wire match the storage format the dashboard has always
//! written (`likes`, `timestamp`, camelCase statistics, string ids), so an
//! existing store keeps loading.

use chrono::{DateTime, SubsecRound, Utc};
use feedboard_shared::{Category, CommentId, PostId};
use serde::{Deserialize, Serialize};

/// Current instant at the precision timestamps are stored with.
///
/// Timestamps are persisted as epoch milliseconds; truncating at creation
/// keeps a save/load cycle lossless.
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

// ---------------------------------------------------------------------------
// Comment
// ---------------------------------------------------------------------------

/// A reply attached to exactly one post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub author: String,
    pub text: String,
    #[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: CommentId::new(),
            author: author.into(),
            text: text.into(),
            created_at: now_millis(),
        }
    }
}

// ---------------------------------------------------------------------------
// Post
// ---------------------------------------------------------------------------

/// A user-authored feed item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    /// Assigned at creation, never changes.
    pub id: PostId,
    pub content: String,
    pub category: Category,
    pub author: String,
    /// Only the like toggle moves this.
    #[serde(rename = "likes")]
    pub like_count: u64,
    /// Whether the current user liked the post.
    pub liked: bool,
    pub saved: bool,
    /// Chronological; new comments go at the tail.
    pub comments: Vec<Comment>,
    #[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn new(author: impl Into<String>, content: impl Into<String>, category: Category) -> Self {
        Self {
            id: PostId::new(),
            content: content.into(),
            category,
            author: author.into(),
            like_count: 0,
            liked: false,
            saved: false,
            comments: Vec::new(),
            created_at: now_millis(),
        }
    }

    pub fn comment(&self, id: &CommentId) -> Option<&Comment> {
        self.comments.iter().find(|c| &c.id == id)
    }
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Usage counters shown in the dashboard sidebar.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub posts_created: u64,
    pub total_likes: u64,
    pub comments_made: u64,
}

impl Statistics {
    /// Recompute the counters from scratch.
    ///
    /// Returns `None` if a counter would overflow, which only happens with
    /// tampered storage.
    pub fn from_posts(posts: &[Post]) -> Option<Self> {
        posts.iter().try_fold(Self::default(), |acc, p| {
            Some(Self {
                posts_created: acc.posts_created.checked_add(1)?,
                total_likes: acc.total_likes.checked_add(p.like_count)?,
                comments_made: acc
                    .comments_made
                    .checked_add(u64::try_from(p.comments.len()).ok()?)?,
            })
        })
    }
}
