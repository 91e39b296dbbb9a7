//! Statistics bookkeeping.
//!
//! Every mutation in [`crate::posts`] describes its effect on the counters as
//! a [`StatsDelta`]; [`apply`] is the only place the counters change.

use feedboard_shared::{DashboardError, PostId, Result};
use feedboard_store::{Post, Statistics};

/// Signed change to each counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsDelta {
    pub posts: i64,
    pub likes: i64,
    pub comments: i64,
}

impl StatsDelta {
    pub const NONE: StatsDelta = StatsDelta {
        posts: 0,
        likes: 0,
        comments: 0,
    };

    pub fn post_created() -> Self {
        Self {
            posts: 1,
            ..Self::NONE
        }
    }

    pub fn like_toggled(now_liked: bool) -> Self {
        Self {
            likes: if now_liked { 1 } else { -1 },
            ..Self::NONE
        }
    }

    pub fn comment_added() -> Self {
        Self {
            comments: 1,
            ..Self::NONE
        }
    }

    pub fn comment_removed() -> Self {
        Self {
            comments: -1,
            ..Self::NONE
        }
    }

    /// Removes everything `post` contributed.
    ///
    /// Fails if a count does not fit the signed delta.
    pub fn post_removed(post: &Post) -> Result<Self> {
        let likes = i64::try_from(post.like_count)
            .map_err(|_| out_of_range(&post.id, "like count", post.like_count))?;
        let comments = i64::try_from(post.comments.len())
            .map_err(|_| out_of_range(&post.id, "comment count", post.comments.len() as u64))?;
        Ok(Self {
            posts: -1,
            likes: -likes,
            comments: -comments,
        })
    }

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

/// Return `stats` shifted by `delta`.
///
/// Fails with [`DashboardError::InvariantViolation`] if any counter would
/// drop below zero; `stats` is left as it was.
pub fn apply(stats: &Statistics, delta: StatsDelta) -> Result<Statistics> {
    Ok(Statistics {
        posts_created: shift(stats.posts_created, delta.posts, "postsCreated")?,
        total_likes: shift(stats.total_likes, delta.likes, "totalLikes")?,
        comments_made: shift(stats.comments_made, delta.comments, "commentsMade")?,
    })
}

fn out_of_range(post: &PostId, what: &str, value: u64) -> DashboardError {
    DashboardError::InvariantViolation(format!("{what} of post {post} out of range ({value})"))
}

fn shift(value: u64, by: i64, counter: &str) -> Result<u64> {
    value.checked_add_signed(by).ok_or_else(|| {
        DashboardError::InvariantViolation(format!(
            "{counter} would leave range ({value} {by:+})"
        ))
    })
}
