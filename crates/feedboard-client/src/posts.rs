//! The authoritative post collection.
//!
//! [`PostStore`] owns every post, the statistics aggregate and the
//! persistence adapter.  Each successful mutation applies its
//! [`StatsDelta`], writes the whole state back to storage and bumps
//! [`PostStore::revision`] so the render layer knows to redraw.
//!
//! A mutation either completes fully or leaves the store untouched: the new
//! statistics are computed before any post is modified.

use feedboard_shared::{Category, CommentId, DashboardError, PostId, Result};
use feedboard_store::{Comment, KeyValueStore, Persistence, Post, Statistics};

use crate::stats::{self, StatsDelta};

/// Owned copy of the store contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSnapshot {
    pub posts: Vec<Post>,
    pub statistics: Statistics,
}

pub struct PostStore<K: KeyValueStore> {
    posts: Vec<Post>,
    statistics: Statistics,
    persistence: Persistence<K>,
    author: String,
    revision: u64,
    save_failures: u64,
}

impl<K: KeyValueStore> PostStore<K> {
    /// Restore whatever `persistence` holds; unreadable storage starts empty.
    pub fn open(persistence: Persistence<K>, author: impl Into<String>) -> Self {
        let state = persistence.load();
        Self {
            posts: state.posts,
            statistics: state.statistics,
            persistence,
            author: author.into(),
            revision: 0,
            save_failures: 0,
        }
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Posts newest-first.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn statistics(&self) -> Statistics {
        self.statistics
    }

    pub fn get(&self, id: &PostId) -> Option<&Post> {
        self.posts.iter().find(|p| &p.id == id)
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Incremented by every successful mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of saves that failed since the store was opened.
    pub fn save_failures(&self) -> u64 {
        self.save_failures
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            posts: self.posts.clone(),
            statistics: self.statistics,
        }
    }

    pub fn persistence(&self) -> &Persistence<K> {
        &self.persistence
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Create a post at the head of the collection.
    pub fn create_post(&mut self, content: &str, category: Category) -> Result<Post> {
        let content = non_empty(content, "content")?;
        let next = stats::apply(&self.statistics, StatsDelta::post_created())?;

        let post = Post::new(self.author.clone(), content, category);
        self.posts.insert(0, post.clone());
        self.commit(next);

        tracing::info!(post_id = %post.id, category = %category, "post created");
        Ok(post)
    }

    /// Flip the like flag.  Returns the new `liked` value.
    pub fn toggle_like(&mut self, id: &PostId) -> Result<bool> {
        let idx = self.index_of(id)?;
        let post = &self.posts[idx];
        let now_liked = !post.liked;

        if !now_liked && post.like_count == 0 {
            tracing::error!(post_id = %id, "liked post has a zero like count");
            return Err(DashboardError::InvariantViolation(format!(
                "post {id} is liked but has no likes"
            )));
        }

        let next = stats::apply(&self.statistics, StatsDelta::like_toggled(now_liked))?;

        let post = &mut self.posts[idx];
        post.liked = now_liked;
        if now_liked {
            post.like_count += 1;
        } else {
            post.like_count -= 1;
        }
        let like_count = post.like_count;
        self.commit(next);

        tracing::debug!(post_id = %id, liked = now_liked, like_count, "like toggled");
        Ok(now_liked)
    }

    /// Flip the saved flag.  Returns the new `saved` value.
    pub fn toggle_save(&mut self, id: &PostId) -> Result<bool> {
        let idx = self.index_of(id)?;
        let post = &mut self.posts[idx];
        post.saved = !post.saved;
        let saved = post.saved;
        self.commit(self.statistics);

        tracing::debug!(post_id = %id, saved, "save toggled");
        Ok(saved)
    }

    /// Append a comment to the post's thread.
    pub fn add_comment(&mut self, id: &PostId, text: &str) -> Result<Comment> {
        let text = non_empty(text, "comment")?;
        let idx = self.index_of(id)?;
        let next = stats::apply(&self.statistics, StatsDelta::comment_added())?;

        let comment = Comment::new(self.author.clone(), text);
        self.posts[idx].comments.push(comment.clone());
        self.commit(next);

        tracing::info!(post_id = %id, comment_id = %comment.id, "comment added");
        Ok(comment)
    }

    /// Remove one comment.  Returns the removed comment.
    pub fn delete_comment(&mut self, id: &PostId, comment_id: &CommentId) -> Result<Comment> {
        let idx = self.index_of(id)?;
        let pos = self.posts[idx]
            .comments
            .iter()
            .position(|c| &c.id == comment_id)
            .ok_or_else(|| DashboardError::CommentNotFound {
                post: id.clone(),
                comment: comment_id.clone(),
            })?;
        let next = stats::apply(&self.statistics, StatsDelta::comment_removed())?;

        let removed = self.posts[idx].comments.remove(pos);
        self.commit(next);

        tracing::info!(post_id = %id, comment_id = %comment_id, "comment deleted");
        Ok(removed)
    }

    /// Replace a post's text.  Id, timestamps and counters are unchanged.
    pub fn update_post(&mut self, id: &PostId, new_content: &str) -> Result<()> {
        let content = non_empty(new_content, "content")?;
        let idx = self.index_of(id)?;

        self.posts[idx].content = content.to_string();
        self.commit(self.statistics);

        tracing::info!(post_id = %id, "post updated");
        Ok(())
    }

    /// Remove a post together with its comments and likes.
    pub fn delete_post(&mut self, id: &PostId) -> Result<Post> {
        let idx = self.index_of(id)?;
        let next = stats::apply(&self.statistics, StatsDelta::post_removed(&self.posts[idx])?)?;

        let removed = self.posts.remove(idx);
        self.commit(next);

        tracing::info!(
            post_id = %id,
            likes = removed.like_count,
            comments = removed.comments.len(),
            "post deleted"
        );
        Ok(removed)
    }

    /// Drop every post and clear storage.
    pub fn reset(&mut self) {
        self.posts.clear();
        self.statistics = Statistics::default();
        self.revision += 1;

        if let Err(e) = self.persistence.clear() {
            self.save_failures += 1;
            tracing::error!(error = %e, "failed to clear stored state");
        }
        tracing::info!("dashboard reset");
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn index_of(&self, id: &PostId) -> Result<usize> {
        self.posts
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| DashboardError::PostNotFound(id.clone()))
    }

    /// Install the new counters, persist, and signal a change.
    ///
    /// A failed save is logged and counted; memory stays authoritative.
    fn commit(&mut self, statistics: Statistics) {
        self.statistics = statistics;
        self.revision += 1;

        if let Err(e) = self.persistence.save(&self.posts, &self.statistics) {
            self.save_failures += 1;
            tracing::error!(error = %e, revision = self.revision, "failed to persist state");
        }
    }
}

fn non_empty<'a>(text: &'a str, field: &'static str) -> Result<&'a str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(DashboardError::Validation { field });
    }
    Ok(trimmed)
}
