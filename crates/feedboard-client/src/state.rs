//! Session-local UI state.
//!
//! The [`Session`] holds everything that is *not* persisted: which view and
//! category filter are active, which comment panels are expanded, and the
//! drafts of the create/edit forms.  Nothing in here ever reaches the
//! [`PostStore`](crate::posts::PostStore) unless a form is submitted.

use std::collections::BTreeSet;

use feedboard_shared::{CategoryFilter, PostId, View};

/// The edit form, pre-filled from the post being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub post_id: PostId,
    pub content: String,
}

/// Central session state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Navigation view (feed / trending / saved).
    pub active_view: View,

    /// Category filter applied within the active view.
    pub category_filter: CategoryFilter,

    /// Posts whose comment panel is expanded.
    open_panels: BTreeSet<PostId>,

    /// Open edit form, if any.
    edit_draft: Option<EditDraft>,

    /// Whether the create-post form is showing.
    create_open: bool,
}

impl Session {
    /// Create a fresh session: feed view, no filter, everything collapsed.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_panels(&self) -> &BTreeSet<PostId> {
        &self.open_panels
    }

    pub fn is_panel_open(&self, id: &PostId) -> bool {
        self.open_panels.contains(id)
    }

    /// Expand or collapse a comment panel.  Returns the new state.
    pub fn toggle_panel(&mut self, id: &PostId) -> bool {
        if self.open_panels.remove(id) {
            false
        } else {
            self.open_panels.insert(id.clone());
            true
        }
    }

    pub fn open_panel(&mut self, id: &PostId) {
        if !self.open_panels.contains(id) {
            self.open_panels.insert(id.clone());
        }
    }

    pub fn edit_draft(&self) -> Option<&EditDraft> {
        self.edit_draft.as_ref()
    }

    pub fn begin_edit(&mut self, post_id: PostId, content: impl Into<String>) {
        self.edit_draft = Some(EditDraft {
            post_id,
            content: content.into(),
        });
    }

    pub fn close_edit(&mut self) -> Option<EditDraft> {
        self.edit_draft.take()
    }

    pub fn is_create_open(&self) -> bool {
        self.create_open
    }

    pub fn set_create_open(&mut self, open: bool) {
        self.create_open = open;
    }

    /// Drop every reference to a post that no longer exists.
    pub fn forget_post(&mut self, id: &PostId) {
        self.open_panels.remove(id);
        if self.edit_draft.as_ref().is_some_and(|d| &d.post_id == id) {
            self.edit_draft = None;
        }
    }
}
