//! The dashboard façade.
//!
//! [`Dashboard`] wires the pieces together: events go through the
//! dispatcher, mutate the [`PostStore`] (which persists), and the document is
//! re-rendered before control returns.  Forms that live outside the posts
//! region (create, edit, navigation, category filter) call in directly.

use chrono::{DateTime, Utc};
use feedboard_shared::{Category, CategoryFilter, CommentId, DashboardError, PostId, Result, View};
use feedboard_store::{KeyValueStore, Persistence, Post};

use crate::config::DashboardConfig;
use crate::dispatch::{self, ActionHandler, Confirm, DispatchOutcome, RawEvent};
use crate::document::{build_tree, ElementTree};
use crate::events::{Notice, NoticeQueue};
use crate::posts::PostStore;
use crate::render::{self, ProjectionContext, RenderFrame};
use crate::state::Session;

const DELETE_PROMPT: &str = "Are you sure you want to delete this post?";

pub struct Dashboard<K: KeyValueStore, C: Confirm> {
    store: PostStore<K>,
    session: Session,
    confirm: C,
    trending_min_likes: u64,
    document: ElementTree,
    notices: NoticeQueue,
}

impl<K: KeyValueStore, C: Confirm> Dashboard<K, C> {
    /// Load persisted state from `kv` and render the first frame.
    pub fn open(config: &DashboardConfig, kv: K, confirm: C) -> Self {
        let store = PostStore::open(Persistence::new(kv), config.author.clone());
        tracing::info!(
            posts = store.len(),
            author = %config.author,
            "dashboard opened"
        );

        let mut dashboard = Self {
            store,
            session: Session::new(),
            confirm,
            trending_min_likes: config.trending_min_likes,
            document: ElementTree::new(),
            notices: NoticeQueue::default(),
        };
        dashboard.refresh();
        dashboard
    }

    pub fn store(&self) -> &PostStore<K> {
        &self.store
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Tree from the last render.  Events must target nodes of this tree.
    pub fn document(&self) -> &ElementTree {
        &self.document
    }

    /// Mutable access for the input collaborator (typing into inputs).
    pub fn document_mut(&mut self) -> &mut ElementTree {
        &mut self.document
    }

    /// Notices produced since the last call.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    pub fn render(&self) -> RenderFrame {
        self.render_at(Utc::now())
    }

    pub fn render_at(&self, now: DateTime<Utc>) -> RenderFrame {
        let ctx = ProjectionContext {
            trending_min_likes: self.trending_min_likes,
            now,
            open_panels: self.session.open_panels(),
        };
        render::frame(
            self.store.posts(),
            self.store.statistics(),
            self.session.active_view,
            self.session.category_filter,
            &ctx,
        )
    }

    pub fn render_markup(&self) -> String {
        render::render_markup(&self.render())
    }

    fn refresh(&mut self) {
        let frame = self.render();
        tracing::trace!(
            items = frame.items.len(),
            revision = self.store.revision(),
            "rendered"
        );
        self.document = build_tree(&frame);
    }

    // ------------------------------------------------------------------
    // Delegated events
    // ------------------------------------------------------------------

    /// Handle one raw event from the posts region.
    pub fn dispatch(&mut self, event: RawEvent) -> Result<DispatchOutcome> {
        let outcome = dispatch::dispatch(self, event)?;
        if !outcome.is_inert() {
            if let Some(notice) = outcome.notice {
                self.notices.push(notice);
            }
            self.refresh();
        }
        Ok(outcome)
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub fn set_view(&mut self, view: View) {
        self.session.active_view = view;
        tracing::debug!(view = view.as_str(), "view changed");
        self.refresh();
    }

    pub fn set_category_filter(&mut self, filter: CategoryFilter) {
        self.session.category_filter = filter;
        tracing::debug!(filter = ?filter, "category filter changed");
        self.refresh();
    }

    // ------------------------------------------------------------------
    // Create form
    // ------------------------------------------------------------------

    pub fn open_create(&mut self) {
        self.session.set_create_open(true);
    }

    /// Submit the create form.  On a validation error the form stays open.
    pub fn submit_create(&mut self, content: &str, category: Category) -> Result<Post> {
        let post = self.store.create_post(content, category)?;
        self.session.set_create_open(false);
        self.notices.push(Notice::PostCreated);
        self.refresh();
        Ok(post)
    }

    pub fn cancel_create(&mut self) {
        self.session.set_create_open(false);
    }

    // ------------------------------------------------------------------
    // Edit form
    // ------------------------------------------------------------------

    /// Submit the edit form.  Returns `false` if no edit form is open.
    ///
    /// Empty content keeps the form open; a post that vanished closes it.
    pub fn submit_edit(&mut self, content: &str) -> Result<bool> {
        let Some(draft) = self.session.edit_draft() else {
            return Ok(false);
        };
        let post_id = draft.post_id.clone();

        match self.store.update_post(&post_id, content) {
            Ok(()) => {
                self.session.close_edit();
                self.notices.push(Notice::PostUpdated);
                self.refresh();
                Ok(true)
            }
            Err(e) if e.is_not_found() => {
                self.session.close_edit();
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    pub fn cancel_edit(&mut self) {
        self.session.close_edit();
    }

    // ------------------------------------------------------------------
    // Maintenance
    // ------------------------------------------------------------------

    /// Delete every post and the stored state.
    pub fn reset(&mut self) {
        self.store.reset();
        let mut session = Session::new();
        session.active_view = self.session.active_view;
        session.category_filter = self.session.category_filter;
        self.session = session;
        self.refresh();
    }
}

impl<K: KeyValueStore, C: Confirm> ActionHandler for Dashboard<K, C> {
    fn document(&self) -> &ElementTree {
        &self.document
    }

    fn revision(&self) -> u64 {
        self.store.revision()
    }

    fn like(&mut self, post: &PostId) -> Result<Option<Notice>> {
        self.store.toggle_like(post)?;
        Ok(None)
    }

    fn toggle_comments(&mut self, post: &PostId) -> Result<Option<Notice>> {
        if self.store.get(post).is_none() {
            return Err(DashboardError::PostNotFound(post.clone()));
        }
        self.session.toggle_panel(post);
        Ok(None)
    }

    fn save(&mut self, post: &PostId) -> Result<Option<Notice>> {
        let saved = self.store.toggle_save(post)?;
        Ok(Some(if saved {
            Notice::PostSaved
        } else {
            Notice::PostUnsaved
        }))
    }

    fn edit(&mut self, post: &PostId) -> Result<Option<Notice>> {
        let content = self
            .store
            .get(post)
            .ok_or_else(|| DashboardError::PostNotFound(post.clone()))?
            .content
            .clone();
        self.session.begin_edit(post.clone(), content);
        Ok(None)
    }

    fn delete(&mut self, post: &PostId) -> Result<Option<Notice>> {
        if !self.confirm.confirm(DELETE_PROMPT) {
            tracing::debug!(post_id = %post, "delete declined");
            return Ok(None);
        }
        self.store.delete_post(post)?;
        self.session.forget_post(post);
        Ok(Some(Notice::PostDeleted))
    }

    // The input is cleared by the re-render that follows every handled event.
    fn submit_comment(&mut self, post: &PostId, text: &str) -> Result<Option<Notice>> {
        self.store.add_comment(post, text)?;
        self.session.open_panel(post);
        Ok(Some(Notice::CommentAdded))
    }

    fn delete_comment(&mut self, post: &PostId, comment: &CommentId) -> Result<Option<Notice>> {
        self.store.delete_comment(post, comment)?;
        self.session.open_panel(post);
        Ok(None)
    }
}
