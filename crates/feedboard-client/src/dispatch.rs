//! Delegated event dispatch.
//!
//! One dispatcher serves the whole posts region.  A raw event only names the
//! element that was clicked; [`resolve`] walks up from it to find what the
//! click means, and [`dispatch`] routes the result through a table keyed by
//! [`ActionKind`].  Nothing is bound per element, so posts rendered after
//! start-up are handled the same as the rest.

use std::str::FromStr;

use feedboard_shared::constants::{
    CLASS_COMMENT_DELETE, CLASS_COMMENT_FORM, CLASS_COMMENT_INPUT, CLASS_COMMENT_SUBMIT,
    DATA_ACTION, DATA_COMMENT_ID, DATA_POST_ID,
};
use feedboard_shared::{CommentId, DashboardError, PostId, Result};

use crate::document::{ElementTree, NodeId};
use crate::events::Notice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Like,
    Comment,
    Save,
    Edit,
    Delete,
}

impl ActionKind {
    /// Every action, in the order the buttons appear on a post.
    pub const ALL: [ActionKind; 5] = [
        ActionKind::Like,
        ActionKind::Comment,
        ActionKind::Save,
        ActionKind::Edit,
        ActionKind::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Comment => "comment",
            Self::Save => "save",
            Self::Edit => "edit",
            Self::Delete => "delete",
        }
    }
}

impl FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown action: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Click,
    Submit,
}

/// A UI event as delivered by the input collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEvent {
    pub kind: EventKind,
    pub target: NodeId,
}

impl RawEvent {
    pub fn click(target: NodeId) -> Self {
        Self {
            kind: EventKind::Click,
            target,
        }
    }

    pub fn submit(target: NodeId) -> Self {
        Self {
            kind: EventKind::Submit,
            target,
        }
    }
}

/// What an event resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Action { kind: ActionKind, post: PostId },
    CommentSubmit { post: PostId, input: NodeId, text: String },
    CommentDelete { post: PostId, comment: CommentId },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DispatchOutcome {
    /// `None` when the event was inert.
    pub target: Option<Target>,
    /// Whether the post store was mutated.
    pub state_changed: bool,
    pub notice: Option<Notice>,
}

impl DispatchOutcome {
    pub fn inert() -> Self {
        Self::default()
    }

    pub fn is_inert(&self) -> bool {
        self.target.is_none()
    }
}

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Confirms everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}

/// Operations the dispatcher can route to.
pub trait ActionHandler {
    /// Tree the current events refer to.
    fn document(&self) -> &ElementTree;

    /// Store revision, compared before and after routing.
    fn revision(&self) -> u64;

    fn like(&mut self, post: &PostId) -> Result<Option<Notice>>;
    fn toggle_comments(&mut self, post: &PostId) -> Result<Option<Notice>>;
    fn save(&mut self, post: &PostId) -> Result<Option<Notice>>;
    fn edit(&mut self, post: &PostId) -> Result<Option<Notice>>;
    fn delete(&mut self, post: &PostId) -> Result<Option<Notice>>;

    /// `text` is already trimmed and non-empty.
    fn submit_comment(&mut self, post: &PostId, text: &str) -> Result<Option<Notice>>;
    fn delete_comment(&mut self, post: &PostId, comment: &CommentId) -> Result<Option<Notice>>;
}

type PostAction<H> = fn(&mut H, &PostId) -> Result<Option<Notice>>;

/// Action table.
fn route<H: ActionHandler>(kind: ActionKind) -> PostAction<H> {
    match kind {
        ActionKind::Like => H::like,
        ActionKind::Comment => H::toggle_comments,
        ActionKind::Save => H::save,
        ActionKind::Edit => H::edit,
        ActionKind::Delete => H::delete,
    }
}

/// Work out what a raw event refers to.
///
/// `Ok(None)` means the event is inert.  A region that is found but lacks the
/// tags it must carry is an [`DashboardError::InvariantViolation`].
pub fn resolve(tree: &ElementTree, event: RawEvent) -> Result<Option<Target>> {
    let from = event.target;
    if tree.get(from).is_none() {
        tracing::debug!(node = ?from, "event target not in current document");
        return Ok(None);
    }

    if let Some(button) = tree.closest_with_data(from, DATA_ACTION) {
        let name = tree
            .get(button)
            .and_then(|el| el.data_attr(DATA_ACTION))
            .unwrap_or_default();
        let kind = match name.parse::<ActionKind>() {
            Ok(kind) => kind,
            Err(e) => {
                tracing::debug!(error = %e, "ignoring unknown action");
                return Ok(None);
            }
        };
        let post = post_id_for(tree, button)?;
        return Ok(Some(Target::Action { kind, post }));
    }

    if let Some(form) = tree.closest_with_class(from, CLASS_COMMENT_FORM) {
        let submitted = event.kind == EventKind::Submit
            || tree.closest_with_class(from, CLASS_COMMENT_SUBMIT).is_some();
        if !submitted {
            return Ok(None);
        }
        let post = post_id_for(tree, form)?;
        let input = tree
            .find_descendant(form, |el| el.has_class(CLASS_COMMENT_INPUT))
            .ok_or_else(|| malformed("comment form has no input"))?;
        let text = tree.value(input).unwrap_or_default().trim().to_string();
        return Ok(Some(Target::CommentSubmit { post, input, text }));
    }

    if let Some(button) = tree.closest_with_class(from, CLASS_COMMENT_DELETE) {
        let raw = tree
            .get(button)
            .and_then(|el| el.data_attr(DATA_COMMENT_ID))
            .ok_or_else(|| malformed("comment delete button has no comment id"))?;
        let comment = CommentId::parse(raw)
            .map_err(|e| malformed(&format!("bad comment id {raw:?}: {e}")))?;
        let post = post_id_for(tree, button)?;
        return Ok(Some(Target::CommentDelete { post, comment }));
    }

    Ok(None)
}

fn post_id_for(tree: &ElementTree, from: NodeId) -> Result<PostId> {
    let raw = tree
        .closest_with_data(from, DATA_POST_ID)
        .and_then(|card| tree.get(card))
        .and_then(|el| el.data_attr(DATA_POST_ID))
        .ok_or_else(|| malformed("action region outside a post card"))?;
    PostId::parse(raw).map_err(|e| malformed(&format!("bad post id {raw:?}: {e}")))
}

fn malformed(what: &str) -> DashboardError {
    DashboardError::InvariantViolation(format!("malformed markup: {what}"))
}

/// Resolve `event` against the handler's document and run the matching
/// operation.
///
/// References to posts or comments that no longer exist are reported as an
/// outcome with `state_changed == false`, never as an error.
pub fn dispatch<H: ActionHandler>(handler: &mut H, event: RawEvent) -> Result<DispatchOutcome> {
    let target = match resolve(handler.document(), event) {
        Ok(Some(target)) => target,
        Ok(None) => return Ok(DispatchOutcome::inert()),
        Err(e) => {
            tracing::error!(error = %e, "could not resolve event");
            return Err(e);
        }
    };

    let before = handler.revision();
    let result = match &target {
        Target::Action { kind, post } => route::<H>(*kind)(handler, post),
        Target::CommentSubmit { text, .. } if text.is_empty() => Ok(None),
        Target::CommentSubmit { post, text, .. } => handler.submit_comment(post, text),
        Target::CommentDelete { post, comment } => handler.delete_comment(post, comment),
    };

    match result {
        Ok(notice) => Ok(DispatchOutcome {
            state_changed: handler.revision() != before,
            target: Some(target),
            notice,
        }),
        Err(e) if e.is_not_found() => {
            tracing::warn!(error = %e, "event referenced a stale id");
            Ok(DispatchOutcome {
                target: Some(target),
                state_changed: false,
                notice: None,
            })
        }
        Err(e) => {
            tracing::error!(error = %e, resolved = ?target, "dispatch failed");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Element;

    struct Recorder {
        tree: ElementTree,
        calls: Vec<String>,
        revision: u64,
        missing: Option<PostId>,
    }

    impl Recorder {
        fn record(&mut self, call: String, post: &PostId, mutates: bool) -> Result<Option<Notice>> {
            if self.missing.as_ref() == Some(post) {
                return Err(DashboardError::PostNotFound(post.clone()));
            }
            self.calls.push(call);
            if mutates {
                self.revision += 1;
            }
            Ok(None)
        }
    }

    impl ActionHandler for Recorder {
        fn document(&self) -> &ElementTree {
            &self.tree
        }
        fn revision(&self) -> u64 {
            self.revision
        }
        fn like(&mut self, post: &PostId) -> Result<Option<Notice>> {
            self.record(format!("like {post}"), post, true)
        }
        fn toggle_comments(&mut self, post: &PostId) -> Result<Option<Notice>> {
            self.record(format!("comments {post}"), post, false)
        }
        fn save(&mut self, post: &PostId) -> Result<Option<Notice>> {
            self.record(format!("save {post}"), post, true)
        }
        fn edit(&mut self, post: &PostId) -> Result<Option<Notice>> {
            self.record(format!("edit {post}"), post, false)
        }
        fn delete(&mut self, post: &PostId) -> Result<Option<Notice>> {
            self.record(format!("delete {post}"), post, true)
        }
        fn submit_comment(&mut self, post: &PostId, text: &str) -> Result<Option<Notice>> {
            self.record(format!("comment {post} {text}"), post, true)
        }
        fn delete_comment(&mut self, post: &PostId, comment: &CommentId) -> Result<Option<Notice>> {
            self.record(format!("uncomment {post} {comment}"), post, true)
        }
    }

    struct Fixture {
        handler: Recorder,
        post: PostId,
        comment: CommentId,
        buttons: Vec<(ActionKind, NodeId)>,
        input: NodeId,
        submit: NodeId,
        delete_comment: NodeId,
        outside: NodeId,
    }

    fn fixture() -> Fixture {
        let post = PostId::new();
        let comment = CommentId::new();
        let mut tree = ElementTree::new();
        let root = tree.root();
        let outside = tree.append(root, Element::new("div").class("empty-state"));
        let card = tree.append(
            root,
            Element::new("div").class("post-card").data(DATA_POST_ID, &post),
        );
        let buttons = ActionKind::ALL
            .into_iter()
            .map(|kind| {
                let b = tree.append(card, Element::new("button").data(DATA_ACTION, kind.as_str()));
                let icon = tree.append(b, Element::new("span"));
                (kind, icon)
            })
            .collect();
        let form = tree.append(card, Element::new("form").class(CLASS_COMMENT_FORM));
        let input = tree.append(
            form,
            Element::new("input").class(CLASS_COMMENT_INPUT).value(""),
        );
        let submit = tree.append(form, Element::new("button").class(CLASS_COMMENT_SUBMIT));
        let delete_comment = tree.append(
            card,
            Element::new("button")
                .class(CLASS_COMMENT_DELETE)
                .data(DATA_COMMENT_ID, &comment),
        );

        Fixture {
            handler: Recorder {
                tree,
                calls: Vec::new(),
                revision: 0,
                missing: None,
            },
            post,
            comment,
            buttons,
            input,
            submit,
            delete_comment,
            outside,
        }
    }

    #[test]
    fn every_action_routes_to_its_operation() {
        let mut fx = fixture();
        let expected = ["like", "comments", "save", "edit", "delete"];
        for ((kind, node), name) in fx.buttons.clone().into_iter().zip(expected) {
            let outcome = dispatch(&mut fx.handler, RawEvent::click(node)).unwrap();
            assert_eq!(
                outcome.target,
                Some(Target::Action {
                    kind,
                    post: fx.post.clone()
                })
            );
            assert_eq!(fx.handler.calls.last().unwrap(), &format!("{name} {}", fx.post));
        }
    }

    #[test]
    fn comment_toggle_does_not_change_state() {
        let mut fx = fixture();
        let (_, node) = fx.buttons[1];
        let outcome = dispatch(&mut fx.handler, RawEvent::click(node)).unwrap();
        assert!(!outcome.state_changed);

        let (_, node) = fx.buttons[0];
        let outcome = dispatch(&mut fx.handler, RawEvent::click(node)).unwrap();
        assert!(outcome.state_changed);
    }

    #[test]
    fn clicks_outside_tagged_regions_are_inert() {
        let mut fx = fixture();
        let root = fx.handler.tree.root();
        for node in [fx.outside, root, fx.input] {
            let outcome = dispatch(&mut fx.handler, RawEvent::click(node)).unwrap();
            assert!(outcome.is_inert());
        }
        assert!(fx.handler.calls.is_empty());
    }

    #[test]
    fn comment_submit_reads_trimmed_input() {
        let mut fx = fixture();
        fx.handler.tree.set_value(fx.input, "  nice post  ");

        let outcome = dispatch(&mut fx.handler, RawEvent::click(fx.submit)).unwrap();
        assert_eq!(
            outcome.target,
            Some(Target::CommentSubmit {
                post: fx.post.clone(),
                input: fx.input,
                text: "nice post".into()
            })
        );
        assert_eq!(fx.handler.calls, [format!("comment {} nice post", fx.post)]);
    }

    #[test]
    fn form_submit_event_counts_as_comment_submit() {
        let mut fx = fixture();
        fx.handler.tree.set_value(fx.input, "hello");
        dispatch(&mut fx.handler, RawEvent::submit(fx.input)).unwrap();
        assert_eq!(fx.handler.calls.len(), 1);
    }

    #[test]
    fn blank_comment_is_not_submitted() {
        let mut fx = fixture();
        fx.handler.tree.set_value(fx.input, "   ");
        let outcome = dispatch(&mut fx.handler, RawEvent::click(fx.submit)).unwrap();
        assert!(!outcome.state_changed);
        assert!(fx.handler.calls.is_empty());
    }

    #[test]
    fn comment_delete_resolves_both_ids() {
        let mut fx = fixture();
        let outcome = dispatch(&mut fx.handler, RawEvent::click(fx.delete_comment)).unwrap();
        assert_eq!(
            outcome.target,
            Some(Target::CommentDelete {
                post: fx.post.clone(),
                comment: fx.comment.clone()
            })
        );
    }

    #[test]
    fn stale_post_is_a_quiet_no_op() {
        let mut fx = fixture();
        fx.handler.missing = Some(fx.post.clone());
        let (_, node) = fx.buttons[0];

        let outcome = dispatch(&mut fx.handler, RawEvent::click(node)).unwrap();
        assert!(!outcome.state_changed);
        assert!(!outcome.is_inert());
    }

    #[test]
    fn node_from_previous_render_is_inert() {
        let mut fx = fixture();
        let (_, old_like) = fx.buttons[0];
        fx.handler.tree = fixture().handler.tree;

        let outcome = dispatch(&mut fx.handler, RawEvent::click(old_like)).unwrap();
        assert!(outcome.is_inert());
        assert!(fx.handler.calls.is_empty());
    }

    #[test]
    fn empty_post_id_is_invariant_violation() {
        let mut tree = ElementTree::new();
        let card = tree.append(tree.root(), Element::new("div").data(DATA_POST_ID, ""));
        let like = tree.append(card, Element::new("button").data(DATA_ACTION, "like"));

        let err = resolve(&tree, RawEvent::click(like)).unwrap_err();
        assert!(matches!(err, DashboardError::InvariantViolation(_)));
    }

    #[test]
    fn action_outside_post_card_is_invariant_violation() {
        let mut tree = ElementTree::new();
        let stray = tree.append(tree.root(), Element::new("button").data(DATA_ACTION, "like"));

        let err = resolve(&tree, RawEvent::click(stray)).unwrap_err();
        assert!(matches!(err, DashboardError::InvariantViolation(_)));
    }

    #[test]
    fn unknown_action_is_inert() {
        let mut tree = ElementTree::new();
        let card = tree.append(
            tree.root(),
            Element::new("div").data(DATA_POST_ID, PostId::new()),
        );
        let share = tree.append(card, Element::new("button").data(DATA_ACTION, "share"));
        assert_eq!(resolve(&tree, RawEvent::click(share)).unwrap(), None);
    }

    #[test]
    fn action_kind_parses_its_own_names() {
        for kind in ActionKind::ALL {
            assert_eq!(kind.as_str().parse::<ActionKind>(), Ok(kind));
        }
    }

    #[test]
    fn closures_can_confirm() {
        let mut asked = Vec::new();
        let mut decline = |prompt: &str| {
            asked.push(prompt.to_string());
            false
        };
        assert!(!decline.confirm("sure?"));
        assert!(AlwaysConfirm.confirm("sure?"));
        assert_eq!(asked, ["sure?"]);
    }
}
