//! Minimal element tree for the posts region.
//!
//! The tree mirrors the markup produced by [`render_markup`] closely enough
//! for click resolution: tags, classes, `data-*` attributes, input values
//! and parent links.  It is rebuilt from scratch on every render.  Every tree
//! gets a fresh generation that is stamped into the ids it hands out, so ids
//! from a previous render resolve to nothing.
//!
//! [`render_markup`]: crate::render::render_markup

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use feedboard_shared::constants::{
    CLASS_ACTION_BTN, CLASS_COMMENT_DELETE, CLASS_COMMENT_FORM, CLASS_COMMENT_INPUT,
    CLASS_COMMENT_SUBMIT, CLASS_POST_CARD, DATA_ACTION, DATA_CATEGORY, DATA_COMMENT_ID,
    DATA_POST_ID,
};
use feedboard_shared::{CommentId, PostId};

use crate::dispatch::ActionKind;
use crate::render::{action_label, PostViewModel, RenderFrame};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Handle to an element of one specific tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    generation: u64,
    index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub classes: Vec<String>,
    pub data: BTreeMap<String, String>,
    pub text: Option<String>,
    /// Current value of form controls.
    pub value: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn data(mut self, key: &str, value: impl ToString) -> Self {
        self.data.insert(key.to_string(), value.to_string());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn data_attr(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Arena of elements rooted at the posts container.
#[derive(Debug, Clone)]
pub struct ElementTree {
    generation: u64,
    nodes: Vec<Element>,
}

impl Default for ElementTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementTree {
    pub fn new() -> Self {
        Self {
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
            nodes: vec![Element::new("div").class("posts-container")],
        }
    }

    pub fn root(&self) -> NodeId {
        self.node_id(0)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn node_id(&self, index: usize) -> NodeId {
        NodeId {
            generation: self.generation,
            index,
        }
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        if id.generation != self.generation {
            return None;
        }
        self.nodes.get_mut(id.index)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// `None` for unknown ids and for ids issued by another tree.
    pub fn get(&self, id: NodeId) -> Option<&Element> {
        if id.generation != self.generation {
            return None;
        }
        self.nodes.get(id.index)
    }

    /// Attach `element` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, mut element: Element) -> NodeId {
        let id = self.node_id(self.nodes.len());
        element.parent = Some(parent);
        element.children.clear();
        self.nodes.push(element);
        if let Some(p) = self.get_mut(parent) {
            p.children.push(id);
        }
        id
    }

    /// Nearest node, starting at `from` itself and walking up, for which
    /// `pred` holds.
    pub fn closest(&self, from: NodeId, pred: impl Fn(&Element) -> bool) -> Option<NodeId> {
        let mut cursor = Some(from);
        while let Some(id) = cursor {
            let el = self.get(id)?;
            if pred(el) {
                return Some(id);
            }
            cursor = el.parent;
        }
        None
    }

    pub fn closest_with_data(&self, from: NodeId, key: &str) -> Option<NodeId> {
        self.closest(from, |el| el.data.contains_key(key))
    }

    pub fn closest_with_class(&self, from: NodeId, class: &str) -> Option<NodeId> {
        self.closest(from, |el| el.has_class(class))
    }

    /// First descendant of `root` (depth-first, document order) matching `pred`.
    pub fn find_descendant(&self, root: NodeId, pred: impl Fn(&Element) -> bool) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self.get(root)?.children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let el = self.get(id)?;
            if pred(el) {
                return Some(id);
            }
            stack.extend(el.children.iter().rev().copied());
        }
        None
    }

    /// All nodes matching `pred`, in document order.
    pub fn find_all(&self, pred: impl Fn(&Element) -> bool) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            let Some(el) = self.get(id) else { continue };
            if pred(el) {
                found.push(id);
            }
            stack.extend(el.children.iter().rev().copied());
        }
        found
    }

    /// The card rendered for `post`, if it is visible.
    pub fn post_card(&self, post: &PostId) -> Option<NodeId> {
        self.find_descendant(self.root(), |el| {
            el.has_class(CLASS_POST_CARD) && el.data_attr(DATA_POST_ID) == Some(post.as_str())
        })
    }

    pub fn action_button(&self, post: &PostId, kind: ActionKind) -> Option<NodeId> {
        self.find_descendant(self.post_card(post)?, |el| {
            el.data_attr(DATA_ACTION) == Some(kind.as_str())
        })
    }

    pub fn comment_input(&self, post: &PostId) -> Option<NodeId> {
        self.find_descendant(self.post_card(post)?, |el| el.has_class(CLASS_COMMENT_INPUT))
    }

    pub fn comment_submit(&self, post: &PostId) -> Option<NodeId> {
        self.find_descendant(self.post_card(post)?, |el| el.has_class(CLASS_COMMENT_SUBMIT))
    }

    pub fn comment_delete(&self, post: &PostId, comment: &CommentId) -> Option<NodeId> {
        self.find_descendant(self.post_card(post)?, |el| {
            el.has_class(CLASS_COMMENT_DELETE)
                && el.data_attr(DATA_COMMENT_ID) == Some(comment.as_str())
        })
    }

    /// Whether the comment panel of `post` is rendered expanded.
    pub fn is_comment_panel_open(&self, post: &PostId) -> bool {
        self.post_card(post)
            .and_then(|card| self.find_descendant(card, |el| el.has_class("comments-section")))
            .and_then(|section| self.get(section))
            .is_some_and(|el| !el.has_class("hidden"))
    }

    pub fn value(&self, id: NodeId) -> Option<&str> {
        self.get(id)?.value.as_deref()
    }

    /// Set a form control's value.  Returns `false` for an unknown node.
    pub fn set_value(&mut self, id: NodeId, value: impl Into<String>) -> bool {
        match self.get_mut(id) {
            Some(el) => {
                el.value = Some(value.into());
                true
            }
            None => false,
        }
    }
}

/// Build the element tree for a frame.
pub fn build_tree(frame: &RenderFrame) -> ElementTree {
    let mut tree = ElementTree::new();
    let root = tree.root();

    if frame.show_empty_state {
        tree.append(root, Element::new("div").class("empty-state").text("No posts yet"));
        return tree;
    }

    for item in &frame.items {
        append_post(&mut tree, root, item);
    }
    tree
}

fn append_post(tree: &mut ElementTree, root: NodeId, item: &PostViewModel) {
    let card = tree.append(
        root,
        Element::new("div")
            .class(CLASS_POST_CARD)
            .data(DATA_POST_ID, &item.id)
            .data(DATA_CATEGORY, item.category),
    );

    let header = tree.append(card, Element::new("div").class("post-header"));
    tree.append(
        header,
        Element::new("div").class("author-name").text(item.author.clone()),
    );
    tree.append(header, Element::new("div").class("post-time").text(item.age.clone()));
    tree.append(
        card,
        Element::new("div").class("post-content").text(item.content.clone()),
    );

    let actions = tree.append(card, Element::new("div").class("post-actions"));
    for kind in ActionKind::ALL {
        let mut button = Element::new("button")
            .class(CLASS_ACTION_BTN)
            .data(DATA_ACTION, kind.as_str());
        match kind {
            ActionKind::Like if item.liked => button = button.class("liked"),
            ActionKind::Save if item.saved => button = button.class("saved"),
            _ => {}
        }
        let button = tree.append(actions, button);
        tree.append(
            button,
            Element::new("span")
                .class("action-btn-text")
                .text(action_label(kind, item)),
        );
    }

    let mut section = Element::new("div").class("comments-section");
    if !item.comments_open {
        section = section.class("hidden");
    }
    let section = tree.append(card, section);

    let form = tree.append(section, Element::new("form").class(CLASS_COMMENT_FORM));
    tree.append(
        form,
        Element::new("input").class(CLASS_COMMENT_INPUT).value(""),
    );
    tree.append(
        form,
        Element::new("button").class(CLASS_COMMENT_SUBMIT).text("Post"),
    );

    let list = tree.append(section, Element::new("div").class("comments-list"));
    for comment in &item.comments {
        let entry = tree.append(
            list,
            Element::new("div")
                .class("comment-item")
                .data(DATA_COMMENT_ID, &comment.id),
        );
        tree.append(
            entry,
            Element::new("span").class("comment-author").text(comment.author.clone()),
        );
        tree.append(
            entry,
            Element::new("button")
                .class(CLASS_COMMENT_DELETE)
                .data(DATA_COMMENT_ID, &comment.id),
        );
        tree.append(
            entry,
            Element::new("div").class("comment-text").text(comment.text.clone()),
        );
    }
}
