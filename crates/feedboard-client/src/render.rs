//! Render projection.
//!
//! [`project`] turns the post collection plus the active view and category
//! filter into the ordered list of view models the presentation layer draws.
//! It is a pure function: the reference instant and the set of expanded
//! comment panels are passed in, and nothing is mutated.
//!
//! [`render_markup`] serializes a [`RenderFrame`] to HTML.  Every piece of
//! user-authored text goes through [`escape_html`] on the way out.

use std::collections::BTreeSet;
use std::fmt::Write;

use chrono::{DateTime, Utc};
use feedboard_shared::constants::{
    CLASS_ACTION_BTN, CLASS_COMMENT_DELETE, CLASS_COMMENT_FORM, CLASS_COMMENT_INPUT,
    CLASS_COMMENT_SUBMIT, CLASS_POST_CARD,
};
use feedboard_shared::{Category, CategoryFilter, CommentId, PostId, View};
use feedboard_store::{Post, Statistics};
use serde::Serialize;

use crate::dispatch::ActionKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentViewModel {
    pub id: CommentId,
    pub author: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostViewModel {
    pub id: PostId,
    pub author: String,
    pub category: Category,
    pub category_icon: &'static str,
    pub content: String,
    pub age: String,
    pub like_count: u64,
    pub liked: bool,
    pub saved: bool,
    pub comment_count: usize,
    pub comments_open: bool,
    pub comments: Vec<CommentViewModel>,
}

/// Inputs to [`project`] that are not part of the post collection.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionContext<'a> {
    /// Minimum like count for the trending view.
    pub trending_min_likes: u64,
    /// Reference instant for relative ages.
    pub now: DateTime<Utc>,
    /// Posts whose comment panel is expanded.
    pub open_panels: &'a BTreeSet<PostId>,
}

/// Everything the presentation layer needs for one redraw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderFrame {
    pub items: Vec<PostViewModel>,
    pub statistics: Statistics,
    /// True when there are no posts at all, regardless of filters.
    pub show_empty_state: bool,
}

/// Whether `post` is visible under both the view and the category filter.
pub fn is_visible(post: &Post, view: View, filter: CategoryFilter, trending_min_likes: u64) -> bool {
    let in_view = match view {
        View::Feed => true,
        View::Trending => post.like_count >= trending_min_likes,
        View::Saved => post.saved,
    };
    in_view && filter.matches(post.category)
}

/// Project the visible posts, preserving collection order.
pub fn project(
    posts: &[Post],
    view: View,
    filter: CategoryFilter,
    ctx: &ProjectionContext<'_>,
) -> Vec<PostViewModel> {
    posts
        .iter()
        .filter(|p| is_visible(p, view, filter, ctx.trending_min_likes))
        .map(|p| PostViewModel {
            id: p.id.clone(),
            author: p.author.clone(),
            category: p.category,
            category_icon: p.category.icon(),
            content: p.content.clone(),
            age: relative_age(p.created_at, ctx.now),
            like_count: p.like_count,
            liked: p.liked,
            saved: p.saved,
            comment_count: p.comments.len(),
            comments_open: ctx.open_panels.contains(&p.id),
            comments: p
                .comments
                .iter()
                .map(|c| CommentViewModel {
                    id: c.id.clone(),
                    author: c.author.clone(),
                    text: c.text.clone(),
                })
                .collect(),
        })
        .collect()
}

/// Build a full frame for the given posts and statistics.
pub fn frame(
    posts: &[Post],
    statistics: Statistics,
    view: View,
    filter: CategoryFilter,
    ctx: &ProjectionContext<'_>,
) -> RenderFrame {
    RenderFrame {
        items: project(posts, view, filter, ctx),
        statistics,
        show_empty_state: posts.is_empty(),
    }
}

/// Short "time since" label.  Timestamps in the future read as "Just now".
pub fn relative_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds();
    match secs {
        s if s < 60 => "Just now".to_string(),
        s if s < 3_600 => format!("{}m ago", s / 60),
        s if s < 86_400 => format!("{}h ago", s / 3_600),
        s => format!("{}d ago", s / 86_400),
    }
}

/// Escape text for safe inclusion in HTML element content or attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Serialize a frame to HTML.
pub fn render_markup(frame: &RenderFrame) -> String {
    let mut html = String::new();

    if frame.show_empty_state {
        html.push_str(r#"<div class="empty-state">No posts yet</div>"#);
        return html;
    }

    for item in &frame.items {
        write_post(&mut html, item);
    }
    html
}

fn write_post(html: &mut String, item: &PostViewModel) {
    // Writing into a String cannot fail.
    let _ = write!(
        html,
        r#"<div class="{CLASS_POST_CARD}" data-id="{id}" data-category="{category}">"#,
        id = escape_html(item.id.as_str()),
        category = item.category,
    );
    let _ = write!(
        html,
        r#"<div class="post-header"><div class="author-name">{author}</div><div class="post-time">{age}</div><span class="post-category">{icon} {category}</span></div>"#,
        author = escape_html(&item.author),
        age = item.age,
        icon = item.category_icon,
        category = item.category,
    );
    let _ = write!(
        html,
        r#"<div class="post-content">{}</div>"#,
        escape_html(&item.content)
    );

    html.push_str(r#"<div class="post-actions">"#);
    for kind in ActionKind::ALL {
        let state = match kind {
            ActionKind::Like if item.liked => " liked",
            ActionKind::Save if item.saved => " saved",
            _ => "",
        };
        let _ = write!(
            html,
            r#"<button class="{CLASS_ACTION_BTN}{state}" data-action="{action}">{label}</button>"#,
            action = kind.as_str(),
            label = action_label(kind, item),
        );
    }
    html.push_str("</div>");

    let hidden = if item.comments_open { "" } else { " hidden" };
    let _ = write!(
        html,
        r#"<div class="comments-section{hidden}"><form class="{CLASS_COMMENT_FORM}"><input type="text" class="{CLASS_COMMENT_INPUT}" placeholder="Write a comment..."><button type="submit" class="{CLASS_COMMENT_SUBMIT}">Post</button></form><div class="comments-list">"#
    );
    for comment in &item.comments {
        let _ = write!(
            html,
            r#"<div class="comment-item" data-comment-id="{id}"><span class="comment-author">{author}</span><button class="{CLASS_COMMENT_DELETE}" data-comment-id="{id}">🗑️</button><div class="comment-text">{text}</div></div>"#,
            id = escape_html(comment.id.as_str()),
            author = escape_html(&comment.author),
            text = escape_html(&comment.text),
        );
    }
    html.push_str("</div></div></div>");
}

pub(crate) fn action_label(kind: ActionKind, item: &PostViewModel) -> String {
    match kind {
        ActionKind::Like => format!("{} Likes", item.like_count),
        ActionKind::Comment => format!("{} Comments", item.comment_count),
        ActionKind::Save => "Save".to_string(),
        ActionKind::Edit => "Edit".to_string(),
        ActionKind::Delete => "Delete".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use feedboard_store::Comment;

    fn post(content: &str, category: Category, likes: u64, saved: bool) -> Post {
        let mut p = Post::new("Ada", content, category);
        p.like_count = likes;
        p.liked = likes > 0;
        p.saved = saved;
        p
    }

    fn sample() -> Vec<Post> {
        vec![
            post("tech liked", Category::Technology, 1, false),
            post("food saved", Category::Food, 0, true),
            post("tech plain", Category::Technology, 0, false),
            post("music liked saved", Category::Music, 2, true),
        ]
    }

    fn contents(items: &[PostViewModel]) -> Vec<&str> {
        items.iter().map(|i| i.content.as_str()).collect()
    }

    fn ctx(open: &BTreeSet<PostId>) -> ProjectionContext<'_> {
        ProjectionContext {
            trending_min_likes: 1,
            now: Utc::now(),
            open_panels: open,
        }
    }

    #[test]
    fn feed_shows_everything_in_order() {
        let posts = sample();
        let open = BTreeSet::new();
        let items = project(&posts, View::Feed, CategoryFilter::All, &ctx(&open));
        assert_eq!(
            contents(&items),
            ["tech liked", "food saved", "tech plain", "music liked saved"]
        );
    }

    #[test]
    fn trending_requires_threshold_likes() {
        let posts = sample();
        let open = BTreeSet::new();
        let items = project(&posts, View::Trending, CategoryFilter::All, &ctx(&open));
        assert_eq!(contents(&items), ["tech liked", "music liked saved"]);

        let strict = ProjectionContext {
            trending_min_likes: 2,
            ..ctx(&open)
        };
        let items = project(&posts, View::Trending, CategoryFilter::All, &strict);
        assert_eq!(contents(&items), ["music liked saved"]);
    }

    #[test]
    fn view_and_category_intersect() {
        let posts = sample();
        let open = BTreeSet::new();
        let items = project(
            &posts,
            View::Saved,
            CategoryFilter::Only(Category::Music),
            &ctx(&open),
        );
        assert_eq!(contents(&items), ["music liked saved"]);

        let items = project(
            &posts,
            View::Feed,
            CategoryFilter::Only(Category::Technology),
            &ctx(&open),
        );
        assert_eq!(contents(&items), ["tech liked", "tech plain"]);
    }

    #[test]
    fn saved_view_is_empty_when_nothing_saved() {
        let posts: Vec<Post> = (0..5)
            .map(|i| post(&format!("p{i}"), Category::Food, i, false))
            .collect();
        let open = BTreeSet::new();
        assert!(project(&posts, View::Saved, CategoryFilter::All, &ctx(&open)).is_empty());
    }

    #[test]
    fn projection_is_idempotent() {
        let posts = sample();
        let open = BTreeSet::new();
        let c = ctx(&open);
        let a = project(&posts, View::Feed, CategoryFilter::All, &c);
        let b = project(&posts, View::Feed, CategoryFilter::All, &c);
        assert_eq!(a, b);
    }

    #[test]
    fn view_model_carries_comment_state() {
        let mut posts = sample();
        posts[0].comments.push(Comment::new("Bob", "first"));
        let mut open = BTreeSet::new();
        open.insert(posts[0].id.clone());

        let items = project(&posts, View::Feed, CategoryFilter::All, &ctx(&open));
        assert!(items[0].comments_open);
        assert_eq!(items[0].comment_count, 1);
        assert_eq!(items[0].comments[0].text, "first");
        assert!(!items[1].comments_open);
    }

    #[test]
    fn empty_state_only_without_posts() {
        let open = BTreeSet::new();
        let f = frame(&[], Statistics::default(), View::Feed, CategoryFilter::All, &ctx(&open));
        assert!(f.show_empty_state);

        let posts = sample();
        let f = frame(
            &posts,
            Statistics::from_posts(&posts).unwrap(),
            View::Saved,
            CategoryFilter::Only(Category::Travel),
            &ctx(&open),
        );
        assert!(f.items.is_empty());
        assert!(!f.show_empty_state);
    }

    #[test]
    fn relative_age_buckets() {
        let now = Utc::now();
        assert_eq!(relative_age(now - Duration::seconds(5), now), "Just now");
        assert_eq!(relative_age(now + Duration::seconds(30), now), "Just now");
        assert_eq!(relative_age(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(relative_age(now - Duration::hours(3), now), "3h ago");
        assert_eq!(relative_age(now - Duration::days(2), now), "2d ago");
    }

    #[test]
    fn markup_escapes_user_content() {
        let mut posts = vec![Post::new(
            "<b>Mallory</b>",
            "<script>alert('x')</script>",
            Category::Technology,
        )];
        posts[0].comments.push(Comment::new("Eve", "a & b \"quoted\""));
        let open = BTreeSet::new();
        let f = frame(
            &posts,
            Statistics::from_posts(&posts).unwrap(),
            View::Feed,
            CategoryFilter::All,
            &ctx(&open),
        );

        let html = render_markup(&f);
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<b>Mallory"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
        assert!(html.contains("&lt;b&gt;Mallory&lt;/b&gt;"));
        assert!(html.contains("a &amp; b &quot;quoted&quot;"));
    }

    #[test]
    fn markup_escapes_stored_ids() {
        let mut post = Post::new("Ada", "x", Category::Food);
        post.id = PostId::parse(r#"1" onclick="x"#).unwrap();
        let posts = vec![post];
        let open = BTreeSet::new();
        let f = frame(
            &posts,
            Statistics::from_posts(&posts).unwrap(),
            View::Feed,
            CategoryFilter::All,
            &ctx(&open),
        );

        let html = render_markup(&f);
        assert!(html.contains(r#"data-id="1&quot; onclick=&quot;x""#));
    }

    #[test]
    fn markup_marks_liked_and_saved_buttons() {
        let posts = vec![post("x", Category::Food, 1, true)];
        let open = BTreeSet::new();
        let f = frame(
            &posts,
            Statistics::from_posts(&posts).unwrap(),
            View::Feed,
            CategoryFilter::All,
            &ctx(&open),
        );
        let html = render_markup(&f);
        assert!(html.contains(r#"class="action-btn liked" data-action="like""#));
        assert!(html.contains(r#"class="action-btn saved" data-action="save""#));
        assert!(html.contains("1 Likes"));
        assert!(html.contains("comments-section hidden"));
    }

    #[test]
    fn frame_serializes_for_the_presentation_layer() {
        let posts = vec![post("hello", Category::Travel, 1, false)];
        let open = BTreeSet::new();
        let f = frame(
            &posts,
            Statistics::from_posts(&posts).unwrap(),
            View::Feed,
            CategoryFilter::All,
            &ctx(&open),
        );
        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(json["showEmptyState"], false);
        assert_eq!(json["statistics"]["totalLikes"], 1);
        assert_eq!(json["items"][0]["category"], "travel");
        assert_eq!(json["items"][0]["likeCount"], 1);
        assert_eq!(json["items"][0]["commentsOpen"], false);
    }
}
