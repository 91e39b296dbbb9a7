/// Application name
pub const APP_NAME: &str = "Feedboard";

/// Storage key holding the serialized post collection
pub const POSTS_KEY: &str = "socialPosts";

/// Storage key holding the serialized statistics aggregate
pub const STATS_KEY: &str = "userStats";

/// Database file name inside the platform data directory
pub const DB_FILE_NAME: &str = "feedboard.db";

/// Display name used when no session identity is configured
pub const DEFAULT_AUTHOR: &str = "You";

/// Minimum like count for a post to appear in the trending view
pub const DEFAULT_TRENDING_MIN_LIKES: u64 = 1;

/// Data attribute names used by the rendered markup
pub const DATA_ACTION: &str = "action";
pub const DATA_POST_ID: &str = "id";
pub const DATA_CATEGORY: &str = "category";
pub const DATA_COMMENT_ID: &str = "comment-id";

/// Class names the dispatcher resolves against
pub const CLASS_POST_CARD: &str = "post-card";
pub const CLASS_ACTION_BTN: &str = "action-btn";
pub const CLASS_COMMENT_FORM: &str = "comment-form";
pub const CLASS_COMMENT_INPUT: &str = "comment-input";
pub const CLASS_COMMENT_SUBMIT: &str = "btn-comment";
pub const CLASS_COMMENT_DELETE: &str = "comment-delete";
