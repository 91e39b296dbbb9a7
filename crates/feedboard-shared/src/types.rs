use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Returned when an identifier is parsed from an empty string.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("identifier must not be empty")]
pub struct EmptyId;

// Ids are opaque strings. New ones are hyphenated UUID v4, but anything
// non-empty is accepted so stores written with other id schemes (e.g.
// millisecond timestamps) keep loading.
macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn parse(s: &str) -> Result<Self, EmptyId> {
                Self::try_from(s.to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl TryFrom<String> for $name {
            type Error = EmptyId;

            fn try_from(s: String) -> Result<Self, EmptyId> {
                if s.is_empty() {
                    return Err(EmptyId);
                }
                Ok(Self(s))
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

opaque_id!(
    /// Post identity.
    PostId
);

opaque_id!(
    /// Comment identity, unique within its post.
    CommentId
);

/// Topic a post is filed under.
///
/// Anything that is not one of the known topics lands in [`Category::Other`],
/// both when parsing form input and when reading stored posts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Technology,
    Food,
    Travel,
    Music,
    #[serde(other)]
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Technology,
        Category::Food,
        Category::Travel,
        Category::Music,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Technology => "technology",
            Self::Food => "food",
            Self::Travel => "travel",
            Self::Music => "music",
            Self::Other => "other",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Technology => "💻",
            Self::Food => "🍕",
            Self::Travel => "✈️",
            Self::Music => "🎵",
            Self::Other => "📝",
        }
    }

    /// Lenient parse used for form input: unknown names map to `Other`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "technology" => Self::Technology,
            "food" => Self::Food,
            "travel" => Self::Travel,
            "music" => Self::Music,
            _ => Self::Other,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Navigation view selected in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Feed,
    Trending,
    Saved,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Feed => "feed",
            Self::Trending => "trending",
            Self::Saved => "saved",
        }
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "feed" => Ok(Self::Feed),
            "trending" => Ok(Self::Trending),
            "saved" => Ok(Self::Saved),
            other => Err(format!("unknown view: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(c) => *c == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "technology" | "food" | "travel" | "music" | "other" => {
                Ok(Self::Only(Category::from_name(s)))
            }
            other => Err(format!("unknown category filter: {other}")),
        }
    }
}
