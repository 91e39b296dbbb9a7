use serde::Serialize;

/// User-facing confirmation of a completed action, shown by the toast
/// collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Notice {
    PostCreated,
    PostUpdated,
    PostSaved,
    PostUnsaved,
    CommentAdded,
    PostDeleted,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Self::PostCreated => "Post created successfully! 🎉",
            Self::PostUpdated => "Post updated! ✏️",
            Self::PostSaved => "Post saved! 🔖",
            Self::PostUnsaved => "Post unsaved",
            Self::CommentAdded => "Comment added! 💬",
            Self::PostDeleted => "Post deleted 🗑️",
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Queue of notices waiting to be shown.
#[derive(Debug, Default)]
pub struct NoticeQueue {
    pending: Vec<Notice>,
}

impl NoticeQueue {
    pub fn push(&mut self, notice: Notice) {
        tracing::debug!(notice = ?notice, "notice queued");
        self.pending.push(notice);
    }

    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.pending)
    }
}
