//! Transient user-facing notices
//!
//! Success and failure notices auto-dismiss after a fixed interval; the
//! board never blocks the caller.

use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// How long a notice stays visible
const NOTICE_TTL: Duration = Duration::from_millis(3500);

/// Notice severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A single transient notice
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    posted_at: Instant,
}

impl Notice {
    fn new(kind: NoticeKind, text: String) -> Self {
        Self {
            kind,
            text,
            posted_at: Instant::now(),
        }
    }

    /// Whether the notice is still within its display window
    pub fn is_active(&self) -> bool {
        self.posted_at.elapsed() < NOTICE_TTL
    }
}

/// Collection of active notices, oldest first
pub struct NoticeBoard {
    notices: Mutex<Vec<Notice>>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self {
            notices: Mutex::new(Vec::new()),
        }
    }

    /// Post a success notice
    pub async fn success(&self, text: impl Into<String>) {
        self.post(Notice::new(NoticeKind::Success, text.into())).await;
    }

    /// Post a failure notice
    pub async fn error(&self, text: impl Into<String>) {
        self.post(Notice::new(NoticeKind::Error, text.into())).await;
    }

    async fn post(&self, notice: Notice) {
        let mut notices = self.notices.lock().await;
        notices.retain(Notice::is_active);
        notices.push(notice);
    }

    /// Unexpired notices, oldest first. Expired notices are pruned.
    pub async fn active(&self) -> Vec<Notice> {
        let mut notices = self.notices.lock().await;
        notices.retain(Notice::is_active);
        notices.clone()
    }
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_posted_notices_are_active() {
        let board = NoticeBoard::new();
        board.success("Saved locally").await;
        board.error("sync failed").await;

        let active = board.active().await;
        assert_eq!(active.len(), 2);
        assert_eq!(active[0].kind, NoticeKind::Success);
        assert_eq!(active[1].kind, NoticeKind::Error);
        assert_eq!(active[1].text, "sync failed");
    }
}
