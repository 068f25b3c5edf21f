//! Shared mutable state behind the CRUD façade and the reconciler
//!
//! The displayed list is the single piece of shared state. Every mutation
//! is a read-modify-write of the full snapshot followed by a full cache
//! save, so the durable cache always mirrors the displayed list.

use crate::cache::EntryCache;
use crate::entry::Entry;
use crate::notice::NoticeBoard;
use tokio::sync::Mutex;

pub(crate) struct ListState {
    pub(crate) entries: Mutex<Vec<Entry>>,
    pub(crate) cache: EntryCache,
    pub(crate) notices: NoticeBoard,
}

impl ListState {
    pub(crate) fn new(cache: EntryCache) -> Self {
        let entries = cache.load();
        Self {
            entries: Mutex::new(entries),
            cache,
            notices: NoticeBoard::new(),
        }
    }

    /// Write the current displayed list through to the durable cache
    pub(crate) async fn persist(&self) {
        let entries = self.entries.lock().await;
        self.cache.save(&entries);
    }
}
