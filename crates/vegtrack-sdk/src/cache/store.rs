//! File-backed entry cache
//!
//! Persists the full entry list as one JSON array under a well-known file.
//! Durability is best-effort: a failed save is logged and swallowed, and a
//! missing or corrupt snapshot degrades to an empty list. In-memory state
//! stays authoritative for the session either way.

use crate::entry::Entry;
use std::fs;
use std::path::{Path, PathBuf};

/// Well-known file name for the persisted entry list
const CACHE_FILE: &str = "vt_local_entries.json";

/// Durable store for the displayed entry list
pub struct EntryCache {
    path: PathBuf,
}

impl EntryCache {
    /// Create a cache rooted in the given directory
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(CACHE_FILE),
        }
    }

    /// Path of the snapshot file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted snapshot. Never fails: missing or unreadable data
    /// yields an empty list.
    pub fn load(&self) -> Vec<Entry> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return Vec::new(),
        };

        match serde_json::from_str::<Vec<Entry>>(&raw) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(
                    "discarding corrupt entry cache at {}: {}",
                    self.path.display(),
                    err
                );
                Vec::new()
            }
        }
    }

    /// Overwrite the snapshot with the current list. Failures are logged and
    /// swallowed; they never block the caller.
    pub fn save(&self, entries: &[Entry]) {
        let json = match serde_json::to_string(entries) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!("failed to serialize entry cache: {}", err);
                return;
            }
        };

        if let Err(err) = fs::write(&self.path, json) {
            tracing::warn!(
                "failed to persist entry cache at {}: {}",
                self.path.display(),
                err
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryDraft;

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = EntryCache::new(dir.path());

        let entries = vec![
            Entry::from_draft(&EntryDraft::new("Tomato", 12.5, "2024-01-01")),
            Entry::from_draft(&EntryDraft::new("Leek", 3.2, "2024-01-02")),
        ];
        cache.save(&entries);

        let loaded = cache.load();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].local_id, entries[0].local_id);
        assert_eq!(loaded[0].name, "Tomato");
        assert_eq!(loaded[1].price, 3.2);
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = EntryCache::new(dir.path());
        assert!(cache.load().is_empty());
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = EntryCache::new(dir.path());
        fs::write(cache.path(), "{not json").unwrap();
        assert!(cache.load().is_empty());
    }

    #[test]
    fn test_save_to_unwritable_path_is_swallowed() {
        let cache = EntryCache::new("/nonexistent-vegtrack-dir");
        // Must not panic or error
        cache.save(&[Entry::from_draft(&EntryDraft::new(
            "Tomato",
            12.5,
            "2024-01-01",
        ))]);
        assert!(cache.load().is_empty());
    }
}
