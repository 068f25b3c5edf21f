//! Debounced catalog-name suggestions
//!
//! Each keystroke arms a single-slot timer; arming cancels any previously
//! armed timer that has not fired yet. A lookup that already fired is left
//! to finish, and whichever response publishes last wins.

use crate::remote::CatalogStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::Duration;
use vegtrack_api_client::CatalogItem;

/// Quiet period after the last keystroke before a lookup fires
const DEBOUNCE_MS: u64 = 300;
/// Maximum suggestions surfaced to the user
const MAX_SUGGESTIONS: usize = 6;

struct Scheduled {
    handle: JoinHandle<()>,
    /// Set once the quiet period elapsed and the lookup went out; a fired
    /// lookup is never cancelled
    fired: Arc<AtomicBool>,
}

/// Debounced lookup of catalog items by partial name
pub struct NameResolver {
    store: Arc<dyn CatalogStore>,
    suggestions: Arc<watch::Sender<Vec<CatalogItem>>>,
    pending: Mutex<Option<Scheduled>>,
}

impl NameResolver {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        let (suggestions, _) = watch::channel(Vec::new());
        Self {
            store,
            suggestions: Arc::new(suggestions),
            pending: Mutex::new(None),
        }
    }

    /// Subscribe to the suggestion stream. The latest published list wins.
    pub fn subscribe(&self) -> watch::Receiver<Vec<CatalogItem>> {
        self.suggestions.subscribe()
    }

    /// Record a keystroke.
    ///
    /// An empty query publishes an empty list immediately without a remote
    /// call. Otherwise a lookup is scheduled after the quiet period, and any
    /// still-pending scheduled lookup is cancelled.
    pub async fn input(&self, query: &str) {
        let mut pending = self.pending.lock().await;
        if let Some(previous) = pending.take() {
            if !previous.fired.load(Ordering::SeqCst) {
                previous.handle.abort();
            }
        }

        let trimmed = query.trim();
        if trimmed.is_empty() {
            self.suggestions.send_replace(Vec::new());
            return;
        }

        let store = Arc::clone(&self.store);
        let suggestions = Arc::clone(&self.suggestions);
        let query = trimmed.to_string();
        let fired = Arc::new(AtomicBool::new(false));
        let fired_flag = Arc::clone(&fired);

        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(DEBOUNCE_MS)).await;
            fired_flag.store(true, Ordering::SeqCst);

            let list = match store.search(&query).await {
                Ok(mut items) => {
                    items.truncate(MAX_SUGGESTIONS);
                    items
                }
                Err(err) => {
                    // Suggestions are best-effort; failures surface as no matches
                    tracing::debug!("suggestion lookup for {:?} failed: {}", query, err);
                    Vec::new()
                }
            };
            suggestions.send_replace(list);
        });

        *pending = Some(Scheduled { handle, fired });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::mock::{catalog_item, MockCatalog};

    fn seeded_store() -> Arc<MockCatalog> {
        Arc::new(MockCatalog::new().with_items(vec![
            catalog_item(1, "Tomato", "kg"),
            catalog_item(2, "Tomatillo", "kg"),
            catalog_item(3, "Potato", "kg"),
            catalog_item(4, "Sweet Potato", "kg"),
            catalog_item(5, "Cherry Tomato", "kg"),
            catalog_item(6, "Onion", "kg"),
            catalog_item(7, "Red Onion", "kg"),
            catalog_item(8, "Shallot", "kg"),
        ]))
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_keystrokes_issue_one_lookup() {
        let store = seeded_store();
        let resolver = NameResolver::new(store.clone());
        let mut rx = resolver.subscribe();

        resolver.input("t").await;
        tokio::time::advance(Duration::from_millis(100)).await;
        resolver.input("to").await;
        tokio::time::advance(Duration::from_millis(100)).await;
        resolver.input("tom").await;

        assert_eq!(store.search_calls(), 0);

        tokio::time::advance(Duration::from_millis(DEBOUNCE_MS)).await;
        rx.changed().await.unwrap();

        assert_eq!(store.search_calls(), 1);
        let names: Vec<String> = rx.borrow().iter().map(|i| i.name.clone()).collect();
        assert!(names.contains(&"Tomato".to_string()));
        assert!(names.contains(&"Cherry Tomato".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_results_are_capped() {
        let store = seeded_store();
        let resolver = NameResolver::new(store);
        let mut rx = resolver.subscribe();

        // Matches every seeded item via the letter "o"
        resolver.input("o").await;
        tokio::time::advance(Duration::from_millis(DEBOUNCE_MS)).await;
        rx.changed().await.unwrap();

        assert_eq!(rx.borrow().len(), MAX_SUGGESTIONS);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_query_clears_without_remote_call() {
        let store = seeded_store();
        let resolver = NameResolver::new(store.clone());
        let rx = resolver.subscribe();

        resolver.input("tom").await;
        tokio::time::advance(Duration::from_millis(100)).await;
        resolver.input("").await;
        tokio::time::advance(Duration::from_millis(DEBOUNCE_MS * 2)).await;
        tokio::task::yield_now().await;

        assert_eq!(store.search_calls(), 0);
        assert!(rx.borrow().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookup_failure_yields_empty_list() {
        let store = seeded_store();
        store.set_available(false);
        let resolver = NameResolver::new(store.clone());
        let mut rx = resolver.subscribe();

        resolver.input("tom").await;
        tokio::time::advance(Duration::from_millis(DEBOUNCE_MS)).await;
        rx.changed().await.unwrap();

        assert!(rx.borrow().is_empty());
        assert_eq!(store.search_calls(), 1);
    }
}
