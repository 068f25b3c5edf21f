//! CRUD façade over the displayed entry list
//!
//! Every operation branches on authentication state and the target entry's
//! sync status, and ends by writing the displayed list through to the
//! durable cache. Remote failures leave the displayed list unchanged.

use crate::cache::EntryCache;
use crate::entry::{Entry, EntryDraft, DEFAULT_CURRENCY};
use crate::error::{Result, SdkError};
use crate::identity;
use crate::merge;
use crate::notice::Notice;
use crate::reconcile::SyncReconciler;
use crate::remote::CatalogStore;
use crate::session::Session;
use crate::state::ListState;
use crate::suggest::NameResolver;
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinHandle;
use uuid::Uuid;
use vegtrack_api_client::{CsvExport, NewPriceRecord, PriceRecord, UpdatePriceRecord};

/// The engine's public surface: displayed list, cache, session, sync
///
/// # Example
///
/// ```rust,ignore
/// use vegtrack_sdk::{EntryDraft, EntryTracker, HttpCatalog, Session, Unit};
///
/// let session = Session::new();
/// let store = Arc::new(HttpCatalog::new("http://localhost:8080/api", session.clone()));
/// let tracker = EntryTracker::new("/data/vegtrack", store, session.clone());
///
/// // Works before login; the entry is cached locally
/// tracker
///     .add(EntryDraft::new("Tomato", 12.5, "2024-01-01").with_unit(Unit::Kg))
///     .await?;
///
/// // Logging in reconciles the cached entries against the catalog
/// session.login(token);
/// ```
pub struct EntryTracker {
    state: Arc<ListState>,
    store: Arc<dyn CatalogStore>,
    session: Session,
    reconciler: Arc<SyncReconciler>,
    watcher: JoinHandle<()>,
}

impl EntryTracker {
    /// Create a tracker with its cache rooted in `cache_dir`.
    ///
    /// Previously cached entries are loaded immediately; if the session is
    /// already authenticated, a reconciliation run starts in the background.
    pub fn new(
        cache_dir: impl AsRef<Path>,
        store: Arc<dyn CatalogStore>,
        session: Session,
    ) -> Self {
        let state = Arc::new(ListState::new(EntryCache::new(cache_dir)));
        let reconciler = Arc::new(SyncReconciler::new(
            Arc::clone(&state),
            Arc::clone(&store),
        ));
        let watcher = reconciler.spawn_auth_watcher(&session);

        Self {
            state,
            store,
            session,
            reconciler,
            watcher,
        }
    }

    /// Current displayed list, local-first
    pub async fn entries(&self) -> Vec<Entry> {
        self.state.entries.lock().await.clone()
    }

    /// Unexpired transient notices
    pub async fn notices(&self) -> Vec<Notice> {
        self.state.notices.active().await
    }

    /// The shared session context
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// A name resolver for autocomplete over the same remote store
    pub fn name_resolver(&self) -> NameResolver {
        NameResolver::new(Arc::clone(&self.store))
    }

    /// Request a reconciliation run outside the auth-edge trigger
    pub async fn sync_now(&self) {
        self.reconciler.trigger().await;
    }

    /// Add a new entry.
    ///
    /// Unauthenticated: the entry is appended local-only and cached.
    /// Authenticated: identity is resolved and a price record created first;
    /// the appended entry is fully synced and never local-only.
    pub async fn add(&self, draft: EntryDraft) -> Result<Entry> {
        draft.validate()?;

        if !self.session.is_authenticated() {
            let entry = Entry::from_draft(&draft);
            {
                let mut entries = self.state.entries.lock().await;
                entries.insert(0, entry.clone());
            }
            self.state.persist().await;
            self.state
                .notices
                .success("Saved locally (login to persist)")
                .await;
            return Ok(entry);
        }

        let item = match identity::resolve(self.store.as_ref(), draft.name.trim(), draft.unit).await
        {
            Ok(item) => item,
            Err(err) => {
                self.state
                    .notices
                    .error(format!("Save failed: {}", err))
                    .await;
                return Err(err);
            }
        };

        let record = match self
            .store
            .create_price(
                item.id,
                NewPriceRecord {
                    price: draft.price,
                    date: draft.date.clone(),
                    currency: draft
                        .currency
                        .clone()
                        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
                    market: draft.market.clone().unwrap_or_default(),
                },
            )
            .await
        {
            Ok(record) => record,
            Err(err) => {
                self.state
                    .notices
                    .error(format!("Save failed: {}", err))
                    .await;
                return Err(err);
            }
        };

        // Canonical name and persisted values win over the raw draft
        let entry = Entry {
            local_id: Uuid::new_v4(),
            name: item.name.clone(),
            price: record.price,
            date: record.date.clone(),
            unit: draft.unit,
            currency: record.currency.clone(),
            market: record.market.clone().unwrap_or_default(),
            catalog_id: Some(item.id),
            remote_id: Some(record.id),
        };
        {
            let mut entries = self.state.entries.lock().await;
            entries.insert(0, entry.clone());
        }
        self.state.persist().await;
        self.state.notices.success("Saved to server").await;
        Ok(entry)
    }

    /// Edit an entry in place.
    ///
    /// A synced entry is updated remotely first when authenticated; the
    /// local copy changes only after the remote update succeeded. Everything
    /// else is a local mutation.
    pub async fn edit(&self, local_id: Uuid, draft: EntryDraft) -> Result<Entry> {
        draft.validate()?;

        let target = self
            .find(local_id)
            .await
            .ok_or_else(|| SdkError::NotFound(format!("entry {}", local_id)))?;

        if let (Some(remote_id), true) = (target.remote_id, self.session.is_authenticated()) {
            if let Err(err) = self
                .store
                .update_price(
                    remote_id,
                    UpdatePriceRecord {
                        price: draft.price,
                        currency: draft
                            .currency
                            .clone()
                            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
                        date: draft.date.clone(),
                        market: draft.market.clone().unwrap_or_default(),
                    },
                )
                .await
            {
                self.state
                    .notices
                    .error(format!("Update failed: {}", err))
                    .await;
                return Err(err);
            }
            let updated = self.apply(local_id, &draft).await?;
            self.state.notices.success("Updated on server").await;
            return Ok(updated);
        }

        let updated = self.apply(local_id, &draft).await?;
        self.state.notices.success("Updated locally").await;
        Ok(updated)
    }

    /// Delete an entry.
    ///
    /// A synced entry is deleted remotely first when authenticated; the
    /// local copy is removed only on remote success. Everything else is
    /// removed locally unconditionally.
    pub async fn delete(&self, local_id: Uuid) -> Result<()> {
        let target = self
            .find(local_id)
            .await
            .ok_or_else(|| SdkError::NotFound(format!("entry {}", local_id)))?;

        if let (Some(remote_id), true) = (target.remote_id, self.session.is_authenticated()) {
            if let Err(err) = self.store.delete_price(remote_id).await {
                self.state
                    .notices
                    .error(format!("Delete failed: {}", err))
                    .await;
                return Err(err);
            }
            self.remove(local_id).await;
            self.state.notices.success("Deleted on server").await;
            return Ok(());
        }

        self.remove(local_id).await;
        self.state.notices.success("Removed locally").await;
        Ok(())
    }

    /// Refresh the displayed list from the catalog, local-first.
    ///
    /// A no-op when unauthenticated. Local-only entries always survive.
    pub async fn refresh(&self) -> Result<()> {
        if !self.session.is_authenticated() {
            return Ok(());
        }

        let items = match self.store.list().await {
            Ok(items) => items,
            Err(err) => {
                tracing::warn!("catalog refresh failed: {}", err);
                return Err(err);
            }
        };

        {
            let mut entries = self.state.entries.lock().await;
            let merged = merge::merge(&entries, &items);
            *entries = merged;
        }
        self.state.persist().await;
        Ok(())
    }

    /// Price history of one catalog item
    pub async fn price_history(&self, catalog_id: i64) -> Result<Vec<PriceRecord>> {
        self.store.list_prices(catalog_id).await
    }

    /// Download one item's price history as CSV.
    ///
    /// When the server did not name the file, a deterministic fallback is
    /// built from the item's id, name, and unit.
    pub async fn export_csv(&self, catalog_id: i64) -> Result<CsvExport> {
        let mut export = self.store.export_csv(catalog_id).await?;
        if export.filename.is_none() {
            let item = self.store.get_item(catalog_id).await?;
            export.filename = Some(fallback_filename(catalog_id, &item.name, &item.unit));
        }
        Ok(export)
    }

    async fn find(&self, local_id: Uuid) -> Option<Entry> {
        self.state
            .entries
            .lock()
            .await
            .iter()
            .find(|entry| entry.local_id == local_id)
            .cloned()
    }

    async fn apply(&self, local_id: Uuid, draft: &EntryDraft) -> Result<Entry> {
        let updated = {
            let mut entries = self.state.entries.lock().await;
            let entry = entries
                .iter_mut()
                .find(|entry| entry.local_id == local_id)
                .ok_or_else(|| SdkError::NotFound(format!("entry {}", local_id)))?;
            entry.apply_draft(draft);
            entry.clone()
        };
        self.state.persist().await;
        Ok(updated)
    }

    async fn remove(&self, local_id: Uuid) {
        {
            let mut entries = self.state.entries.lock().await;
            entries.retain(|entry| entry.local_id != local_id);
        }
        self.state.persist().await;
    }
}

impl Drop for EntryTracker {
    fn drop(&mut self) {
        self.watcher.abort();
    }
}

/// Deterministic export filename: `vegetable-{id}-{name}-{unit}-prices.csv`
/// with slugged name and unit
fn fallback_filename(id: i64, name: &str, unit: &str) -> String {
    format!(
        "vegetable-{}-{}-{}-prices.csv",
        id,
        slug_or(name, "veg"),
        slug_or(unit, "kg")
    )
}

/// Lowercase, with runs of non-alphanumerics collapsed to a single dash
fn slug_or(text: &str, fallback: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut last_dash = false;
    for ch in text.to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    if slug.chars().all(|c| c == '-') {
        fallback.to_string()
    } else {
        slug
    }
}
