//! Sequential reconciliation of local-only entries against the remote store
//!
//! Triggered on the unauthenticated -> authenticated session edge. Entries
//! are processed one at a time, never concurrently: two in-flight identity
//! resolutions for the same name would race to create duplicate catalog
//! items. A single-flight guard serializes whole runs the same way; a
//! trigger that arrives while a run is active coalesces into exactly one
//! follow-up run.

use crate::entry::Entry;
use crate::error::SdkError;
use crate::identity;
use crate::remote::CatalogStore;
use crate::session::{Session, SessionEvent};
use crate::state::ListState;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use vegtrack_api_client::NewPriceRecord;

/// Per-entry progression during a reconciliation run.
///
/// `LocalOnly -> Resolving -> Persisting -> Synced`, with `Failed` looping
/// back to `LocalOnly` for retry on the next trigger. `Synced` is terminal
/// for this engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    LocalOnly,
    Resolving,
    Persisting,
    Synced,
    Failed,
}

impl std::fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let phase = match self {
            Self::LocalOnly => "local-only",
            Self::Resolving => "resolving",
            Self::Persisting => "persisting",
            Self::Synced => "synced",
            Self::Failed => "failed",
        };
        write!(f, "{}", phase)
    }
}

/// Converts local-only entries into synced entries against the remote store
pub struct SyncReconciler {
    state: Arc<ListState>,
    store: Arc<dyn CatalogStore>,
    /// Held for the duration of a run; serializes whole batches
    run_lock: Mutex<()>,
    /// Trigger arrived; cleared when a run starts working on it
    rerun: AtomicBool,
}

impl SyncReconciler {
    pub(crate) fn new(state: Arc<ListState>, store: Arc<dyn CatalogStore>) -> Self {
        Self {
            state,
            store,
            run_lock: Mutex::new(()),
            rerun: AtomicBool::new(false),
        }
    }

    /// Watch the session and trigger a run on every became-authenticated
    /// edge. Re-authentication without an intervening logout emits no edge
    /// and therefore re-runs nothing.
    pub(crate) fn spawn_auth_watcher(self: &Arc<Self>, session: &Session) -> JoinHandle<()> {
        let mut events = session.events();
        let reconciler = Arc::clone(self);
        let initially_authenticated = session.is_authenticated();

        tokio::spawn(async move {
            if initially_authenticated {
                reconciler.trigger().await;
            }
            loop {
                match events.recv().await {
                    Ok(SessionEvent::Authenticated) => reconciler.trigger().await,
                    Ok(_) => {}
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => {}
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    /// Request a reconciliation run.
    ///
    /// If no run is active, runs to completion (including any follow-up runs
    /// requested while working). If a run is already active, returns
    /// immediately; the active run picks the request up afterwards.
    pub async fn trigger(&self) {
        self.rerun.store(true, Ordering::SeqCst);

        let Ok(_guard) = self.run_lock.try_lock() else {
            return;
        };

        while self.rerun.swap(false, Ordering::SeqCst) {
            self.run_batch().await;
        }
    }

    async fn run_batch(&self) {
        // Snapshot the local-only entries; already-synced entries never
        // re-enter the pipeline, which keeps repeated runs idempotent.
        let batch: Vec<Entry> = {
            let entries = self.state.entries.lock().await;
            entries
                .iter()
                .filter(|entry| entry.is_local_only())
                .cloned()
                .collect()
        };

        if batch.is_empty() {
            return;
        }
        tracing::debug!("reconciling {} local-only entries", batch.len());

        for entry in batch {
            match self.sync_entry(&entry).await {
                Ok((catalog_id, remote_id)) => {
                    {
                        let mut entries = self.state.entries.lock().await;
                        if let Some(current) = entries
                            .iter_mut()
                            .find(|candidate| candidate.local_id == entry.local_id)
                        {
                            current.mark_synced(catalog_id, remote_id);
                        }
                    }
                    self.state.persist().await;
                    self.state
                        .notices
                        .success(format!("Synced {}", entry.name))
                        .await;
                }
                Err((phase, err)) => {
                    // The entry stays local-only and is retried on the next
                    // trigger; one failure never aborts the batch.
                    tracing::warn!(
                        "sync failed for {} while {}: {}",
                        entry.name,
                        phase,
                        err
                    );
                    self.state
                        .notices
                        .error(format!("Sync failed for {}: {}", entry.name, err))
                        .await;
                }
            }
        }
    }

    /// Drive one entry through resolve-then-persist. Returns the ids to
    /// attach, or the phase that failed.
    async fn sync_entry(&self, entry: &Entry) -> Result<(i64, i64), (SyncPhase, SdkError)> {
        let item = identity::resolve(self.store.as_ref(), &entry.name, entry.unit)
            .await
            .map_err(|err| (SyncPhase::Resolving, err))?;

        let record = self
            .store
            .create_price(
                item.id,
                NewPriceRecord {
                    price: entry.price,
                    date: entry.date.clone(),
                    currency: entry.currency.clone(),
                    market: entry.market.clone(),
                },
            )
            .await
            .map_err(|err| (SyncPhase::Persisting, err))?;

        Ok((item.id, record.id))
    }
}
