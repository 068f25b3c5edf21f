//! Vegtrack SDK - offline-first price-entry reconciliation engine
//!
//! Lets a caller record vegetable price observations before authenticating,
//! persists them in a durable local cache, and reconciles that cache against
//! the remote catalog/price store once authentication succeeds, without
//! producing duplicate catalog entries or losing unsynced data.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │              EntryTracker                 │
//! │    (CRUD façade over the displayed list)  │
//! └──────┬──────────────┬──────────────┬──────┘
//!        │              │              │
//!        ▼              ▼              ▼
//! ┌────────────┐ ┌──────────────┐ ┌──────────────┐
//! │ EntryCache │ │SyncReconciler│ │ CatalogStore │
//! │ (durable   │ │ (sequential, │ │ (HTTP or     │
//! │  snapshot) │ │ single-flight)│ │  mock)       │
//! └────────────┘ └──────────────┘ └──────────────┘
//! ```
//!
//! User input always lands in the local cache first; once the session
//! reports the became-authenticated edge, the reconciler resolves each
//! local-only entry to a canonical catalog item and persists a price record
//! for it, strictly one entry at a time.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vegtrack_sdk::{EntryDraft, EntryTracker, HttpCatalog, Session, Unit};
//!
//! let session = Session::new();
//! let store = Arc::new(HttpCatalog::new("http://localhost:8080/api", session.clone()));
//! let tracker = EntryTracker::new("/data/vegtrack", store, session.clone());
//!
//! // Before login: cached locally
//! tracker
//!     .add(EntryDraft::new("Tomato", 12.5, "2024-01-01").with_unit(Unit::Kg))
//!     .await?;
//!
//! // After login: the cached entry is reconciled in the background
//! session.login(token);
//! ```

// Entry model and validation
pub mod entry;

// Durable local persistence
pub mod cache;

// Authentication session context
pub mod session;

// Remote catalog/price store seam
pub mod remote;

// Debounced name suggestions
pub mod suggest;

// Find-or-create identity resolution
pub mod identity;

// Sequential sync reconciliation
pub mod reconcile;

// Local-first list merging
pub mod merge;

// CRUD façade
pub mod tracker;

// Transient notices
pub mod notice;

// Error types
pub mod error;

mod state;

// Re-export main types
pub use cache::EntryCache;
pub use entry::{Entry, EntryDraft, Unit, DEFAULT_CURRENCY};
pub use error::{Result, SdkError};
pub use merge::merge;
pub use notice::{Notice, NoticeBoard, NoticeKind};
pub use reconcile::{SyncPhase, SyncReconciler};
pub use remote::{CatalogStore, HttpCatalog, MockCatalog};
pub use session::{AuthState, Session, SessionEvent};
pub use suggest::NameResolver;
pub use tracker::EntryTracker;

// Re-export from the underlying API client
pub use vegtrack_api_client::{
    CatalogItem, ClientConfig, CsvExport, NewCatalogItem, NewPriceRecord, PriceRecord,
    UpdatePriceRecord,
};
