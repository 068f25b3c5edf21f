//! Identity resolution: find-or-create the canonical catalog item a name
//! refers to.

use crate::entry::Unit;
use crate::error::Result;
use crate::remote::CatalogStore;
use vegtrack_api_client::{CatalogItem, NewCatalogItem};

/// Resolve `name` to its canonical catalog item.
///
/// Prefers a case-insensitive exact name match among the search results;
/// otherwise falls back to the first result. With no results at all, a new
/// item is created with the given unit and returned.
///
/// The first-result fallback is a heuristic: when several near-matches exist
/// and none is exact, the price ends up attached to whichever the server
/// listed first. Callers that cannot tolerate mis-attribution must not rely
/// on it.
///
/// At most one creation is issued per call. Exactly-once creation across
/// concurrent resolutions of the same name is NOT guaranteed here; the sync
/// reconciler provides it by processing entries strictly sequentially.
pub async fn resolve(
    store: &dyn CatalogStore,
    name: &str,
    default_unit: Unit,
) -> Result<CatalogItem> {
    let results = store.search(name).await?;

    let lowered = name.to_lowercase();
    if let Some(exact) = results
        .iter()
        .find(|item| item.name.to_lowercase() == lowered)
    {
        return Ok(exact.clone());
    }

    if let Some(first) = results.into_iter().next() {
        return Ok(first);
    }

    store
        .create_item(NewCatalogItem {
            name: name.to_string(),
            unit: default_unit.as_str().to_string(),
        })
        .await
}
