//! Local-first merging of remote catalog snapshots into the displayed list

use crate::entry::Entry;
use vegtrack_api_client::CatalogItem;

/// Merge the authoritative catalog into the displayed list, local-first.
///
/// Local-only entries always survive a refresh unchanged. Everything else
/// (previous remote-derived snapshots and previously synced entries) is
/// rebuilt wholesale from the latest catalog, one snapshot per item, with
/// no incremental diffing.
pub fn merge(existing: &[Entry], remote: &[CatalogItem]) -> Vec<Entry> {
    let mut merged: Vec<Entry> = existing
        .iter()
        .filter(|entry| entry.is_local_only())
        .cloned()
        .collect();

    merged.extend(remote.iter().map(Entry::remote_snapshot));
    merged
}
