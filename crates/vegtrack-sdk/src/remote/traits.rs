//! Core trait for the remote catalog/price service

use crate::error::Result;
use async_trait::async_trait;
use vegtrack_api_client::{
    CatalogItem, CsvExport, NewCatalogItem, NewPriceRecord, PriceRecord, UpdatePriceRecord,
};

/// Abstraction over the remote catalog/price service.
///
/// The engine never talks HTTP directly; everything goes through this seam
/// so tests can substitute an in-memory store.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Look up catalog items by partial name (case-insensitive)
    async fn search(&self, query: &str) -> Result<Vec<CatalogItem>>;

    /// List the full catalog
    async fn list(&self) -> Result<Vec<CatalogItem>>;

    /// Get a single catalog item by id
    async fn get_item(&self, id: i64) -> Result<CatalogItem>;

    /// Create a new catalog item
    async fn create_item(&self, input: NewCatalogItem) -> Result<CatalogItem>;

    /// Record a price observation against a catalog item
    async fn create_price(&self, item_id: i64, input: NewPriceRecord) -> Result<PriceRecord>;

    /// List the price history of a catalog item
    async fn list_prices(&self, item_id: i64) -> Result<Vec<PriceRecord>>;

    /// Update a price record in place
    async fn update_price(&self, price_id: i64, input: UpdatePriceRecord) -> Result<PriceRecord>;

    /// Delete a price record
    async fn delete_price(&self, price_id: i64) -> Result<()>;

    /// Download one item's price history as CSV
    async fn export_csv(&self, item_id: i64) -> Result<CsvExport>;
}
