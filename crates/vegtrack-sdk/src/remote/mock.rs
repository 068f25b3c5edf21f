//! Mock catalog store for testing
//!
//! In-memory catalog with configurable failures and per-operation call
//! counters, so tests can assert exactly which remote calls an operation
//! issued.

use crate::error::{Result, SdkError};
use crate::remote::traits::CatalogStore;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use vegtrack_api_client::{
    CatalogItem, CsvExport, NewCatalogItem, NewPriceRecord, PriceRecord, UpdatePriceRecord,
};

#[derive(Default)]
struct MockState {
    items: Vec<CatalogItem>,
    prices: Vec<PriceRecord>,
    next_item_id: i64,
    next_price_id: i64,
}

/// Configurable in-memory catalog store
pub struct MockCatalog {
    state: Mutex<MockState>,
    latency: Option<Duration>,
    available: AtomicBool,
    fail_price_creates: AtomicBool,
    fail_price_updates: AtomicBool,
    fail_price_deletes: AtomicBool,
    reject_credentials: AtomicBool,
    search_calls: AtomicU32,
    create_item_calls: AtomicU32,
    create_price_calls: AtomicU32,
    delete_price_calls: AtomicU32,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                next_item_id: 1,
                next_price_id: 1,
                ..Default::default()
            }),
            latency: None,
            available: AtomicBool::new(true),
            fail_price_creates: AtomicBool::new(false),
            fail_price_updates: AtomicBool::new(false),
            fail_price_deletes: AtomicBool::new(false),
            reject_credentials: AtomicBool::new(false),
            search_calls: AtomicU32::new(0),
            create_item_calls: AtomicU32::new(0),
            create_price_calls: AtomicU32::new(0),
            delete_price_calls: AtomicU32::new(0),
        }
    }

    /// Seed the catalog with existing items
    pub fn with_items(mut self, items: Vec<CatalogItem>) -> Self {
        let state = self.state.get_mut();
        state.next_item_id = items.iter().map(|i| i.id).max().unwrap_or(0) + 1;
        state.items = items;
        self
    }

    /// Add a simulated round-trip delay to every call
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make every call fail with a transient remote error
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Make price creations fail with a transient remote error
    pub fn set_fail_price_creates(&self, fail: bool) {
        self.fail_price_creates.store(fail, Ordering::SeqCst);
    }

    /// Make price updates fail with a transient remote error
    pub fn set_fail_price_updates(&self, fail: bool) {
        self.fail_price_updates.store(fail, Ordering::SeqCst);
    }

    /// Make price deletions fail with a transient remote error
    pub fn set_fail_price_deletes(&self, fail: bool) {
        self.fail_price_deletes.store(fail, Ordering::SeqCst);
    }

    /// Reject every call as unauthorized (session expiry)
    pub fn set_reject_credentials(&self, reject: bool) {
        self.reject_credentials.store(reject, Ordering::SeqCst);
    }

    /// Number of search calls issued
    pub fn search_calls(&self) -> u32 {
        self.search_calls.load(Ordering::SeqCst)
    }

    /// Number of catalog-item creations issued
    pub fn create_item_calls(&self) -> u32 {
        self.create_item_calls.load(Ordering::SeqCst)
    }

    /// Number of price-record creations issued
    pub fn create_price_calls(&self) -> u32 {
        self.create_price_calls.load(Ordering::SeqCst)
    }

    /// Number of price-record deletions issued
    pub fn delete_price_calls(&self) -> u32 {
        self.delete_price_calls.load(Ordering::SeqCst)
    }

    /// Catalog items currently in the store
    pub async fn items(&self) -> Vec<CatalogItem> {
        self.state.lock().await.items.clone()
    }

    /// Price records currently in the store
    pub async fn prices(&self) -> Vec<PriceRecord> {
        self.state.lock().await.prices.clone()
    }

    async fn gate(&self) -> Result<()> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.reject_credentials.load(Ordering::SeqCst) {
            return Err(SdkError::SessionExpired);
        }
        if !self.available.load(Ordering::SeqCst) {
            return Err(SdkError::Remote("mock store unavailable".to_string()));
        }
        Ok(())
    }
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogStore for MockCatalog {
    async fn search(&self, query: &str) -> Result<Vec<CatalogItem>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.gate().await?;

        let needle = query.to_lowercase();
        let state = self.state.lock().await;
        Ok(state
            .items
            .iter()
            .filter(|item| item.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn list(&self) -> Result<Vec<CatalogItem>> {
        self.gate().await?;
        Ok(self.state.lock().await.items.clone())
    }

    async fn get_item(&self, id: i64) -> Result<CatalogItem> {
        self.gate().await?;
        self.state
            .lock()
            .await
            .items
            .iter()
            .find(|item| item.id == id)
            .cloned()
            .ok_or_else(|| SdkError::NotFound(format!("vegetable {}", id)))
    }

    async fn create_item(&self, input: NewCatalogItem) -> Result<CatalogItem> {
        self.create_item_calls.fetch_add(1, Ordering::SeqCst);
        self.gate().await?;

        let mut state = self.state.lock().await;
        let item = CatalogItem {
            id: state.next_item_id,
            name: input.name,
            unit: input.unit,
            category: None,
            latest_price: None,
            last_updated: None,
        };
        state.next_item_id += 1;
        state.items.push(item.clone());
        Ok(item)
    }

    async fn create_price(&self, item_id: i64, input: NewPriceRecord) -> Result<PriceRecord> {
        self.create_price_calls.fetch_add(1, Ordering::SeqCst);
        self.gate().await?;

        if self.fail_price_creates.load(Ordering::SeqCst) {
            return Err(SdkError::Remote("price creation failed".to_string()));
        }

        let mut state = self.state.lock().await;
        if !state.items.iter().any(|item| item.id == item_id) {
            return Err(SdkError::NotFound(format!("vegetable {}", item_id)));
        }

        let record = PriceRecord {
            id: state.next_price_id,
            vegetable_id: item_id,
            price: input.price,
            currency: input.currency,
            date: input.date,
            market: Some(input.market),
            notes: None,
        };
        state.next_price_id += 1;
        state.prices.push(record.clone());

        // Keep the catalog's latest-price snapshot in step
        if let Some(item) = state.items.iter_mut().find(|item| item.id == item_id) {
            item.latest_price = Some(record.price);
            item.last_updated = Some(record.date.clone());
        }

        Ok(record)
    }

    async fn list_prices(&self, item_id: i64) -> Result<Vec<PriceRecord>> {
        self.gate().await?;
        Ok(self
            .state
            .lock()
            .await
            .prices
            .iter()
            .filter(|record| record.vegetable_id == item_id)
            .cloned()
            .collect())
    }

    async fn update_price(&self, price_id: i64, input: UpdatePriceRecord) -> Result<PriceRecord> {
        self.gate().await?;

        if self.fail_price_updates.load(Ordering::SeqCst) {
            return Err(SdkError::Remote("price update failed".to_string()));
        }

        let mut state = self.state.lock().await;
        let record = state
            .prices
            .iter_mut()
            .find(|record| record.id == price_id)
            .ok_or_else(|| SdkError::NotFound(format!("price {}", price_id)))?;

        record.price = input.price;
        record.currency = input.currency;
        record.date = input.date;
        record.market = Some(input.market);
        Ok(record.clone())
    }

    async fn delete_price(&self, price_id: i64) -> Result<()> {
        self.delete_price_calls.fetch_add(1, Ordering::SeqCst);
        self.gate().await?;

        if self.fail_price_deletes.load(Ordering::SeqCst) {
            return Err(SdkError::Remote("price deletion failed".to_string()));
        }

        let mut state = self.state.lock().await;
        let before = state.prices.len();
        state.prices.retain(|record| record.id != price_id);
        if state.prices.len() == before {
            return Err(SdkError::NotFound(format!("price {}", price_id)));
        }
        Ok(())
    }

    async fn export_csv(&self, item_id: i64) -> Result<CsvExport> {
        self.gate().await?;

        let state = self.state.lock().await;
        if !state.items.iter().any(|item| item.id == item_id) {
            return Err(SdkError::NotFound(format!("vegetable {}", item_id)));
        }

        let mut csv = String::from("date,price,currency,market\n");
        for record in state.prices.iter().filter(|r| r.vegetable_id == item_id) {
            csv.push_str(&format!(
                "{},{},{},{}\n",
                record.date,
                record.price,
                record.currency,
                record.market.as_deref().unwrap_or("")
            ));
        }

        Ok(CsvExport {
            filename: None,
            bytes: csv.into_bytes(),
        })
    }
}

/// Convenience for seeding tests
pub fn catalog_item(id: i64, name: &str, unit: &str) -> CatalogItem {
    CatalogItem {
        id,
        name: name.to_string(),
        unit: unit.to_string(),
        category: None,
        latest_price: None,
        last_updated: None,
    }
}
