//! HTTP-backed catalog store
//!
//! Wraps [`CatalogClient`] behind the [`CatalogStore`] seam, keeps the
//! client's bearer credential in step with the session, and translates a
//! credential rejection into a session expiry.

use crate::error::{Result, SdkError};
use crate::remote::traits::CatalogStore;
use crate::session::Session;
use async_trait::async_trait;
use vegtrack_api_client::{
    CatalogClient, CatalogItem, ClientConfig, CsvExport, NewCatalogItem, NewPriceRecord,
    PriceRecord, UpdatePriceRecord,
};

/// Catalog store talking to the real catalog/price service
pub struct HttpCatalog {
    client: CatalogClient,
    session: Session,
}

impl HttpCatalog {
    /// Create a store over the given API base URL
    pub fn new(base_url: impl Into<String>, session: Session) -> Self {
        Self::with_config(
            ClientConfig {
                base_url: base_url.into(),
                ..Default::default()
            },
            session,
        )
    }

    /// Create a store with full client configuration
    pub fn with_config(config: ClientConfig, session: Session) -> Self {
        Self {
            client: CatalogClient::new(config),
            session,
        }
    }

    /// Attach the current credential, run the call, and expire the session
    /// on a 401-class rejection. The failed unit of work stays failed; the
    /// caller retries it on the next sync trigger.
    async fn call<T, F, Fut>(&self, op: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = vegtrack_api_client::Result<T>>,
    {
        self.client.set_bearer(self.session.token());
        match op().await {
            Err(vegtrack_api_client::ApiError::Unauthorized) => {
                self.session.expire();
                Err(SdkError::SessionExpired)
            }
            Err(other) => Err(other.into()),
            Ok(value) => Ok(value),
        }
    }
}

#[async_trait]
impl CatalogStore for HttpCatalog {
    async fn search(&self, query: &str) -> Result<Vec<CatalogItem>> {
        self.call(|| self.client.search_items(query)).await
    }

    async fn list(&self) -> Result<Vec<CatalogItem>> {
        self.call(|| self.client.list_items()).await
    }

    async fn get_item(&self, id: i64) -> Result<CatalogItem> {
        self.call(|| self.client.get_item(id)).await
    }

    async fn create_item(&self, input: NewCatalogItem) -> Result<CatalogItem> {
        self.call(|| self.client.create_item(&input)).await
    }

    async fn create_price(&self, item_id: i64, input: NewPriceRecord) -> Result<PriceRecord> {
        self.call(|| self.client.create_price(item_id, &input)).await
    }

    async fn list_prices(&self, item_id: i64) -> Result<Vec<PriceRecord>> {
        self.call(|| self.client.list_prices(item_id)).await
    }

    async fn update_price(&self, price_id: i64, input: UpdatePriceRecord) -> Result<PriceRecord> {
        self.call(|| self.client.update_price(price_id, &input)).await
    }

    async fn delete_price(&self, price_id: i64) -> Result<()> {
        self.call(|| self.client.delete_price(price_id)).await
    }

    async fn export_csv(&self, item_id: i64) -> Result<CsvExport> {
        self.call(|| self.client.export_csv(item_id)).await
    }
}
