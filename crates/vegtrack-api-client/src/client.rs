//! HTTP client for the vegtrack catalog/price API

use crate::error::{ApiError, Result};
use crate::types::*;
use reqwest::{header, Client, RequestBuilder, StatusCode};
use std::sync::RwLock;
use std::time::Duration;

/// HTTP client for the vegtrack catalog/price service
///
/// # Example
///
/// ```rust,no_run
/// use vegtrack_api_client::{CatalogClient, ClientConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = CatalogClient::new(ClientConfig {
///     base_url: "http://localhost:8080/api".into(),
///     ..Default::default()
/// });
///
/// // Full catalog
/// let items = client.list_items().await?;
///
/// // Price history for one item
/// if let Some(item) = items.first() {
///     let prices = client.list_prices(item.id).await?;
/// }
/// # Ok(())
/// # }
/// ```
pub struct CatalogClient {
    base_url: String,
    /// Bearer token attached to every request; swapped on login/logout
    bearer: RwLock<Option<String>>,
    client: Client,
}

impl CatalogClient {
    /// Create a new catalog client
    pub fn new(config: ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            base_url: config.base_url,
            bearer: RwLock::new(config.bearer),
            client,
        }
    }

    /// Replace the bearer credential used for subsequent requests
    pub fn set_bearer(&self, bearer: Option<String>) {
        if let Ok(mut slot) = self.bearer.write() {
            *slot = bearer;
        }
    }

    /// Base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ==================== Catalog API ====================

    /// Look up catalog items by partial name (case-insensitive, server-side)
    pub async fn search_items(&self, query: &str) -> Result<Vec<CatalogItem>> {
        let url = format!(
            "{}/vegetables?q={}",
            self.base_url,
            urlencoding::encode(query)
        );

        let response = self.authorized(self.client.get(&url)).send().await?;
        self.handle_response(response).await
    }

    /// List the full catalog
    pub async fn list_items(&self) -> Result<Vec<CatalogItem>> {
        let url = format!("{}/vegetables", self.base_url);

        let response = self.authorized(self.client.get(&url)).send().await?;
        self.handle_response(response).await
    }

    /// Get a single catalog item by id
    pub async fn get_item(&self, id: i64) -> Result<CatalogItem> {
        let url = format!("{}/vegetables/{}", self.base_url, id);

        let response = self.authorized(self.client.get(&url)).send().await?;
        self.handle_response(response).await
    }

    /// Create a new catalog item
    pub async fn create_item(&self, input: &NewCatalogItem) -> Result<CatalogItem> {
        let url = format!("{}/vegetables", self.base_url);

        let response = self
            .authorized(self.client.post(&url))
            .header(header::CONTENT_TYPE, "application/json")
            .json(input)
            .send()
            .await?;

        self.handle_response(response).await
    }

    // ==================== Price API ====================

    /// Record a price observation against a catalog item
    pub async fn create_price(&self, item_id: i64, input: &NewPriceRecord) -> Result<PriceRecord> {
        let url = format!("{}/vegetables/{}/prices", self.base_url, item_id);

        let response = self
            .authorized(self.client.post(&url))
            .header(header::CONTENT_TYPE, "application/json")
            .json(input)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// List the price history of a catalog item
    ///
    /// Accepts both the bare array and the `{"prices": [...]}` envelope
    /// older deployments return.
    pub async fn list_prices(&self, item_id: i64) -> Result<Vec<PriceRecord>> {
        let url = format!("{}/vegetables/{}/prices", self.base_url, item_id);

        let response = self.authorized(self.client.get(&url)).send().await?;
        let value: serde_json::Value = self.handle_response(response).await?;

        if let Some(prices) = value.get("prices") {
            return Ok(serde_json::from_value(prices.clone())?);
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Update a price record in place
    pub async fn update_price(
        &self,
        price_id: i64,
        input: &UpdatePriceRecord,
    ) -> Result<PriceRecord> {
        let url = format!("{}/prices/{}", self.base_url, price_id);

        let response = self
            .authorized(self.client.put(&url))
            .header(header::CONTENT_TYPE, "application/json")
            .json(input)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Delete a price record
    pub async fn delete_price(&self, price_id: i64) -> Result<()> {
        let url = format!("{}/prices/{}", self.base_url, price_id);

        let response = self.authorized(self.client.delete(&url)).send().await?;

        match response.status() {
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound(format!("price {}", price_id))),
            status if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                Err(ApiError::Server {
                    status: status.as_u16(),
                    message: body,
                })
            }
            _ => Ok(()),
        }
    }

    // ==================== Export API ====================

    /// Download one item's price history as CSV
    ///
    /// The filename is taken from the Content-Disposition response header
    /// when the server sent one; callers fall back to a deterministic name
    /// otherwise.
    pub async fn export_csv(&self, item_id: i64) -> Result<CsvExport> {
        let url = format!("{}/vegetables/{}/export", self.base_url, item_id);

        let response = self.authorized(self.client.get(&url)).send().await?;

        match response.status() {
            StatusCode::UNAUTHORIZED => return Err(ApiError::Unauthorized),
            StatusCode::NOT_FOUND => {
                return Err(ApiError::NotFound(format!("vegetable {}", item_id)))
            }
            status if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                return Err(ApiError::Server {
                    status: status.as_u16(),
                    message: body,
                });
            }
            _ => {}
        }

        let filename = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(filename_from_disposition);

        let bytes = response.bytes().await?.to_vec();

        Ok(CsvExport { filename, bytes })
    }

    // ==================== Helper Methods ====================

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let bearer = self
            .bearer
            .read()
            .ok()
            .and_then(|slot| slot.as_ref().cloned());
        match bearer {
            Some(token) => request.header(header::AUTHORIZATION, format!("Bearer {}", token)),
            None => request,
        }
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound("Resource not found".to_string()));
        }

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Server {
                status,
                message: body,
            });
        }

        let body = response.json().await?;
        Ok(body)
    }
}

/// Extract the filename from a Content-Disposition header value
fn filename_from_disposition(value: &str) -> Option<String> {
    let lower = value.to_ascii_lowercase();
    let idx = lower.find("filename=")?;
    let rest = &value[idx + "filename=".len()..];
    let rest = rest.strip_prefix('"').unwrap_or(rest);
    let end = rest.find(['"', ';']).unwrap_or(rest.len());
    let name = rest[..end].trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_from_disposition() {
        assert_eq!(
            filename_from_disposition("attachment; filename=tomato-prices.csv"),
            Some("tomato-prices.csv".to_string())
        );
        assert_eq!(
            filename_from_disposition("attachment; filename=\"veg 3.csv\"; size=120"),
            Some("veg 3.csv".to_string())
        );
        assert_eq!(filename_from_disposition("attachment"), None);
        assert_eq!(filename_from_disposition("attachment; filename="), None);
    }
}
