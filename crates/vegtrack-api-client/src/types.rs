//! Types for the catalog/price API

use serde::{Deserialize, Serialize};

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for the catalog/price HTTP API
    pub base_url: String,
    /// Optional bearer token attached to every request
    pub bearer: Option<String>,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            bearer: None,
            timeout_secs: 30,
        }
    }
}

/// Canonical server-owned vegetable record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: i64,
    pub name: String,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Most recent recorded price, if any price has been recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_price: Option<f64>,
    /// Timestamp of the most recent price observation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

/// A single server-owned price observation tied to a catalog item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceRecord {
    pub id: i64,
    pub vegetable_id: i64,
    pub price: f64,
    pub currency: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Input for creating a catalog item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCatalogItem {
    pub name: String,
    pub unit: String,
}

/// Input for creating a price record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPriceRecord {
    pub price: f64,
    pub date: String,
    pub currency: String,
    pub market: String,
}

/// Input for updating a price record in place
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePriceRecord {
    pub price: f64,
    pub currency: String,
    pub date: String,
    pub market: String,
}

/// CSV export of one item's price history
#[derive(Debug, Clone)]
pub struct CsvExport {
    /// Filename from the Content-Disposition header, when the server sent one
    pub filename: Option<String>,
    /// Raw CSV bytes
    pub bytes: Vec<u8>,
}
