//! Client-side entry model
//!
//! An [`Entry`] is one tracked price observation. It starts local-only,
//! gains `catalog_id` and `remote_id` when reconciled against the remote
//! store, and never reverts to local-only afterwards.

use crate::error::{Result, SdkError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vegtrack_api_client::CatalogItem;

/// Currency used when the user did not supply one
pub const DEFAULT_CURRENCY: &str = "USD";

/// Unit of measure for a price observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Kg,
    G,
    Lb,
    Bunch,
    Litre,
    Piece,
}

impl Unit {
    /// Parse from string representation
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "kg" => Some(Self::Kg),
            "g" => Some(Self::G),
            "lb" => Some(Self::Lb),
            "bunch" => Some(Self::Bunch),
            "litre" => Some(Self::Litre),
            "piece" => Some(Self::Piece),
            _ => None,
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kg => "kg",
            Self::G => "g",
            Self::Lb => "lb",
            Self::Bunch => "bunch",
            Self::Litre => "litre",
            Self::Piece => "piece",
        }
    }
}

impl Default for Unit {
    fn default() -> Self {
        Self::Kg
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A tracked price observation
///
/// `catalog_id` and `remote_id` are attached together when the entry is
/// persisted remotely; an entry with only `catalog_id` is a remote-derived
/// snapshot produced by a catalog refresh, never a sync in progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    /// Client-generated identifier, stable for the entry's lifetime
    pub local_id: Uuid,
    /// Vegetable name as typed by the user
    pub name: String,
    pub price: f64,
    /// ISO calendar date of the observation (YYYY-MM-DD)
    pub date: String,
    #[serde(default)]
    pub unit: Unit,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub market: String,
    /// Resolved canonical catalog item, once known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_id: Option<i64>,
    /// Persisted remote price record, once synced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<i64>,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Entry {
    /// Build a fresh local-only entry from validated user input
    pub fn from_draft(draft: &EntryDraft) -> Self {
        Self {
            local_id: Uuid::new_v4(),
            name: draft.name.trim().to_string(),
            price: draft.price,
            date: draft.date.clone(),
            unit: draft.unit,
            currency: draft
                .currency
                .clone()
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            market: draft.market.clone().unwrap_or_default(),
            catalog_id: None,
            remote_id: None,
        }
    }

    /// Project a catalog item into a remote-derived latest-price snapshot
    ///
    /// The synthetic identifier is derived from the catalog id so the same
    /// item maps to the same `local_id` across refreshes, and can never
    /// collide with a generated v4 id.
    pub fn remote_snapshot(item: &CatalogItem) -> Self {
        Self {
            local_id: remote_snapshot_id(item.id),
            name: item.name.clone(),
            price: item.latest_price.unwrap_or(0.0),
            date: item
                .last_updated
                .clone()
                .unwrap_or_else(today_string),
            unit: Unit::from_str(&item.unit).unwrap_or_default(),
            currency: DEFAULT_CURRENCY.to_string(),
            market: String::new(),
            catalog_id: Some(item.id),
            remote_id: None,
        }
    }

    /// Synced: persisted remotely with both identifiers attached
    pub fn is_synced(&self) -> bool {
        self.catalog_id.is_some() && self.remote_id.is_some()
    }

    /// Remote-derived: a latest-price snapshot projected from the catalog
    pub fn is_remote_derived(&self) -> bool {
        self.catalog_id.is_some() && self.remote_id.is_none()
    }

    /// Local-only: not yet reconciled against the remote store
    pub fn is_local_only(&self) -> bool {
        self.catalog_id.is_none()
    }

    /// Attach the remote identifiers after a successful sync
    pub(crate) fn mark_synced(&mut self, catalog_id: i64, remote_id: i64) {
        self.catalog_id = Some(catalog_id);
        self.remote_id = Some(remote_id);
    }

    /// Overwrite the user-editable fields from validated input
    pub(crate) fn apply_draft(&mut self, draft: &EntryDraft) {
        self.name = draft.name.trim().to_string();
        self.price = draft.price;
        self.date = draft.date.clone();
        self.unit = draft.unit;
        if let Some(currency) = &draft.currency {
            self.currency = currency.clone();
        }
        if let Some(market) = &draft.market {
            self.market = market.clone();
        }
    }
}

/// Marker in the high bits of remote-derived identifiers; version nibble is
/// zero so a random v4 id can never share it.
const REMOTE_SNAPSHOT_MARKER: u64 = 0x7665_6774_0000_0000;

fn remote_snapshot_id(catalog_id: i64) -> Uuid {
    Uuid::from_u64_pair(REMOTE_SNAPSHOT_MARKER, catalog_id as u64)
}

/// Today's date as an ISO string, used when the catalog has no timestamp
pub(crate) fn today_string() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}

/// Validated user input for creating or editing an entry
#[derive(Debug, Clone, Default)]
pub struct EntryDraft {
    pub name: String,
    pub price: f64,
    pub date: String,
    pub unit: Unit,
    pub currency: Option<String>,
    pub market: Option<String>,
}

impl EntryDraft {
    /// Create a draft with the required fields
    pub fn new(name: impl Into<String>, price: f64, date: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price,
            date: date.into(),
            ..Default::default()
        }
    }

    /// Set the unit of measure
    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }

    /// Set the currency
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Set the market
    pub fn with_market(mut self, market: impl Into<String>) -> Self {
        self.market = Some(market.into());
        self
    }

    /// Parse free-text price input, rejecting non-numeric and non-positive
    /// values before any remote call is made
    pub fn parse_price(text: &str) -> Result<f64> {
        let price: f64 = text
            .trim()
            .parse()
            .map_err(|_| SdkError::Validation("price must be a number".to_string()))?;
        if !price.is_finite() || price <= 0.0 {
            return Err(SdkError::Validation(
                "price must be a positive number".to_string(),
            ));
        }
        Ok(price)
    }

    /// Validate the draft before it reaches the remote store
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SdkError::Validation("name required".to_string()));
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(SdkError::Validation(
                "price must be a positive number".to_string(),
            ));
        }
        if NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").is_err() {
            return Err(SdkError::Validation(
                "date must be an ISO date (YYYY-MM-DD)".to_string(),
            ));
        }
        Ok(())
    }
}
