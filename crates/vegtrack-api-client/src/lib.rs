//! Rust client for the vegtrack catalog/price HTTP API
//!
//! # Example
//!
//! ```rust,no_run
//! use vegtrack_api_client::{CatalogClient, ClientConfig, NewPriceRecord};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create client
//! let client = CatalogClient::new(ClientConfig {
//!     base_url: "http://localhost:8080/api".into(),
//!     ..Default::default()
//! });
//!
//! // Look up catalog items by partial name
//! let matches = client.search_items("toma").await?;
//!
//! // Record a price against the first match
//! if let Some(item) = matches.first() {
//!     client
//!         .create_price(
//!             item.id,
//!             &NewPriceRecord {
//!                 price: 12.5,
//!                 date: "2024-01-01".into(),
//!                 currency: "USD".into(),
//!                 market: String::new(),
//!             },
//!         )
//!         .await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod types;

// Re-export main types
pub use client::CatalogClient;
pub use error::{ApiError, Result};
pub use types::*;
