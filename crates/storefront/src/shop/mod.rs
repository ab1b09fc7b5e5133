//! Catalog and cart backend client.
//!
//! # Architecture
//!
//! - The backend is the source of truth for products, promotional images and
//!   carts - NO local sync, direct REST calls
//! - In-memory caching via `moka` for catalog reads (cart reads are never cached)
//! - `ShopApiClient` implements the [`CatalogService`](crate::services::CatalogService)
//!   and [`CartService`](crate::services::CartService) interfaces consumed by
//!   the home view controller
//!
//! # Example
//!
//! ```rust,ignore
//! use freshcart_core::{FilterSet, SortKey};
//! use freshcart_storefront::shop::ShopApiClient;
//!
//! let client = ShopApiClient::new(&config.shop_api)?;
//! let products = client
//!     .get_filtered_products(&FilterSet::new(), SortKey::PriceLowToHigh)
//!     .await?;
//! ```

mod api;
pub mod types;

pub use api::ShopApiClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to the catalog backend.
#[derive(Debug, Error)]
pub enum ShopApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Backend answered 2xx but flagged the call as unsuccessful.
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Configured base URL cannot carry API paths.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shop_api_error_display() {
        let err = ShopApiError::Api {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 500 - boom");

        let err = ShopApiError::RateLimited(3);
        assert_eq!(err.to_string(), "Rate limited, retry after 3 seconds");
    }
}
