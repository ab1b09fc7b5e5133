//! Interfaces injected into the home view controller.
//!
//! # Services
//!
//! - [`CatalogService`] - promotional images, product listings, product details
//! - [`CartService`] - add-to-cart and cart refresh
//! - [`Notifier`] - transient toast messages
//! - [`FilterStore`] - session-scoped listing filter hand-off
//!
//! `ShopApiClient` implements the catalog and cart interfaces; the session
//! module implements the notifier and filter store on top of `tower-sessions`.

pub mod session;

#[cfg(test)]
pub(crate) mod testing;

use std::future::Future;

use freshcart_core::{CartItemRequest, FilterSet, ProductId, SortKey, UserId};
use thiserror::Error;

use crate::models::Toast;
use crate::shop::{AddToCartResponse, Cart, FeatureImage, Product, ShopApiClient, ShopApiError};

pub use session::{SessionFilterStore, SessionToasts, take_toasts};

/// Read access to the product catalog.
pub trait CatalogService: Send + Sync {
    /// Promotional images for the homepage slider.
    fn feature_images(&self) -> impl Future<Output = Result<Vec<FeatureImage>, ShopApiError>> + Send;

    /// Products narrowed by `filter`, ordered by `sort`.
    fn products(
        &self,
        filter: &FilterSet,
        sort: SortKey,
    ) -> impl Future<Output = Result<Vec<Product>, ShopApiError>> + Send;

    /// A single product, `None` when unknown.
    fn product_details(
        &self,
        id: &ProductId,
    ) -> impl Future<Output = Result<Option<Product>, ShopApiError>> + Send;
}

/// Cart mutations and reads.
pub trait CartService: Send + Sync {
    fn add_item(
        &self,
        request: &CartItemRequest,
    ) -> impl Future<Output = Result<AddToCartResponse, ShopApiError>> + Send;

    fn refresh(
        &self,
        user_id: Option<&UserId>,
    ) -> impl Future<Output = Result<Cart, ShopApiError>> + Send;
}

/// Fire-and-forget notification surface.
pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast) -> impl Future<Output = ()> + Send;
}

/// Errors from the session-scoped filter store.
#[derive(Debug, Error)]
pub enum FilterStoreError {
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

/// Session-scoped storage for the listing filter hand-off.
///
/// Last writer wins: callers clear before each write, nothing is merged.
pub trait FilterStore: Send + Sync {
    fn clear(&self) -> impl Future<Output = Result<(), FilterStoreError>> + Send;

    fn store(&self, filter: &FilterSet) -> impl Future<Output = Result<(), FilterStoreError>> + Send;

    fn load(&self) -> impl Future<Output = Result<Option<FilterSet>, FilterStoreError>> + Send;
}

impl CatalogService for ShopApiClient {
    async fn feature_images(&self) -> Result<Vec<FeatureImage>, ShopApiError> {
        self.get_feature_images().await
    }

    async fn products(
        &self,
        filter: &FilterSet,
        sort: SortKey,
    ) -> Result<Vec<Product>, ShopApiError> {
        self.get_filtered_products(filter, sort).await
    }

    async fn product_details(&self, id: &ProductId) -> Result<Option<Product>, ShopApiError> {
        self.get_product_details(id).await
    }
}

impl CartService for ShopApiClient {
    async fn add_item(&self, request: &CartItemRequest) -> Result<AddToCartResponse, ShopApiError> {
        self.add_to_cart(request).await
    }

    async fn refresh(&self, user_id: Option<&UserId>) -> Result<Cart, ShopApiError> {
        self.get_cart(user_id).await
    }
}
