//! In-memory service fakes for controller and actor tests.

#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use freshcart_core::{CartItemRequest, FilterSet, Price, ProductId, SortKey, UserId};

use super::{CartService, CatalogService, FilterStore, FilterStoreError, Notifier};
use crate::models::Toast;
use crate::shop::{AddToCartResponse, Cart, FeatureImage, Product, ShopApiError};

pub fn image(url: &str) -> FeatureImage {
    FeatureImage {
        id: None,
        image: url.to_string(),
    }
}

pub fn images(count: usize) -> Vec<FeatureImage> {
    (0..count)
        .map(|i| image(&format!("https://cdn.example.com/slide-{i}.jpg")))
        .collect()
}

pub fn product(id: &str, cents: i64) -> Product {
    Product {
        id: ProductId::new(id),
        image: None,
        title: format!("Product {id}"),
        description: String::new(),
        category: "Fish".to_string(),
        brand: "Nordic".to_string(),
        price: Price::from_cents(cents),
        sale_price: Price::default(),
        total_stock: 10,
    }
}

fn unavailable() -> ShopApiError {
    ShopApiError::Api {
        status: 503,
        message: "unavailable".to_string(),
    }
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Default)]
pub struct CatalogState {
    pub images: Vec<FeatureImage>,
    pub products: Vec<Product>,
    pub fail_images: bool,
    pub fail_products: bool,
    pub fail_details: bool,
    pub product_queries: Vec<(FilterSet, SortKey)>,
    pub detail_requests: Vec<ProductId>,
    pub image_requests: usize,
}

#[derive(Clone, Default)]
pub struct FakeCatalog {
    pub state: Arc<Mutex<CatalogState>>,
}

impl FakeCatalog {
    pub fn with(images: Vec<FeatureImage>, products: Vec<Product>) -> Self {
        let catalog = Self::default();
        {
            let mut state = catalog.state.lock().unwrap();
            state.images = images;
            state.products = products;
        }
        catalog
    }

    pub fn set_images(&self, images: Vec<FeatureImage>) {
        self.state.lock().unwrap().images = images;
    }
}

impl CatalogService for FakeCatalog {
    async fn feature_images(&self) -> Result<Vec<FeatureImage>, ShopApiError> {
        let mut state = self.state.lock().unwrap();
        state.image_requests += 1;
        if state.fail_images {
            return Err(unavailable());
        }
        Ok(state.images.clone())
    }

    async fn products(
        &self,
        filter: &FilterSet,
        sort: SortKey,
    ) -> Result<Vec<Product>, ShopApiError> {
        let mut state = self.state.lock().unwrap();
        state.product_queries.push((filter.clone(), sort));
        if state.fail_products {
            return Err(unavailable());
        }
        Ok(state.products.clone())
    }

    async fn product_details(&self, id: &ProductId) -> Result<Option<Product>, ShopApiError> {
        let mut state = self.state.lock().unwrap();
        state.detail_requests.push(id.clone());
        if state.fail_details {
            return Err(unavailable());
        }
        Ok(state.products.iter().find(|p| &p.id == id).cloned())
    }
}

// =============================================================================
// Cart
// =============================================================================

/// How the fake cart answers add-to-cart calls.
#[derive(Clone, Copy, Default)]
pub enum CartReply {
    #[default]
    Success,
    Unsuccessful,
    TransportError,
}

#[derive(Default)]
pub struct CartState {
    pub reply: CartReply,
    pub added: Vec<CartItemRequest>,
    pub refreshes: Vec<Option<UserId>>,
}

#[derive(Clone, Default)]
pub struct FakeCart {
    pub state: Arc<Mutex<CartState>>,
}

impl FakeCart {
    pub fn replying(reply: CartReply) -> Self {
        let cart = Self::default();
        cart.state.lock().unwrap().reply = reply;
        cart
    }
}

impl CartService for FakeCart {
    async fn add_item(&self, request: &CartItemRequest) -> Result<AddToCartResponse, ShopApiError> {
        let mut state = self.state.lock().unwrap();
        state.added.push(request.clone());
        match state.reply {
            CartReply::Success => Ok(AddToCartResponse {
                success: true,
                message: None,
            }),
            CartReply::Unsuccessful => Ok(AddToCartResponse::default()),
            CartReply::TransportError => Err(unavailable()),
        }
    }

    async fn refresh(&self, user_id: Option<&UserId>) -> Result<Cart, ShopApiError> {
        self.state.lock().unwrap().refreshes.push(user_id.cloned());
        Ok(Cart::default())
    }
}

// =============================================================================
// Notifier and filter store
// =============================================================================

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub toasts: Arc<Mutex<Vec<Toast>>>,
}

impl Notifier for RecordingNotifier {
    async fn notify(&self, toast: Toast) {
        self.toasts.lock().unwrap().push(toast);
    }
}

/// A filter store operation, recorded in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOp {
    Clear,
    Store(FilterSet),
}

#[derive(Clone, Default)]
pub struct MemoryFilterStore {
    pub value: Arc<Mutex<Option<FilterSet>>>,
    pub ops: Arc<Mutex<Vec<FilterOp>>>,
}

impl FilterStore for MemoryFilterStore {
    async fn clear(&self) -> Result<(), FilterStoreError> {
        self.ops.lock().unwrap().push(FilterOp::Clear);
        *self.value.lock().unwrap() = None;
        Ok(())
    }

    async fn store(&self, filter: &FilterSet) -> Result<(), FilterStoreError> {
        self.ops.lock().unwrap().push(FilterOp::Store(filter.clone()));
        *self.value.lock().unwrap() = Some(filter.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<FilterSet>, FilterStoreError> {
        Ok(self.value.lock().unwrap().clone())
    }
}
