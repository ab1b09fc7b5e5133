//! Home view controller.
//!
//! Owns the homepage state (promotional images, featured products, slider
//! position, detail dialog) and performs the homepage interactions against
//! injected services. HTTP handlers drive a controller per request; the
//! [`HomeActor`](super::HomeActor) drives a long-lived one from messages.

use freshcart_core::{CartItemRequest, CategoryId, FilterSet, ProductId, SortKey, UserId};
use tracing::{debug, instrument, warn};

use super::carousel::Carousel;
use super::dialog::DetailDialog;
use super::view::HomeView;
use crate::models::Toast;
use crate::services::{CartService, CatalogService, FilterStore, FilterStoreError, Notifier};
use crate::shop::{FeatureImage, Product, ShopApiError};

/// Route the listing page is served on.
pub const LISTING_ROUTE: &str = "/shop/listing";

/// Toast title shown after a confirmed add-to-cart.
pub const ADDED_TO_CART_TITLE: &str = "Product added to cart";

/// Services a home controller works against.
#[derive(Clone)]
pub struct HomeServices<C, K, N, F> {
    pub catalog: C,
    pub cart: K,
    pub notifier: N,
    pub filters: F,
}

/// Outcome of an add-to-cart interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddToCartOutcome {
    /// Backend confirmed; cart refreshed and toast shown.
    Added,
    /// Backend answered without `success: true`.
    Rejected,
    /// The request did not complete.
    Failed,
}

/// Homepage state and interactions.
pub struct HomeController<C, K, N, F> {
    services: HomeServices<C, K, N, F>,
    user_id: Option<UserId>,
    feature_images: Vec<FeatureImage>,
    products: Vec<Product>,
    carousel: Carousel,
    dialog: DetailDialog,
}

impl<C, K, N, F> HomeController<C, K, N, F>
where
    C: CatalogService,
    K: CartService,
    N: Notifier,
    F: FilterStore,
{
    /// Create a controller for a shopper (`None` for guests).
    #[must_use]
    pub fn new(services: HomeServices<C, K, N, F>, user_id: Option<UserId>) -> Self {
        Self {
            services,
            user_id,
            feature_images: Vec::new(),
            products: Vec::new(),
            carousel: Carousel::default(),
            dialog: DetailDialog::default(),
        }
    }

    #[must_use]
    pub const fn catalog(&self) -> &C {
        &self.services.catalog
    }

    #[must_use]
    pub const fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    #[must_use]
    pub const fn dialog(&self) -> &DetailDialog {
        &self.dialog
    }

    // =========================================================================
    // Initial load
    // =========================================================================

    /// Fetch promotional images and the featured product list concurrently.
    ///
    /// Failures leave the affected slice empty.
    #[instrument(skip(self))]
    pub async fn initialize(&mut self) {
        let filter = FilterSet::new();
        let (images, products) = tokio::join!(
            self.services.catalog.feature_images(),
            self.services
                .catalog
                .products(&filter, SortKey::PriceLowToHigh),
        );

        self.apply_feature_images(absorb(images, "feature images"));
        self.apply_products(absorb(products, "featured products"));
    }

    /// Replace the promotional image collection.
    pub fn apply_feature_images(&mut self, images: Vec<FeatureImage>) {
        self.carousel.set_len(images.len());
        self.feature_images = images;
    }

    /// Replace the featured product list.
    pub fn apply_products(&mut self, products: Vec<Product>) {
        self.products = products;
    }

    // =========================================================================
    // Slider
    // =========================================================================

    pub const fn next_slide(&mut self) {
        self.carousel.advance();
    }

    pub const fn previous_slide(&mut self) {
        self.carousel.retreat();
    }

    // =========================================================================
    // Category hand-off
    // =========================================================================

    /// Store `{ "category": [id] }` for the listing page and return the route
    /// to navigate to.
    ///
    /// Any previously stored filter is cleared first.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be written.
    #[instrument(skip(self))]
    pub async fn select_category(&self, id: CategoryId) -> Result<&'static str, FilterStoreError> {
        self.services.filters.clear().await?;
        self.services
            .filters
            .store(&FilterSet::for_category(id))
            .await?;
        debug!(category = %id, "Stored category filter for listing");
        Ok(LISTING_ROUTE)
    }

    // =========================================================================
    // Product details
    // =========================================================================

    /// Mark a detail request as pending.
    pub fn request_details(&mut self, id: ProductId) {
        self.dialog.request(id);
    }

    /// Apply a detail response; returns `true` when it opened the dialog.
    pub fn resolve_details(
        &mut self,
        id: &ProductId,
        result: Result<Option<Product>, ShopApiError>,
    ) -> bool {
        let product = absorb_option(result, id);
        self.dialog.resolve(id, product)
    }

    /// Request a product and open the dialog with it.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn view_details(&mut self, id: ProductId) -> bool {
        self.request_details(id.clone());
        let result = self.services.catalog.product_details(&id).await;
        self.resolve_details(&id, result)
    }

    /// Request a product and open the dialog with it, surfacing fetch errors.
    ///
    /// A failed fetch closes the dialog before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns the backend error when the product could not be fetched.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn try_view_details(&mut self, id: ProductId) -> Result<bool, ShopApiError> {
        self.request_details(id.clone());
        match self.services.catalog.product_details(&id).await {
            Ok(product) => Ok(self.dialog.resolve(&id, product)),
            Err(e) => {
                self.dialog.resolve(&id, None);
                Err(e)
            }
        }
    }

    pub fn close_details(&mut self) {
        self.dialog.close();
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add one unit of a product to the shopper's cart.
    ///
    /// On confirmed success the cart is refreshed and a toast is shown, each
    /// exactly once. Anything else is silent to the shopper.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_to_cart(&self, product_id: ProductId) -> AddToCartOutcome {
        let request = CartItemRequest::single(self.user_id.clone(), product_id);

        match self.services.cart.add_item(&request).await {
            Ok(response) if response.success => {
                if let Err(e) = self.services.cart.refresh(self.user_id.as_ref()).await {
                    warn!(error = %e, "Failed to refresh cart after add");
                }
                self.services
                    .notifier
                    .notify(Toast::titled(ADDED_TO_CART_TITLE))
                    .await;
                AddToCartOutcome::Added
            }
            Ok(response) => {
                warn!(message = ?response.message, "Add to cart was not successful");
                AddToCartOutcome::Rejected
            }
            Err(e) => {
                warn!(error = %e, "Add to cart request failed");
                AddToCartOutcome::Failed
            }
        }
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Snapshot the current state for rendering.
    #[must_use]
    pub fn view(&self) -> HomeView {
        HomeView::build(
            &self.feature_images,
            self.carousel.current(),
            self.carousel.shows_controls(),
            &self.products,
            self.dialog.product(),
        )
    }
}

/// Log a failed fetch and fall back to an empty slice.
fn absorb<T>(result: Result<Vec<T>, ShopApiError>, what: &str) -> Vec<T> {
    result.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to fetch {what}");
        Vec::new()
    })
}

fn absorb_option(result: Result<Option<Product>, ShopApiError>, id: &ProductId) -> Option<Product> {
    result.unwrap_or_else(|e| {
        warn!(error = %e, product_id = %id, "Failed to fetch product details");
        None
    })
}
