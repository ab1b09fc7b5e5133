//! REST client for the catalog and cart backend.
//!
//! Uses `reqwest` for HTTP. Caches promotional images, product listings and
//! product details using `moka`; cart calls always hit the backend.

mod cache;

use std::sync::Arc;

use freshcart_core::{CartItemRequest, FilterSet, ProductId, SortKey, UserId};
use moka::future::Cache;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::config::ShopApiConfig;
use crate::shop::ShopApiError;
use crate::shop::types::{AddToCartResponse, ApiEnvelope, Cart, FeatureImage, Product};

use cache::{CacheKey, CacheValue};

/// Maximum number of cached catalog responses.
const CACHE_CAPACITY: u64 = 1000;

/// Number of body characters kept in error logs.
const LOGGED_BODY_CHARS: usize = 500;

// =============================================================================
// ShopApiClient
// =============================================================================

/// Client for the catalog/cart REST backend.
///
/// Cheaply cloneable; clones share the HTTP connection pool and cache.
#[derive(Clone)]
pub struct ShopApiClient {
    inner: Arc<ShopApiClientInner>,
}

struct ShopApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl ShopApiClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build or the base URL
    /// cannot carry path segments.
    pub fn new(config: &ShopApiConfig) -> Result<Self, ShopApiError> {
        if config.base_url.cannot_be_a_base() {
            return Err(ShopApiError::InvalidUrl(config.base_url.to_string()));
        }

        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(config.cache_ttl)
            .build();

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ShopApiClientInner {
                client,
                base_url: config.base_url.clone(),
                cache,
            }),
        })
    }

    /// Build an endpoint URL from path segments below the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ShopApiError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ShopApiError::InvalidUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request and decode the backend's JSON envelope.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<ApiEnvelope<T>, ShopApiError> {
        let response = request.send().await?;
        let status = response.status();

        // Check for rate limiting
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ShopApiError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(&body)
                .ok()
                .and_then(|envelope| envelope.message)
                .unwrap_or_else(|| body.chars().take(200).collect());
            tracing::warn!(
                status = %status,
                body = %body.chars().take(LOGGED_BODY_CHARS).collect::<String>(),
                "Shop API returned non-success status"
            );
            return Err(ShopApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(LOGGED_BODY_CHARS).collect::<String>(),
                "Failed to parse Shop API response"
            );
            ShopApiError::Parse(e)
        })
    }

    /// Decode an envelope that must carry `data` on success.
    fn require_data<T>(envelope: ApiEnvelope<T>, what: &str) -> Result<T, ShopApiError> {
        if !envelope.success {
            return Err(ShopApiError::Rejected(
                envelope
                    .message
                    .unwrap_or_else(|| format!("{what} request was not successful")),
            ));
        }
        envelope
            .data
            .ok_or_else(|| ShopApiError::Rejected(format!("{what} response has no data")))
    }

    // =========================================================================
    // Catalog Methods
    // =========================================================================

    /// Get the promotional images for the homepage slider.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_feature_images(&self) -> Result<Vec<FeatureImage>, ShopApiError> {
        if let Some(CacheValue::FeatureImages(images)) =
            self.inner.cache.get(&CacheKey::FeatureImages).await
        {
            debug!("Cache hit for feature images");
            return Ok(images);
        }

        let url = self.endpoint(&["api", "common", "feature", "get"])?;
        let envelope = self.send(self.inner.client.get(url)).await?;
        let images: Vec<FeatureImage> = Self::require_data(envelope, "Feature image")?;

        self.inner
            .cache
            .insert(
                CacheKey::FeatureImages,
                CacheValue::FeatureImages(images.clone()),
            )
            .await;

        Ok(images)
    }

    /// Get products narrowed by `filter` and ordered by `sort`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(sort = %sort))]
    pub async fn get_filtered_products(
        &self,
        filter: &FilterSet,
        sort: SortKey,
    ) -> Result<Vec<Product>, ShopApiError> {
        let query = filter.to_query_pairs();
        let cache_key = CacheKey::Products {
            query: query.clone(),
            sort,
        };

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let mut url = self.endpoint(&["api", "shop", "products", "get"])?;
        url.query_pairs_mut()
            .extend_pairs(query.iter())
            .append_pair("sortBy", sort.as_str());

        let envelope = self.send(self.inner.client.get(url)).await?;
        let products: Vec<Product> = Self::require_data(envelope, "Product listing")?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get a single product by id.
    ///
    /// Returns `Ok(None)` when the backend does not know the product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product_details(
        &self,
        id: &ProductId,
    ) -> Result<Option<Product>, ShopApiError> {
        let cache_key = CacheKey::Product(id.clone());

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(Some(*product));
        }

        let url = self.endpoint(&["api", "shop", "products", "get", id.as_str()])?;
        let envelope: ApiEnvelope<Product> = match self.send(self.inner.client.get(url)).await {
            Ok(envelope) => envelope,
            Err(ShopApiError::Api { status: 404, .. }) => return Ok(None),
            Err(e) => return Err(e),
        };

        let Some(product) = envelope.data.filter(|_| envelope.success) else {
            return Ok(None);
        };

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(Some(product))
    }

    // =========================================================================
    // Cart Methods
    // =========================================================================

    /// Add an item to a shopper's cart.
    ///
    /// A `success: false` answer is returned as a response, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %request.product_id))]
    pub async fn add_to_cart(
        &self,
        request: &CartItemRequest,
    ) -> Result<AddToCartResponse, ShopApiError> {
        let url = self.endpoint(&["api", "shop", "cart", "add"])?;
        let envelope: ApiEnvelope<serde_json::Value> =
            match self.send(self.inner.client.post(url).json(request)).await {
                Ok(envelope) => envelope,
                // The backend answers validation failures with 4xx + success: false
                Err(ShopApiError::Api { status, message }) if (400..500).contains(&status) => {
                    return Ok(AddToCartResponse {
                        success: false,
                        message: Some(message),
                    });
                }
                Err(e) => return Err(e),
            };

        Ok(AddToCartResponse {
            success: envelope.success,
            message: envelope.message,
        })
    }

    /// Get a shopper's cart.
    ///
    /// Guests have no stored cart, so `None` yields an empty cart without a
    /// backend call.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_cart(&self, user_id: Option<&UserId>) -> Result<Cart, ShopApiError> {
        let Some(user_id) = user_id else {
            return Ok(Cart::default());
        };

        let url = self.endpoint(&["api", "shop", "cart", "get", user_id.as_str()])?;
        let envelope: ApiEnvelope<Cart> = self.send(self.inner.client.get(url)).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Check that the backend answers at all.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or answers with a
    /// server error.
    pub async fn ping(&self) -> Result<(), ShopApiError> {
        let url = self.endpoint(&["api", "common", "feature", "get"])?;
        let response = self.inner.client.get(url).send().await?;
        if response.status().is_server_error() {
            return Err(ShopApiError::Api {
                status: response.status().as_u16(),
                message: "backend unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use freshcart_core::CategoryId;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> ShopApiClient {
        ShopApiClient::new(&ShopApiConfig {
            base_url: Url::parse(&server.uri()).unwrap(),
            cache_ttl: Duration::from_secs(60),
            request_timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    fn product_json(id: &str, price: u32) -> serde_json::Value {
        serde_json::json!({ "_id": id, "title": format!("Product {id}"), "price": price })
    }

    #[tokio::test]
    async fn test_feature_images_are_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/common/feature/get"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "data": [{ "_id": "f1", "image": "https://cdn.example.com/a.jpg" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let first = client.get_feature_images().await.unwrap();
        let second = client.get_feature_images().await.unwrap();

        assert_eq!(first.len(), 1);
        assert_eq!(first, second);
        assert_eq!(first[0].image, "https://cdn.example.com/a.jpg");
    }

    #[tokio::test]
    async fn test_filtered_products_send_filter_and_sort() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/shop/products/get"))
            .and(query_param("category", "Fish"))
            .and(query_param("sortBy", "price-lowtohigh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "data": [product_json("p1", 3), product_json("p2", 7)]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let products = client
            .get_filtered_products(
                &FilterSet::for_category(CategoryId::Fish),
                SortKey::PriceLowToHigh,
            )
            .await
            .unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, ProductId::new("p1"));
    }

    #[tokio::test]
    async fn test_product_details_not_found_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/shop/products/get/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "success": false,
                "message": "Product not found!"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let product = client
            .get_product_details(&ProductId::new("missing"))
            .await
            .unwrap();
        assert!(product.is_none());
    }

    #[tokio::test]
    async fn test_server_error_maps_to_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/shop/products/get/p1"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "success": false,
                "message": "Some error occured"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .get_product_details(&ProductId::new("p1"))
            .await
            .unwrap_err();
        match err {
            ShopApiError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Some error occured");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_rate_limit_reads_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/common/feature/get"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.get_feature_images().await.unwrap_err();
        assert!(matches!(err, ShopApiError::RateLimited(7)));
    }

    #[tokio::test]
    async fn test_add_to_cart_posts_request_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/shop/cart/add"))
            .and(body_json(serde_json::json!({
                "userId": "u1",
                "productId": "p1",
                "quantity": 1
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "success": true, "data": {} })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client
            .add_to_cart(&CartItemRequest::single(
                Some(UserId::new("u1")),
                ProductId::new("p1"),
            ))
            .await
            .unwrap();
        assert!(response.success);
    }

    #[tokio::test]
    async fn test_add_to_cart_client_error_is_unsuccessful_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/shop/cart/add"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "success": false,
                "message": "Invalid data provided!"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client
            .add_to_cart(&CartItemRequest::single(None, ProductId::new("p1")))
            .await
            .unwrap();
        assert!(!response.success);
        assert_eq!(response.message.as_deref(), Some("Invalid data provided!"));
    }

    #[tokio::test]
    async fn test_guest_cart_skips_backend() {
        let server = MockServer::start().await;
        let client = client_for(&server);
        let cart = client.get_cart(None).await.unwrap();
        assert_eq!(cart, Cart::default());
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
