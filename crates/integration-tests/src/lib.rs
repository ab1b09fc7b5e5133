//! Integration tests for FreshCart.
//!
//! Each test gets a [`TestContext`]: the full storefront router bound to an
//! ephemeral port, talking to an in-process fake catalog/cart backend and a
//! fake media service (both plain axum apps). Requests go through `reqwest`
//! with a cookie store, so session hand-offs behave like a browser.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p freshcart-integration-tests
//! ```

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    routing::{get, post},
};
use freshcart_core::UserId;
use freshcart_storefront::config::{MediaConfig, ShopApiConfig, StorefrontConfig};
use freshcart_storefront::middleware::{SESSION_COOKIE_NAME, set_current_user};
use freshcart_storefront::models::CurrentUser;
use freshcart_storefront::{AppState, app};
use reqwest::cookie::Jar;
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::{MemoryStore, Session};
use url::Url;

/// Media cloud name used by the fake media service.
pub const CLOUD_NAME: &str = "freshcart-test";

/// Product the fake backend refuses to add to a cart.
pub const UNAVAILABLE_PRODUCT: &str = "sold-out";

// =============================================================================
// Fake catalog/cart backend
// =============================================================================

/// A product served by the fake backend.
#[derive(Debug, Clone)]
pub struct FakeProduct {
    pub id: &'static str,
    pub title: &'static str,
    pub category: &'static str,
    pub price: u32,
    pub sale_price: u32,
}

impl FakeProduct {
    fn to_json(&self) -> Value {
        json!({
            "_id": self.id,
            "image": format!("https://cdn.example.com/{}.jpg", self.id),
            "title": self.title,
            "description": format!("{} from the market", self.title),
            "category": self.category,
            "brand": "FreshFarm",
            "price": self.price,
            "salePrice": self.sale_price,
            "totalStock": 10,
        })
    }
}

/// Catalog served by default.
#[must_use]
pub fn default_catalog() -> Vec<FakeProduct> {
    vec![
        FakeProduct { id: "salmon", title: "Atlantic Salmon", category: "Fish", price: 18, sale_price: 15 },
        FakeProduct { id: "cod", title: "Cod Fillet", category: "Fish", price: 12, sale_price: 0 },
        FakeProduct { id: "chicken", title: "Whole Chicken", category: "Poultry", price: 9, sale_price: 0 },
        FakeProduct { id: "eggs", title: "Free Range Eggs", category: "Egg", price: 4, sale_price: 0 },
        FakeProduct { id: UNAVAILABLE_PRODUCT, title: "Wagyu Steak", category: "Meat", price: 80, sale_price: 0 },
    ]
}

/// Everything the fake backend has been asked.
#[derive(Debug, Default)]
pub struct BackendLog {
    /// `category` and `sortBy` query values of product listing requests.
    pub product_queries: Vec<(Option<String>, Option<String>)>,
    /// Bodies of add-to-cart requests.
    pub cart_adds: Vec<Value>,
    /// User IDs whose cart was fetched.
    pub cart_fetches: Vec<String>,
    /// Text fields of upload requests.
    pub uploads: Vec<Vec<(String, String)>>,
}

#[derive(Clone)]
struct FakeState {
    images: Vec<&'static str>,
    products: Vec<FakeProduct>,
    log: Arc<Mutex<BackendLog>>,
}

impl FakeState {
    fn record(&self, f: impl FnOnce(&mut BackendLog)) {
        f(&mut self.log.lock().unwrap_or_else(PoisonError::into_inner));
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductsQuery {
    category: Option<String>,
    sort_by: Option<String>,
}

async fn feature_images(State(state): State<FakeState>) -> Json<Value> {
    let data: Vec<Value> = state
        .images
        .iter()
        .enumerate()
        .map(|(i, url)| json!({ "_id": format!("f{i}"), "image": url }))
        .collect();
    Json(json!({ "success": true, "data": data }))
}

async fn products(
    State(state): State<FakeState>,
    Query(query): Query<ProductsQuery>,
) -> Json<Value> {
    state.record(|log| {
        log.product_queries
            .push((query.category.clone(), query.sort_by.clone()));
    });

    let categories: Vec<&str> = query
        .category
        .as_deref()
        .map(|c| c.split(',').collect())
        .unwrap_or_default();
    let mut matching: Vec<&FakeProduct> = state
        .products
        .iter()
        .filter(|p| categories.is_empty() || categories.contains(&p.category))
        .collect();

    match query.sort_by.as_deref() {
        Some("price-hightolow") => matching.sort_by(|a, b| b.price.cmp(&a.price)),
        Some("title-atoz") => matching.sort_by(|a, b| a.title.cmp(b.title)),
        Some("title-ztoa") => matching.sort_by(|a, b| b.title.cmp(a.title)),
        _ => matching.sort_by(|a, b| a.price.cmp(&b.price)),
    }

    let data: Vec<Value> = matching.iter().map(|p| p.to_json()).collect();
    Json(json!({ "success": true, "data": data }))
}

async fn product(State(state): State<FakeState>, Path(id): Path<String>) -> Json<Value> {
    let data = state
        .products
        .iter()
        .find(|p| p.id == id)
        .map_or(Value::Null, FakeProduct::to_json);
    Json(json!({ "success": !data.is_null(), "data": data }))
}

async fn cart_add(State(state): State<FakeState>, Json(body): Json<Value>) -> Json<Value> {
    let accepted = body["productId"] != UNAVAILABLE_PRODUCT;
    state.record(|log| log.cart_adds.push(body));
    if accepted {
        Json(json!({ "success": true, "data": { "items": [] } }))
    } else {
        Json(json!({ "success": false, "message": "Not enough stock" }))
    }
}

async fn cart_get(State(state): State<FakeState>, Path(user_id): Path<String>) -> Json<Value> {
    state.record(|log| log.cart_fetches.push(user_id));
    Json(json!({ "success": true, "data": { "items": [] } }))
}

async fn media_upload(
    State(state): State<FakeState>,
    Path(cloud): Path<String>,
    mut multipart: Multipart,
) -> (axum::http::StatusCode, Json<Value>) {
    let mut fields = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let value = field.text().await.unwrap_or_default();
        fields.push((name, value));
    }
    let has = |key: &str| fields.iter().any(|(name, value)| name == key && !value.is_empty());
    let signed = ["file", "api_key", "timestamp", "signature"]
        .into_iter()
        .all(|key| has(key));
    state.record(|log| log.uploads.push(fields.clone()));

    if !signed || cloud != CLOUD_NAME {
        return (
            axum::http::StatusCode::UNAUTHORIZED,
            Json(json!({ "error": { "message": "Invalid Signature" } })),
        );
    }

    (
        axum::http::StatusCode::OK,
        Json(json!({
            "public_id": "products/upload-1",
            "resource_type": "image",
            "secure_url": "https://res.example.com/products/upload-1.png",
            "url": "http://res.example.com/products/upload-1.png",
        })),
    )
}

fn fake_services(state: FakeState) -> Router {
    Router::new()
        .route("/api/common/feature/get", get(feature_images))
        .route("/api/shop/products/get", get(products))
        .route("/api/shop/products/get/{id}", get(product))
        .route("/api/shop/cart/add", post(cart_add))
        .route("/api/shop/cart/get/{user_id}", get(cart_get))
        .route("/v1_1/{cloud}/auto/upload", post(media_upload))
        .with_state(state)
}

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind ephemeral port");
    let addr = listener.local_addr().expect("Listener has no address");
    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server failed");
    });
    addr
}

// =============================================================================
// Test context
// =============================================================================

/// A running storefront wired to the fake services.
pub struct TestContext {
    pub client: reqwest::Client,
    pub storefront_url: String,
    log: Arc<Mutex<BackendLog>>,
    sessions: MemoryStore,
    cookies: Arc<Jar>,
}

impl TestContext {
    /// Start with the default catalog and three promotional images.
    pub async fn new() -> Self {
        Self::with_catalog(
            vec![
                "https://cdn.example.com/banner-1.jpg",
                "https://cdn.example.com/banner-2.jpg",
                "https://cdn.example.com/banner-3.jpg",
            ],
            default_catalog(),
        )
        .await
    }

    /// Start with a custom image set and catalog.
    pub async fn with_catalog(images: Vec<&'static str>, products: Vec<FakeProduct>) -> Self {
        let log = Arc::new(Mutex::new(BackendLog::default()));
        let fake = serve(fake_services(FakeState {
            images,
            products,
            log: Arc::clone(&log),
        }))
        .await;
        let fake_url = Url::parse(&format!("http://{fake}")).expect("Valid fake URL");

        let config = StorefrontConfig {
            host: "127.0.0.1".parse().expect("Valid host"),
            port: 0,
            base_url: "http://localhost".to_string(),
            shop_api: ShopApiConfig {
                base_url: fake_url.clone(),
                cache_ttl: Duration::from_secs(60),
                request_timeout: Duration::from_secs(5),
            },
            media: MediaConfig {
                api_url: fake_url,
                cloud_name: CLOUD_NAME.to_string(),
                api_key: "integration-key".to_string(),
                api_secret: SecretString::from("Zq8!vN3#pL6@tR1$"),
                max_upload_bytes: 256 * 1024,
            },
            database_url: None,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };

        let state = AppState::new(config).expect("Failed to build storefront state");
        let sessions = MemoryStore::default();
        let storefront = serve(app(state, sessions.clone())).await;

        let cookies = Arc::new(Jar::default());
        let client = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&cookies))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            storefront_url: format!("http://{storefront}"),
            log,
            sessions,
            cookies,
        }
    }

    /// Sign the client in as `user_id`, the way the authentication service
    /// does: write the shopper into the shared session store and hand the
    /// browser the session cookie.
    pub async fn sign_in(&self, user_id: &str) {
        let session = Session::new(None, Arc::new(self.sessions.clone()), None);
        set_current_user(
            &session,
            &CurrentUser {
                id: UserId::new(user_id),
                user_name: format!("{user_id}-name"),
                email: format!("{user_id}@example.com"),
            },
        )
        .await
        .expect("Failed to write current user");
        session.save().await.expect("Failed to save session");

        let id = session.id().expect("Saved session has an id");
        let url = Url::parse(&self.storefront_url).expect("Valid storefront URL");
        self.cookies
            .add_cookie_str(&format!("{SESSION_COOKIE_NAME}={id}; Path=/"), &url);
    }

    /// Absolute storefront URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.storefront_url)
    }

    /// Inspect what the fake services received.
    pub fn backend<T>(&self, f: impl FnOnce(&BackendLog) -> T) -> T {
        f(&self.log.lock().unwrap_or_else(PoisonError::into_inner))
    }
}
