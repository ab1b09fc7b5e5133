//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                 - Home page
//! GET  /health                           - Liveness
//! GET  /health/ready                     - Readiness (backend reachable)
//!
//! # Shop
//! GET  /shop/category/{id}               - Store category filter, 303 to listing
//! GET  /shop/listing?sort=               - Listing narrowed by stored filter
//! GET  /shop/products/{id}/details       - Product detail dialog (HTMX)
//! POST /shop/cart/add                    - Add to cart (HTMX, toast fragment)
//!
//! # Admin API
//! POST /api/admin/products/upload-image  - Media upload (multipart `my_file`)
//! ```

pub mod cart;
pub mod health;
pub mod home;
pub mod shop;
pub mod upload;

use axum::{
    Router,
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    middleware,
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::SessionStore;

use crate::middleware::{create_session_layer, request_id_middleware};
use crate::state::AppState;

const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Create the shop routes router.
pub fn shop_routes() -> Router<AppState> {
    Router::new()
        .route("/category/{id}", get(shop::select_category))
        .route("/listing", get(shop::listing))
        .route("/products/{id}/details", get(shop::product_details))
        .route("/cart/add", post(cart::add))
}

/// Create the admin API routes router.
pub fn admin_api_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new().route(
        "/products/upload-image",
        post(upload::upload_image).layer(DefaultBodyLimit::max(max_upload_bytes)),
    )
}

/// Create all page and API routes for the storefront.
pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/shop", shop_routes())
        .nest("/api/admin", admin_api_routes(max_upload_bytes))
}

/// Build the complete application with middleware and state.
///
/// `sessions` backs the session layer; the authentication service writes
/// the signed-in shopper into the same store.
pub fn app<S>(state: AppState, sessions: S) -> Router
where
    S: SessionStore + Clone,
{
    let session_layer = create_session_layer(sessions, state.config());
    let max_upload_bytes = state.config().media.max_upload_bytes;

    Router::new()
        .merge(routes(max_upload_bytes))
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(session_layer)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
