//! Cart route handlers.
//!
//! Add-to-cart is an HTMX action. A confirmed add answers with the queued
//! toast fragment and an `HX-Trigger` so the cart badge refreshes; anything
//! else answers `204 No Content` and the page stays as it is.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, IntoResponse, Response},
};
use freshcart_core::ProductId;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::add_breadcrumb;
use crate::home::AddToCartOutcome;
use crate::middleware::OptionalUser;
use crate::models::Toast;
use crate::services::take_toasts;
use crate::state::AppState;

/// HTMX event fired after the cart changed.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
}

/// Toast stack fragment (HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/toasts.html")]
pub struct ToastsTemplate {
    pub toasts: Vec<Toast>,
}

/// Add one unit of a product to the shopper's cart (HTMX).
#[instrument(skip(state, session, user))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    user: OptionalUser,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let product_id = ProductId::new(form.product_id);
    let controller = state.home_controller(&session, user.user_id());

    match controller.add_to_cart(product_id.clone()).await {
        AddToCartOutcome::Added => {
            add_breadcrumb("cart", "Added product to cart", &[(
                "product_id",
                product_id.as_str(),
            )]);
            (
                AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]),
                ToastsTemplate {
                    toasts: take_toasts(&session).await,
                },
            )
                .into_response()
        }
        AddToCartOutcome::Rejected | AddToCartOutcome::Failed => {
            StatusCode::NO_CONTENT.into_response()
        }
    }
}
