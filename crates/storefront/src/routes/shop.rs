//! Shop route handlers: category hand-off, listing and product details.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use axum::response::Redirect;
use freshcart_core::{CategoryId, FilterSet, ProductId, SortKey};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::home::ProductView;
use crate::middleware::OptionalUser;
use crate::models::{CurrentUser, Toast};
use crate::services::{FilterStore, SessionFilterStore, take_toasts};
use crate::state::AppState;

/// A selectable sort option.
pub struct SortOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// One active filter attribute.
pub struct FilterView {
    pub key: String,
    pub values: String,
}

#[derive(Debug, Deserialize)]
pub struct ListingQuery {
    pub sort: Option<String>,
}

/// Listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "shop/listing.html")]
pub struct ListingTemplate {
    pub filters: Vec<FilterView>,
    pub sort_options: Vec<SortOption>,
    pub products: Vec<ProductView>,
    pub user: Option<CurrentUser>,
    pub toasts: Vec<Toast>,
}

/// Product details dialog fragment (HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_details.html")]
pub struct ProductDetailsTemplate {
    pub product: ProductView,
}

/// Store the selected category as the listing filter, then redirect.
#[instrument(skip(state, session, user))]
pub async fn select_category(
    State(state): State<AppState>,
    session: Session,
    user: OptionalUser,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let category: CategoryId = id
        .parse()
        .map_err(|e| AppError::BadRequest(format!("{e}")))?;

    let controller = state.home_controller(&session, user.user_id());
    let route = controller.select_category(category).await?;

    Ok(Redirect::to(route))
}

/// Product listing narrowed by the filter stored in the session.
#[instrument(skip(state, session, user))]
pub async fn listing(
    State(state): State<AppState>,
    session: Session,
    user: OptionalUser,
    Query(query): Query<ListingQuery>,
) -> Result<ListingTemplate> {
    let sort = match query.sort.as_deref() {
        Some(raw) => raw
            .parse::<SortKey>()
            .map_err(|e| AppError::BadRequest(format!("{e}")))?,
        None => SortKey::default(),
    };

    let filter = SessionFilterStore::new(session.clone())
        .load()
        .await?
        .unwrap_or_else(FilterSet::new);

    let products = state.shop().get_filtered_products(&filter, sort).await?;

    Ok(ListingTemplate {
        filters: filter
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(key, values)| FilterView {
                key: key.to_string(),
                values: values.join(", "),
            })
            .collect(),
        sort_options: SortKey::ALL
            .iter()
            .map(|key| SortOption {
                value: key.as_str(),
                label: key.label(),
                selected: *key == sort,
            })
            .collect(),
        products: products.iter().map(ProductView::from).collect(),
        user: user.0,
        toasts: take_toasts(&session).await,
    })
}

/// Product detail dialog contents.
#[instrument(skip(state, session, user))]
pub async fn product_details(
    State(state): State<AppState>,
    session: Session,
    user: OptionalUser,
    Path(id): Path<String>,
) -> Result<ProductDetailsTemplate> {
    let id = ProductId::new(id);
    let mut controller = state.home_controller(&session, user.user_id());

    if !controller.try_view_details(id.clone()).await? {
        return Err(AppError::NotFound(format!("product {id}")));
    }

    controller
        .view()
        .dialog
        .map(|product| ProductDetailsTemplate { product })
        .ok_or_else(|| AppError::Internal("detail dialog opened without a product".to_string()))
}
