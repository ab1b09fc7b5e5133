//! Application state shared across handlers.

use std::sync::Arc;

use freshcart_core::UserId;
use tower_sessions::Session;

use crate::config::StorefrontConfig;
use crate::home::{HomeController, HomeServices};
use crate::media::{MediaClient, MediaError};
use crate::services::{SessionFilterStore, SessionToasts};
use crate::shop::{ShopApiClient, ShopApiError};

/// Error creating application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("shop API client: {0}")]
    Shop(#[from] ShopApiError),
    #[error("media client: {0}")]
    Media(#[from] MediaError),
}

/// Home controller wired to the backend client and the shopper's session.
pub type SessionHomeController =
    HomeController<ShopApiClient, ShopApiClient, SessionToasts, SessionFilterStore>;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    shop: ShopApiClient,
    media: MediaClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if either HTTP client cannot be built from the
    /// configuration.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let shop = ShopApiClient::new(&config.shop_api)?;
        let media = MediaClient::new(&config.media)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                shop,
                media,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Catalog and cart backend client.
    #[must_use]
    pub fn shop(&self) -> &ShopApiClient {
        &self.inner.shop
    }

    /// Media upload client.
    #[must_use]
    pub fn media(&self) -> &MediaClient {
        &self.inner.media
    }

    /// A home controller for one request.
    #[must_use]
    pub fn home_controller(
        &self,
        session: &Session,
        user_id: Option<UserId>,
    ) -> SessionHomeController {
        HomeController::new(
            HomeServices {
                catalog: self.inner.shop.clone(),
                cart: self.inner.shop.clone(),
                notifier: SessionToasts::new(session.clone()),
                filters: SessionFilterStore::new(session.clone()),
            },
            user_id,
        )
    }
}
