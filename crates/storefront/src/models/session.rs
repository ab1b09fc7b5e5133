//! Session-related types.
//!
//! Types stored in the session for the shopper's identity and the
//! cross-page hand-off channels.

use serde::{Deserialize, Serialize};

use freshcart_core::UserId;

/// Session-stored shopper identity.
///
/// Written by the authentication service on login; the storefront only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: UserId,
    pub user_name: String,
    pub email: String,
}

/// Session keys.
pub mod keys {
    /// Key for the current logged-in shopper.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the listing filter handed from the homepage to `/shop/listing`.
    pub const FILTERS: &str = "filters";

    /// Key for queued toast notifications.
    pub const TOASTS: &str = "toasts";
}
