//! Cart request types.

use serde::{Deserialize, Serialize};

use super::id::{ProductId, UserId};

/// A single add-to-cart request.
///
/// Built per action and never retained. Serializes with the backend's
/// camelCase field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRequest {
    /// The shopper, absent for guests.
    pub user_id: Option<UserId>,
    pub product_id: ProductId,
    pub quantity: u32,
}

impl CartItemRequest {
    /// A request for a single unit of a product.
    #[must_use]
    pub fn single(user_id: Option<UserId>, product_id: ProductId) -> Self {
        Self {
            user_id,
            product_id,
            quantity: 1,
        }
    }
}
