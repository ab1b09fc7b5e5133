//! Domain types returned by the catalog backend.
//!
//! Field names follow the backend's JSON (camelCase, `_id` keys).

use freshcart_core::{FeatureImageId, Price, ProductId};
use serde::{Deserialize, Serialize};

/// A promotional image shown in the homepage slider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureImage {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<FeatureImageId>,
    /// Publicly resolvable image URL.
    pub image: String,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    #[serde(default)]
    pub image: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub brand: String,
    pub price: Price,
    /// Zero when the product is not on sale.
    #[serde(default)]
    pub sale_price: Price,
    #[serde(default)]
    pub total_stock: i64,
}

impl Product {
    /// Whether a sale price applies.
    #[must_use]
    pub fn on_sale(&self) -> bool {
        self.sale_price.is_positive()
    }

    /// The price the shopper pays.
    #[must_use]
    pub fn effective_price(&self) -> Price {
        if self.on_sale() {
            self.sale_price
        } else {
            self.price
        }
    }

    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.total_stock > 0
    }
}

/// A line in a shopper's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub sale_price: Price,
    pub quantity: u32,
}

/// A shopper's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

/// Result of an add-to-cart call.
///
/// Only `success: true` counts as confirmed; an absent flag is a failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddToCartResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response envelope used by every backend endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserializes_backend_shape() {
        let json = serde_json::json!({
            "_id": "65f0",
            "image": "https://cdn.example.com/salmon.jpg",
            "title": "Salmon Fillet",
            "description": "Fresh Atlantic salmon",
            "category": "Fish",
            "brand": "Nordic",
            "price": 24,
            "salePrice": 19.5,
            "totalStock": 12
        });
        let product: Product = serde_json::from_value(json).unwrap();
        assert_eq!(product.id, ProductId::new("65f0"));
        assert!(product.on_sale());
        assert_eq!(product.effective_price(), Price::from_cents(1950));
        assert!(product.in_stock());
    }

    #[test]
    fn test_product_without_sale_price() {
        let json = serde_json::json!({ "_id": "1", "title": "Eggs", "price": 4 });
        let product: Product = serde_json::from_value(json).unwrap();
        assert!(!product.on_sale());
        assert_eq!(product.effective_price(), Price::from_cents(400));
        assert!(!product.in_stock());
    }

    #[test]
    fn test_envelope_without_data_decodes_for_any_payload() {
        let envelope: ApiEnvelope<Product> =
            serde_json::from_str(r#"{"success":false,"message":"Product not found"}"#).unwrap();
        assert!(!envelope.success);
        assert!(envelope.data.is_none());
        assert_eq!(envelope.message.as_deref(), Some("Product not found"));
    }

    #[test]
    fn test_add_to_cart_missing_flag_is_failure() {
        let response: AddToCartResponse = serde_json::from_str("{}").unwrap();
        assert!(!response.success);
    }

    #[test]
    fn test_cart_item_count() {
        let json = serde_json::json!({ "items": [
            { "productId": "a", "quantity": 2 },
            { "productId": "b", "quantity": 3 }
        ]});
        let cart: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(cart.item_count(), 5);
    }
}
