//! Cache types for catalog API responses.

use freshcart_core::{ProductId, SortKey};

use crate::shop::types::{FeatureImage, Product};

/// Cache key for catalog reads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    FeatureImages,
    Products {
        query: Vec<(String, String)>,
        sort: SortKey,
    },
    Product(ProductId),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    FeatureImages(Vec<FeatureImage>),
    Products(Vec<Product>),
    Product(Box<Product>),
}
