//! Product listing filters and sort keys.
//!
//! A [`FilterSet`] maps an attribute name (e.g. `category`) to the values a
//! listing is narrowed to. It serializes as a plain JSON object, which is the
//! exact shape handed from the homepage to the listing page through the
//! session:
//!
//! ```json
//! {"category": ["Fish"]}
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::category::CategoryId;

/// Attribute key used for category filters.
pub const CATEGORY_KEY: &str = "category";

/// Attribute-to-values mapping used to narrow a product listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet(BTreeMap<String, Vec<String>>);

impl FilterSet {
    /// An empty filter set (no narrowing).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A filter set holding a single attribute.
    #[must_use]
    pub fn single(key: impl Into<String>, values: Vec<String>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(key.into(), values);
        Self(map)
    }

    /// The filter written when a homepage category tile is selected.
    #[must_use]
    pub fn for_category(id: CategoryId) -> Self {
        Self::single(CATEGORY_KEY, vec![id.as_str().to_string()])
    }

    /// Whether no attribute narrows the listing.
    ///
    /// Attributes with an empty value list do not narrow anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }

    /// Values selected for an attribute, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }

    /// Iterate attributes in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Query pairs for the catalog backend.
    ///
    /// Multiple values for one attribute are joined with commas; attributes
    /// without values are omitted.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(key, values)| (key.clone(), values.join(",")))
            .collect()
    }
}

/// Error returned when parsing an unsupported sort key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown sort key: {0}")]
pub struct UnknownSortKey(pub String);

/// Listing sort order, serialized with the backend's `sortBy` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    #[serde(rename = "price-lowtohigh")]
    PriceLowToHigh,
    #[serde(rename = "price-hightolow")]
    PriceHighToLow,
    #[serde(rename = "title-atoz")]
    TitleAToZ,
    #[serde(rename = "title-ztoa")]
    TitleZToA,
}

impl SortKey {
    /// All sort keys in menu order.
    pub const ALL: [Self; 4] = [
        Self::PriceLowToHigh,
        Self::PriceHighToLow,
        Self::TitleAToZ,
        Self::TitleZToA,
    ];

    /// The backend `sortBy` value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PriceLowToHigh => "price-lowtohigh",
            Self::PriceHighToLow => "price-hightolow",
            Self::TitleAToZ => "title-atoz",
            Self::TitleZToA => "title-ztoa",
        }
    }

    /// Human-readable label for sort menus.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PriceLowToHigh => "Price: Low to High",
            Self::PriceHighToLow => "Price: High to Low",
            Self::TitleAToZ => "Title: A to Z",
            Self::TitleZToA => "Title: Z to A",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownSortKey(s.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_category_filter_json_shape() {
        let filter = FilterSet::for_category(CategoryId::Fish);
        let json = serde_json::to_value(&filter).unwrap();
        assert_eq!(json, serde_json::json!({ "category": ["Fish"] }));
    }

    #[test]
    fn test_empty_filter_has_no_query_pairs() {
        assert!(FilterSet::new().is_empty());
        assert!(FilterSet::new().to_query_pairs().is_empty());
        assert!(FilterSet::single("brand", vec![]).is_empty());
    }

    #[test]
    fn test_query_pairs_join_values() {
        let filter = FilterSet::single("category", vec!["Fish".into(), "Meat".into()]);
        assert_eq!(
            filter.to_query_pairs(),
            vec![("category".to_string(), "Fish,Meat".to_string())]
        );
    }

    #[test]
    fn test_sort_key_round_trips_through_str() {
        for key in SortKey::ALL {
            assert_eq!(key.as_str().parse::<SortKey>().unwrap(), key);
        }
        assert!("newest".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_default_sort_is_price_ascending() {
        assert_eq!(SortKey::default(), SortKey::PriceLowToHigh);
        assert_eq!(
            serde_json::to_string(&SortKey::default()).unwrap(),
            "\"price-lowtohigh\""
        );
    }
}
