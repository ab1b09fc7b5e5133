//! The fixed set of shop-by-category entries shown on the homepage.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of a homepage category.
///
/// The serialized form is the exact value the catalog backend filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryId {
    Poultry,
    Meat,
    Fish,
    Egg,
    Vegetables,
}

impl CategoryId {
    /// The backend filter value for this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Poultry => "Poultry",
            Self::Meat => "Meat",
            Self::Fish => "Fish",
            Self::Egg => "Egg",
            Self::Vegetables => "Vegetables",
        }
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a category id that is not in [`CATEGORIES`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for CategoryId {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CATEGORIES
            .iter()
            .map(|category| category.id)
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// A category tile: id, display label and tile image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub label: &'static str,
    pub image_path: &'static str,
}

/// Categories in display order.
pub const CATEGORIES: [Category; 5] = [
    Category {
        id: CategoryId::Poultry,
        label: "Poultry",
        image_path: "/static/images/categories/poultry.svg",
    },
    Category {
        id: CategoryId::Meat,
        label: "Meat",
        image_path: "/static/images/categories/meat.svg",
    },
    Category {
        id: CategoryId::Fish,
        label: "Fish",
        image_path: "/static/images/categories/fish.svg",
    },
    Category {
        id: CategoryId::Egg,
        label: "Egg",
        image_path: "/static/images/categories/egg.svg",
    },
    Category {
        id: CategoryId::Vegetables,
        label: "Vegetables",
        image_path: "/static/images/categories/vegetables.svg",
    },
];
