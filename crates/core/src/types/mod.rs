//! Core types for FreshCart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod category;
pub mod filter;
pub mod id;
pub mod price;

pub use cart::CartItemRequest;
pub use category::{CATEGORIES, Category, CategoryId, UnknownCategory};
pub use filter::{FilterSet, SortKey, UnknownSortKey};
pub use id::*;
pub use price::Price;
