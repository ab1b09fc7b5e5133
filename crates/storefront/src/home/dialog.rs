//! Product detail dialog state machine.
//!
//! ```text
//! Idle --request--> DetailsRequested(id) --resolve(id, Some)--> DetailsOpen(product)
//!                          |                                          |
//!                          +--resolve(id, None)--> Idle <----close----+
//! ```
//!
//! Opening is an explicit transition, so requesting the same product again
//! after closing re-opens the dialog.

use freshcart_core::ProductId;

use crate::shop::Product;

/// Visibility of the product detail dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DetailDialog {
    #[default]
    Idle,
    DetailsRequested(ProductId),
    DetailsOpen(Box<Product>),
}

impl DetailDialog {
    /// Record a pending detail request, replacing any open or pending one.
    pub fn request(&mut self, id: ProductId) {
        *self = Self::DetailsRequested(id);
    }

    /// Apply a detail response.
    ///
    /// Returns `true` only when this call opened the dialog. Responses for
    /// anything other than the pending request are ignored.
    pub fn resolve(&mut self, id: &ProductId, product: Option<Product>) -> bool {
        match &*self {
            Self::DetailsRequested(pending) if pending == id => {}
            _ => return false,
        }

        match product {
            Some(product) => {
                *self = Self::DetailsOpen(Box::new(product));
                true
            }
            None => {
                *self = Self::Idle;
                false
            }
        }
    }

    /// Close the dialog (or drop a pending request).
    pub fn close(&mut self) {
        *self = Self::Idle;
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::DetailsOpen(_))
    }

    /// The product shown while open.
    #[must_use]
    pub fn product(&self) -> Option<&Product> {
        match self {
            Self::DetailsOpen(product) => Some(product.as_ref()),
            _ => None,
        }
    }
}
