//! Domain models for storefront.

pub mod session;
pub mod toast;

pub use session::{CurrentUser, keys as session_keys};
pub use toast::Toast;
