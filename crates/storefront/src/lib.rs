//! FreshCart storefront library.
//!
//! The grocery storefront (homepage, category hand-off, listing, product
//! details, add-to-cart) and the admin media upload endpoint, exposed as a
//! library so the binary and the integration tests share one router.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod filters;
pub mod home;
pub mod media;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod shop;
pub mod state;

pub use routes::app;
pub use state::AppState;
