//! FreshCart Core - Shared types library.
//!
//! This crate provides common types used across FreshCart components:
//! - `storefront` - Public-facing grocery storefront and media upload helper
//! - `integration-tests` - End-to-end tests against a fake catalog backend
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no session
//! access. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, prices, categories, listing filters and cart requests

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
