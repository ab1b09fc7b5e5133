//! Homepage behavior.
//!
//! - [`Carousel`] - cyclic slide index
//! - [`DetailDialog`] - product detail dialog state machine
//! - [`HomeController`] - homepage state plus interactions against injected
//!   services
//! - [`HomeActor`] - message-driven controller owning the slide timer
//! - [`HomeView`] - render snapshot consumed by the templates

mod actor;
mod carousel;
mod controller;
mod dialog;
mod view;

pub use actor::{HomeActor, HomeError, HomeHandle, HomeMsg, SlideTimer};
pub use carousel::{Carousel, SLIDE_INTERVAL};
pub use controller::{
    ADDED_TO_CART_TITLE, AddToCartOutcome, HomeController, HomeServices, LISTING_ROUTE,
};
pub use dialog::DetailDialog;
pub use view::{CategoryView, HomeView, ProductView, SlideView};
