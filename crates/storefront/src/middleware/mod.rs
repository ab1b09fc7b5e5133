//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (hub per request, HTTP context)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions, `PostgreSQL` or in-memory store)

pub mod auth;
pub mod request_id;
pub mod session;

pub use auth::{OptionalUser, set_current_user};
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
pub use session::{
    SESSION_COOKIE_NAME, connect_session_store, create_session_layer, session_layer,
};
