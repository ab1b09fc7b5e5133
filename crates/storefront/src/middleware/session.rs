//! Session middleware configuration.
//!
//! Sessions carry the signed-in shopper, the category filter hand-off and
//! the toast queue. In production they live in `PostgreSQL`, shared with the
//! authentication service that writes `current_user` on login. Without a
//! database the store is process-local.

use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::PgPoolOptions;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "freshcart_session";

const MAX_DB_CONNECTIONS: u32 = 5;

/// Connect to `PostgreSQL` and prepare the shared session table.
///
/// # Errors
///
/// Returns an error if the database is unreachable or the session schema
/// cannot be created.
pub async fn connect_session_store(
    database_url: &SecretString,
) -> Result<PostgresStore, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_DB_CONNECTIONS)
        .connect(database_url.expose_secret())
        .await?;

    let store = PostgresStore::new(pool);
    store.migrate().await?;
    Ok(store)
}

/// Create the session layer over `store`.
#[must_use]
pub fn create_session_layer<S>(store: S, config: &StorefrontConfig) -> SessionManagerLayer<S>
where
    S: SessionStore + Clone,
{
    session_layer(store, config.base_url.starts_with("https://"))
}

/// Session layer with an explicit `Secure` cookie flag.
#[must_use]
pub fn session_layer<S>(store: S, secure: bool) -> SessionManagerLayer<S>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnSessionEnd)
        .with_secure(secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
