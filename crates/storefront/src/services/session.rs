//! Session-backed notifier and filter store.

use freshcart_core::FilterSet;
use tower_sessions::Session;

use super::{FilterStore, FilterStoreError, Notifier};
use crate::models::{Toast, session_keys};

/// Listing filter hand-off stored in the shopper's session.
#[derive(Clone)]
pub struct SessionFilterStore {
    session: Session,
}

impl SessionFilterStore {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

impl FilterStore for SessionFilterStore {
    async fn clear(&self) -> Result<(), FilterStoreError> {
        self.session.remove_value(session_keys::FILTERS).await?;
        Ok(())
    }

    async fn store(&self, filter: &FilterSet) -> Result<(), FilterStoreError> {
        self.session.insert(session_keys::FILTERS, filter).await?;
        Ok(())
    }

    async fn load(&self) -> Result<Option<FilterSet>, FilterStoreError> {
        Ok(self.session.get(session_keys::FILTERS).await?)
    }
}

/// Toast queue stored in the shopper's session.
///
/// Queued toasts are drained into the next rendered response with
/// [`take_toasts`].
#[derive(Clone)]
pub struct SessionToasts {
    session: Session,
}

impl SessionToasts {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

impl Notifier for SessionToasts {
    async fn notify(&self, toast: Toast) {
        let mut queued: Vec<Toast> = self
            .session
            .get(session_keys::TOASTS)
            .await
            .ok()
            .flatten()
            .unwrap_or_default();
        queued.push(toast);

        if let Err(e) = self.session.insert(session_keys::TOASTS, queued).await {
            tracing::warn!(error = %e, "Failed to queue toast");
        }
    }
}

/// Remove and return all queued toasts.
pub async fn take_toasts(session: &Session) -> Vec<Toast> {
    session
        .remove::<Vec<Toast>>(session_keys::TOASTS)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use freshcart_core::CategoryId;
    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_filter_store_overwrites_previous_filter() {
        let session = session();
        let store = SessionFilterStore::new(session.clone());

        store
            .store(&FilterSet::for_category(CategoryId::Meat))
            .await
            .unwrap();
        store.clear().await.unwrap();
        store
            .store(&FilterSet::for_category(CategoryId::Fish))
            .await
            .unwrap();

        let raw: serde_json::Value = session.get(session_keys::FILTERS).await.unwrap().unwrap();
        assert_eq!(raw, serde_json::json!({ "category": ["Fish"] }));
        assert_eq!(
            store.load().await.unwrap(),
            Some(FilterSet::for_category(CategoryId::Fish))
        );
    }

    #[tokio::test]
    async fn test_clear_removes_filter() {
        let store = SessionFilterStore::new(session());
        store
            .store(&FilterSet::for_category(CategoryId::Egg))
            .await
            .unwrap();
        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_toasts_are_drained_once() {
        let session = session();
        let toasts = SessionToasts::new(session.clone());

        toasts.notify(Toast::titled("first")).await;
        toasts.notify(Toast::titled("second")).await;

        let drained = take_toasts(&session).await;
        assert_eq!(drained, vec![Toast::titled("first"), Toast::titled("second")]);
        assert!(take_toasts(&session).await.is_empty());
    }
}
