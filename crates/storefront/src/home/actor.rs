//! Long-lived homepage actor.
//!
//! Wraps a [`HomeController`] in a task that processes [`HomeMsg`]s one at a
//! time. Catalog fetches run as independent tasks that post their results
//! back, so the two mount-time fetches complete in any order. The actor owns
//! the slide timer: at most one timer exists, it is replaced whenever the
//! image collection changes, and it is torn down on unmount or when every
//! handle is dropped.

use std::time::Duration;

use freshcart_core::{CategoryId, FilterSet, ProductId, SortKey};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, warn};

use super::carousel::SLIDE_INTERVAL;
use super::controller::{AddToCartOutcome, HomeController};
use super::view::HomeView;
use crate::services::{CartService, CatalogService, FilterStore, FilterStoreError, Notifier};
use crate::shop::{FeatureImage, Product, ShopApiError};

const MAILBOX_CAPACITY: usize = 32;

/// Errors returned through a [`HomeHandle`].
#[derive(Debug, Error)]
pub enum HomeError {
    #[error("Home actor has stopped")]
    Closed,

    #[error(transparent)]
    Filters(#[from] FilterStoreError),
}

/// Messages processed by the home actor.
#[derive(Debug)]
pub enum HomeMsg {
    Mount,
    FeatureImagesLoaded(Vec<FeatureImage>),
    ProductsLoaded(Vec<Product>),
    RefreshFeatureImages,
    Tick,
    PreviousSlide,
    NextSlide,
    SelectCategory {
        id: CategoryId,
        reply: oneshot::Sender<Result<&'static str, FilterStoreError>>,
    },
    ViewDetails(ProductId),
    DetailsLoaded {
        id: ProductId,
        result: Result<Option<Product>, ShopApiError>,
    },
    CloseDetails,
    AddToCart {
        product_id: ProductId,
        reply: oneshot::Sender<AddToCartOutcome>,
    },
    Snapshot(oneshot::Sender<HomeView>),
    Unmount,
}

// =============================================================================
// Slide timer
// =============================================================================

/// Recurring task posting [`HomeMsg::Tick`] every slide interval.
///
/// Aborted on drop. Holds only a weak sender, so it never keeps the actor
/// alive on its own.
#[derive(Debug)]
pub struct SlideTimer {
    handle: JoinHandle<()>,
}

impl SlideTimer {
    #[must_use]
    pub fn start(mailbox: mpsc::WeakSender<HomeMsg>) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + SLIDE_INTERVAL, SLIDE_INTERVAL);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                let Some(sender) = mailbox.upgrade() else {
                    break;
                };
                if sender.send(HomeMsg::Tick).await.is_err() {
                    break;
                }
            }
        });

        Self { handle }
    }

    #[must_use]
    pub const fn interval() -> Duration {
        SLIDE_INTERVAL
    }
}

impl Drop for SlideTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// =============================================================================
// Actor
// =============================================================================

/// Client side of a running home actor.
#[derive(Debug, Clone)]
pub struct HomeHandle {
    sender: mpsc::Sender<HomeMsg>,
}

pub struct HomeActor<C, K, N, F> {
    controller: HomeController<C, K, N, F>,
    mailbox: mpsc::WeakSender<HomeMsg>,
    timer: Option<SlideTimer>,
    mounted: bool,
}

impl<C, K, N, F> HomeActor<C, K, N, F>
where
    C: CatalogService + Clone + 'static,
    K: CartService + 'static,
    N: Notifier + 'static,
    F: FilterStore + 'static,
{
    /// Spawn the actor and return a handle to it.
    ///
    /// The actor stops once every handle has been dropped.
    pub fn spawn(controller: HomeController<C, K, N, F>) -> HomeHandle {
        let (sender, receiver) = mpsc::channel(MAILBOX_CAPACITY);
        let actor = Self {
            controller,
            mailbox: sender.downgrade(),
            timer: None,
            mounted: false,
        };
        tokio::spawn(actor.run(receiver));
        HomeHandle { sender }
    }

    async fn run(mut self, mut receiver: mpsc::Receiver<HomeMsg>) {
        while let Some(msg) = receiver.recv().await {
            self.handle(msg).await;
        }
        debug!("Home actor stopped");
    }

    async fn handle(&mut self, msg: HomeMsg) {
        match msg {
            HomeMsg::Mount => self.mount(),
            HomeMsg::RefreshFeatureImages => {
                if self.mounted {
                    self.fetch_feature_images();
                }
            }
            HomeMsg::FeatureImagesLoaded(images) => {
                if self.mounted {
                    self.controller.apply_feature_images(images);
                    self.restart_timer();
                }
            }
            HomeMsg::ProductsLoaded(products) => {
                if self.mounted {
                    self.controller.apply_products(products);
                }
            }
            HomeMsg::Tick => {
                // A tick queued before the timer was dropped.
                if self.mounted {
                    self.controller.next_slide();
                }
            }
            HomeMsg::NextSlide => self.controller.next_slide(),
            HomeMsg::PreviousSlide => self.controller.previous_slide(),
            HomeMsg::SelectCategory { id, reply } => {
                let _ = reply.send(self.controller.select_category(id).await);
            }
            HomeMsg::ViewDetails(id) => {
                self.controller.request_details(id.clone());
                let catalog = self.controller.catalog().clone();
                self.post(async move {
                    let result = catalog.product_details(&id).await;
                    HomeMsg::DetailsLoaded { id, result }
                });
            }
            HomeMsg::DetailsLoaded { id, result } => {
                self.controller.resolve_details(&id, result);
            }
            HomeMsg::CloseDetails => self.controller.close_details(),
            HomeMsg::AddToCart { product_id, reply } => {
                let _ = reply.send(self.controller.add_to_cart(product_id).await);
            }
            HomeMsg::Snapshot(reply) => {
                let _ = reply.send(self.controller.view());
            }
            HomeMsg::Unmount => {
                self.mounted = false;
                self.timer = None;
                debug!("Home view unmounted");
            }
        }
    }

    fn mount(&mut self) {
        self.mounted = true;
        self.fetch_feature_images();

        let catalog = self.controller.catalog().clone();
        self.post(async move {
            match catalog
                .products(&FilterSet::new(), SortKey::PriceLowToHigh)
                .await
            {
                Ok(products) => HomeMsg::ProductsLoaded(products),
                Err(e) => {
                    warn!(error = %e, "Failed to fetch featured products");
                    HomeMsg::ProductsLoaded(Vec::new())
                }
            }
        });
    }

    fn fetch_feature_images(&self) {
        let catalog = self.controller.catalog().clone();
        self.post(async move {
            match catalog.feature_images().await {
                Ok(images) => HomeMsg::FeatureImagesLoaded(images),
                Err(e) => {
                    warn!(error = %e, "Failed to fetch feature images");
                    HomeMsg::FeatureImagesLoaded(Vec::new())
                }
            }
        });
    }

    /// Run `work` in its own task and deliver the resulting message.
    fn post<W>(&self, work: W)
    where
        W: Future<Output = HomeMsg> + Send + 'static,
    {
        let mailbox = self.mailbox.clone();
        tokio::spawn(async move {
            let msg = work.await;
            if let Some(sender) = mailbox.upgrade() {
                let _ = sender.send(msg).await;
            }
        });
    }

    fn restart_timer(&mut self) {
        // Drop first so the old task is aborted before a new one exists.
        self.timer = None;
        if self.controller.carousel().autoplays() {
            self.timer = Some(SlideTimer::start(self.mailbox.clone()));
        }
    }
}

impl HomeHandle {
    async fn send(&self, msg: HomeMsg) -> Result<(), HomeError> {
        self.sender.send(msg).await.map_err(|_| HomeError::Closed)
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> HomeMsg,
    ) -> Result<T, HomeError> {
        let (tx, rx) = oneshot::channel();
        self.send(build(tx)).await?;
        rx.await.map_err(|_| HomeError::Closed)
    }

    /// Start the initial fetches.
    pub async fn mount(&self) -> Result<(), HomeError> {
        self.send(HomeMsg::Mount).await
    }

    /// Re-fetch promotional images; the slide timer follows the new collection.
    pub async fn refresh_feature_images(&self) -> Result<(), HomeError> {
        self.send(HomeMsg::RefreshFeatureImages).await
    }

    pub async fn next_slide(&self) -> Result<(), HomeError> {
        self.send(HomeMsg::NextSlide).await
    }

    pub async fn previous_slide(&self) -> Result<(), HomeError> {
        self.send(HomeMsg::PreviousSlide).await
    }

    /// Store the category filter and return the listing route.
    pub async fn select_category(&self, id: CategoryId) -> Result<&'static str, HomeError> {
        Ok(self
            .request(|reply| HomeMsg::SelectCategory { id, reply })
            .await??)
    }

    pub async fn view_details(&self, id: ProductId) -> Result<(), HomeError> {
        self.send(HomeMsg::ViewDetails(id)).await
    }

    pub async fn close_details(&self) -> Result<(), HomeError> {
        self.send(HomeMsg::CloseDetails).await
    }

    pub async fn add_to_cart(&self, product_id: ProductId) -> Result<AddToCartOutcome, HomeError> {
        self.request(|reply| HomeMsg::AddToCart { product_id, reply })
            .await
    }

    /// Current render state.
    pub async fn snapshot(&self) -> Result<HomeView, HomeError> {
        self.request(HomeMsg::Snapshot).await
    }

    /// Tear down the slide timer and ignore further fetch results.
    pub async fn unmount(&self) -> Result<(), HomeError> {
        self.send(HomeMsg::Unmount).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use freshcart_core::UserId;

    use super::*;
    use crate::home::controller::HomeServices;
    use crate::services::testing::{
        FakeCart, FakeCatalog, MemoryFilterStore, RecordingNotifier, images, product,
    };

    fn spawn(catalog: FakeCatalog) -> HomeHandle {
        HomeActor::spawn(HomeController::new(
            HomeServices {
                catalog,
                cart: FakeCart::default(),
                notifier: RecordingNotifier::default(),
                filters: MemoryFilterStore::default(),
            },
            Some(UserId::new("u1")),
        ))
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_slide_advances_every_interval() {
        let handle = spawn(FakeCatalog::with(images(3), vec![product("p1", 100)]));
        handle.mount().await.unwrap();
        settle().await;

        let view = handle.snapshot().await.unwrap();
        assert_eq!(view.current_slide, Some(0));
        assert_eq!(view.products.len(), 1);

        tokio::time::sleep(SlideTimer::interval()).await;
        assert_eq!(handle.snapshot().await.unwrap().current_slide, Some(1));

        tokio::time::sleep(SlideTimer::interval() * 2).await;
        assert_eq!(handle.snapshot().await.unwrap().current_slide, Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_timer_until_images_arrive() {
        let catalog = FakeCatalog::default();
        let handle = spawn(catalog.clone());
        handle.mount().await.unwrap();

        tokio::time::sleep(SlideTimer::interval() * 4).await;
        assert_eq!(handle.snapshot().await.unwrap().current_slide, None);

        catalog.set_images(images(2));
        handle.refresh_feature_images().await.unwrap();
        settle().await;
        assert_eq!(handle.snapshot().await.unwrap().current_slide, Some(0));

        tokio::time::sleep(SlideTimer::interval()).await;
        assert_eq!(handle.snapshot().await.unwrap().current_slide, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_image_change_restarts_timer() {
        let catalog = FakeCatalog::with(images(3), vec![]);
        let handle = spawn(catalog.clone());
        handle.mount().await.unwrap();
        settle().await;

        tokio::time::sleep(SlideTimer::interval() - Duration::from_millis(100)).await;
        handle.refresh_feature_images().await.unwrap();
        settle().await;

        // The old timer would have fired here; the replacement has not.
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(handle.snapshot().await.unwrap().current_slide, Some(0));

        tokio::time::sleep(SlideTimer::interval()).await;
        assert_eq!(handle.snapshot().await.unwrap().current_slide, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount_stops_auto_advance() {
        let handle = spawn(FakeCatalog::with(images(3), vec![]));
        handle.mount().await.unwrap();
        settle().await;

        tokio::time::sleep(SlideTimer::interval()).await;
        handle.unmount().await.unwrap();

        tokio::time::sleep(SlideTimer::interval() * 5).await;
        assert_eq!(handle.snapshot().await.unwrap().current_slide, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_queued_after_unmount_is_ignored() {
        let handle = spawn(FakeCatalog::with(images(3), vec![]));
        handle.mount().await.unwrap();
        settle().await;

        handle.unmount().await.unwrap();
        handle.send(HomeMsg::Tick).await.unwrap();
        assert_eq!(handle.snapshot().await.unwrap().current_slide, Some(0));

        handle.next_slide().await.unwrap();
        assert_eq!(handle.snapshot().await.unwrap().current_slide, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_timer_sends_no_ticks() {
        let (tx, mut rx) = mpsc::channel(4);
        let timer = SlideTimer::start(tx.downgrade());

        tokio::time::sleep(SlideTimer::interval() + Duration::from_millis(1)).await;
        assert!(matches!(rx.try_recv(), Ok(HomeMsg::Tick)));

        drop(timer);
        tokio::time::sleep(SlideTimer::interval() * 3).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_details_and_navigation_through_handle() {
        let handle = spawn(FakeCatalog::with(images(2), vec![product("p1", 250)]));
        handle.mount().await.unwrap();
        settle().await;

        handle.previous_slide().await.unwrap();
        assert_eq!(handle.snapshot().await.unwrap().current_slide, Some(1));

        handle.view_details(ProductId::new("p1")).await.unwrap();
        settle().await;
        let dialog = handle.snapshot().await.unwrap().dialog.unwrap();
        assert_eq!(dialog.price, "$2.50");

        handle.close_details().await.unwrap();
        assert!(handle.snapshot().await.unwrap().dialog.is_none());

        assert_eq!(
            handle.select_category(CategoryId::Poultry).await.unwrap(),
            "/shop/listing"
        );
        assert_eq!(
            handle.add_to_cart(ProductId::new("p1")).await.unwrap(),
            AddToCartOutcome::Added
        );
    }
}
