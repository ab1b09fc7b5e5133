//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::home::{HomeView, SLIDE_INTERVAL};
use crate::middleware::OptionalUser;
use crate::models::{CurrentUser, Toast};
use crate::services::take_toasts;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub view: HomeView,
    pub user: Option<CurrentUser>,
    pub toasts: Vec<Toast>,
    /// Auto-advance period for the slider, in milliseconds.
    pub slide_interval_ms: u128,
}

/// Display the home page.
#[instrument(skip(state, session, user))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    user: OptionalUser,
) -> HomeTemplate {
    let mut controller = state.home_controller(&session, user.user_id());
    controller.initialize().await;

    HomeTemplate {
        view: controller.view(),
        user: user.0,
        toasts: take_toasts(&session).await,
        slide_interval_ms: SLIDE_INTERVAL.as_millis(),
    }
}
