//! Router construction.
//!
//! Builds the axum router: the reload channel when live reload is enabled,
//! static file serving for everything else.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::live_reload;
use crate::state::AppState;
use crate::static_files;

/// Well-known path the injected client connects back to.
pub(crate) const LIVE_RELOAD_PATH: &str = "/__livereload";

/// Create the application router.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new();

    // Reload channel is only mounted when live reload is enabled.
    if state.live_reload_enabled() {
        router = router.route(LIVE_RELOAD_PATH, get(live_reload::sse_handler));
    }

    router
        .merge(static_files::static_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
