pub mod error;
pub mod response;
pub mod v1;

use axum::Router;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::controller::AppState;

pub fn router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.cfg.server.request_timeout_secs);

    Router::new()
        .nest("/api/v1", v1::router(state))
        .layer(
            ServiceBuilder::new()
                .layer(axum::extract::DefaultBodyLimit::max(64 * 1024))
                .layer(TimeoutLayer::new(timeout)),
        )
        .layer(TraceLayer::new_for_http())
}
