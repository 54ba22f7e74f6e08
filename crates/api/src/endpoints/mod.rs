//! API endpoints.

mod dashboard;
mod favorites;
mod lists;
mod targets;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/favorites", favorites::router())
        .nest("/lists", lists::router())
        .nest("/targets", targets::router())
        .nest("/dashboard", dashboard::router())
}
