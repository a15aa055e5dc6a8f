pub mod day;
pub mod entries;
pub mod journals;
pub mod pages;
pub mod system;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use serde::Serialize;
use tower::ServiceBuilder;

use crate::middleware;
use crate::state::AppState;

/// Response of every create route.
#[derive(Debug, Serialize)]
pub struct Created {
    pub id: String,
}

/// Assemble the full router with all route groups.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(system::routes())
        .merge(journals::routes())
        .merge(pages::routes())
        .merge(entries::routes())
        .merge(day::routes())
        .with_state(state)
}

/// The router wrapped in the middleware stack the server runs with.
/// CORS sits inside the body limit: it needs a response body with a `Default`.
pub fn app(state: AppState) -> Router {
    let max_body_bytes = state.config().max_body_bytes;
    build_router(state).layer(
        ServiceBuilder::new()
            .layer(middleware::request_tracing::trace_layer())
            .layer(middleware::body_limit::body_limit_layer(max_body_bytes))
            .layer(middleware::cors::cors_layer())
            .layer(DefaultBodyLimit::disable()),
    )
}
