use tower_http::cors::{Any, CorsLayer};

/// Build the CORS layer. Any origin, method and header: the journaling
/// frontend is served from a different origin than the API.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
