use tower_http::limit::RequestBodyLimitLayer;

/// Cap request bodies. Drawings carry their whole point sequence, so the cap
/// is configurable rather than axum's 2 MiB default.
pub fn body_limit_layer(max_bytes: usize) -> RequestBodyLimitLayer {
    RequestBodyLimitLayer::new(max_bytes)
}
