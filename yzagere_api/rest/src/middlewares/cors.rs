//! Cross-origin access for the contact widget, which may be embedded on any
//! page.

use axum::{
    http::{header, Method},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

/// Answers every `OPTIONS` request as a preflight with an empty `200` and adds
/// `Access-Control-Allow-Origin: *` to all other responses.
pub fn add<S: Clone + Send + Sync + 'static>(router: Router<S>) -> Router<S> {
    router.layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE]),
    )
}
