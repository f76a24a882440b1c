use axum::http::{header, HeaderName, Method};
use tower_http::cors::{Any, CorsLayer};

use crate::routes::dataset::PASSWORD_HEADER;

/// CORS for the browser dashboard. Any origin, but only the methods and
/// headers the API actually uses.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(PASSWORD_HEADER),
        ])
}
