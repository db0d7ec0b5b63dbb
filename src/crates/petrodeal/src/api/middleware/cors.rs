//! CORS middleware configuration

use tower_http::cors::CorsLayer;

/// Permissive CORS for the browser dashboard
pub fn cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}
