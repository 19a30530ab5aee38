pub mod events;
pub mod handlers;

use crate::server::router::AtelierState;
use axum::{Router, http::Method, http::header::CONTENT_TYPE, routing::get};
use events::active_theme_events;
use handlers::{
    active_theme, component_by_slug, list_components, list_themes, search_components,
    theme_by_value,
};
use tower_http::cors::{Any, CorsLayer};

fn public_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
}

pub fn router() -> Router<AtelierState> {
    Router::new()
        .route("/api/public/themes", get(list_themes))
        .route("/api/public/themes/{value}", get(theme_by_value))
        .route("/api/public/active-theme", get(active_theme))
        .route("/api/public/active-theme/events", get(active_theme_events))
        .route("/api/public/components", get(list_components))
        .route("/api/public/components/{slug}", get(component_by_slug))
        .route("/api/public/search", get(search_components))
        .layer(public_cors())
}
