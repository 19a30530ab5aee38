pub mod components;
pub mod dashboard;
pub mod password;
pub mod themes;

use crate::server::router::AtelierState;
use axum::{
    Router,
    routing::{get, post},
};

/// JSON API under `/api/admin`. Each handler checks its own session requirement.
pub fn router() -> Router<AtelierState> {
    Router::new()
        .route(
            "/api/admin/themes",
            get(themes::list_themes).post(themes::create_theme),
        )
        .route(
            "/api/admin/themes/{id}",
            get(themes::get_theme)
                .patch(themes::update_theme)
                .delete(themes::delete_theme),
        )
        .route(
            "/api/admin/themes/{id}/activate",
            post(themes::activate_theme),
        )
        .route(
            "/api/admin/components",
            get(components::list_components).post(components::create_component),
        )
        .route(
            "/api/admin/components/{id}",
            get(components::get_component)
                .patch(components::update_component)
                .delete(components::delete_component),
        )
        .route(
            "/api/admin/change-password",
            post(password::change_password),
        )
}

/// Browser-facing `/admin` pages, wrapped by `admin_gate`.
pub fn console_router() -> Router<AtelierState> {
    Router::new()
        .route("/admin", get(dashboard::dashboard))
        .route("/admin/login", get(dashboard::login_page))
}
