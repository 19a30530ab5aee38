use crate::db::DashboardStats;
use crate::error::{AtelierError, ResultExt};
use crate::server::router::AtelierState;
use axum::{Json, extract::State, response::Html};

/// GET /admin
pub async fn dashboard(
    State(state): State<AtelierState>,
) -> Result<Json<DashboardStats>, AtelierError> {
    let stats = state
        .db
        .dashboard_stats()
        .await
        .or_generic("Failed to load dashboard")?;
    Ok(Json(stats))
}

/// GET /admin/login
pub async fn login_page() -> Html<&'static str> {
    Html(
        "<!doctype html>\n<html><head><title>Atelier admin</title></head><body>\n\
         <h1>Atelier admin</h1>\n\
         <p>Sign in with <code>POST /api/auth/login</code> and a JSON body \
         <code>{\"password\": \"...\"}</code> (add <code>\"email\"</code> for a user account), \
         then return to <a href=\"/admin\">/admin</a>.</p>\n\
         </body></html>\n",
    )
}
