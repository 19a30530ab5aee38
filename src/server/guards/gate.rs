use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use super::session::MaybeSession;

pub const LOGIN_PATH: &str = "/admin/login";

fn is_gated(path: &str) -> bool {
    (path == "/admin" || path.starts_with("/admin/")) && path != LOGIN_PATH
}

/// Sends unauthenticated browsers on admin pages to the login page.
pub async fn admin_gate(
    MaybeSession(session): MaybeSession,
    req: Request,
    next: Next,
) -> Response {
    if session.is_none() && is_gated(req.uri().path()) {
        debug!(path = %req.uri().path(), "no session, redirecting to login");
        return Redirect::to(LOGIN_PATH).into_response();
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_page_is_not_gated() {
        assert!(is_gated("/admin"));
        assert!(is_gated("/admin/themes"));
        assert!(!is_gated("/admin/login"));
        assert!(!is_gated("/administrator"));
        assert!(!is_gated("/api/admin/themes"));
    }
}
