use crate::ai::{AnthropicClient, Pipeline};
use crate::auth::{SessionSettings, cookie_key};
use crate::config::Config;
use crate::db::DbActorHandle;
use crate::error::AtelierError;
use crate::server::guards::admin_gate;
use crate::server::routes::{admin, ai, auth, public};

use axum::{
    Router,
    extract::{FromRef, Request},
    http::{HeaderName, HeaderValue, StatusCode, Version, header::USER_AGENT},
    middleware::{self, Next},
    response::Response,
};
use axum_extra::extract::cookie::Key;
use base64::Engine as _;
use rand::RngCore;
use std::time::Instant;
use tracing::{error, info, warn};

const MAX_REQUEST_ID_LEN: usize = 128;
const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

fn generate_request_id() -> String {
    // 96 bits => 16 chars base64url (no padding).
    let mut bytes = [0u8; 12];
    rand::rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

fn format_http_version(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_11 => "HTTP/1.1",
        Version::HTTP_2 => "HTTP/2",
        Version::HTTP_3 => "HTTP/3",
        _ => "HTTP/?",
    }
}

#[derive(Clone)]
pub struct AtelierState {
    pub db: DbActorHandle,
    pub ai: AnthropicClient,
    /// Encrypts the session cookie.
    pub cookie_key: Key,
    pub session: SessionSettings,
}

impl AtelierState {
    pub fn new(db: DbActorHandle, cfg: &Config) -> Result<Self, AtelierError> {
        Ok(Self {
            db,
            ai: AnthropicClient::new(cfg.anthropic())?,
            cookie_key: cookie_key(cfg.basic.cookie_secret.as_deref()),
            session: SessionSettings::new(cfg.basic.insecure_cookie, cfg.basic.session_ttl_hours),
        })
    }

    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(self.ai.clone())
    }
}

impl FromRef<AtelierState> for Key {
    fn from_ref(state: &AtelierState) -> Self {
        state.cookie_key.clone()
    }
}

async fn not_found_handler() -> StatusCode {
    StatusCode::NOT_FOUND
}

async fn access_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let version = req.version();

    let request_id = req
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN)
        .map(str::to_string)
        .unwrap_or_else(generate_request_id);

    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let start = Instant::now();
    let mut resp = next.run(req).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        resp.headers_mut().insert(X_REQUEST_ID, value);
    }

    let status = resp.status();
    let latency_ms = start.elapsed().as_millis() as u64;
    let path = uri.path();
    let protocol = format_http_version(version);

    // For SSE responses `latency_ms` is time-to-first-byte, not the stream duration.
    if status.is_server_error() {
        error!(
            "| {:>3} | {} | {:^7} | {:<8} | {} | {}ms | {}",
            status.as_u16(),
            request_id,
            method.as_str(),
            protocol,
            path,
            latency_ms,
            user_agent
        );
    } else if status.is_client_error() {
        warn!(
            "| {:>3} | {} | {:^7} | {:<8} | {} | {}ms | {}",
            status.as_u16(),
            request_id,
            method.as_str(),
            protocol,
            path,
            latency_ms,
            user_agent
        );
    } else {
        info!(
            "| {:>3} | {} | {:^7} | {:<8} | {} | {}ms | {}",
            status.as_u16(),
            request_id,
            method.as_str(),
            protocol,
            path,
            latency_ms,
            user_agent
        );
    }

    resp
}

pub fn atelier_router(state: AtelierState) -> Router {
    let console = admin::console_router()
        .layer(middleware::from_fn_with_state(state.clone(), admin_gate));

    Router::new()
        .merge(public::router())
        .merge(auth::router())
        .merge(admin::router())
        .merge(ai::router())
        .merge(console)
        .fallback(not_found_handler)
        .with_state(state)
        .layer(middleware::from_fn(access_log))
}
