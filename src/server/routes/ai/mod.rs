pub mod extract;
pub mod handlers;

use crate::server::router::AtelierState;
use axum::{Router, extract::DefaultBodyLimit, routing::post};
use handlers::{extract_spec, generate_component, generate_docs, generate_prompts, run_pipeline};

/// Spec sheet uploads are images; allow more than axum's 2 MiB default.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub fn router() -> Router<AtelierState> {
    Router::new()
        .route("/api/ai/extract-spec", post(extract_spec))
        .route("/api/ai/generate-component", post(generate_component))
        .route("/api/ai/generate-prompts", post(generate_prompts))
        .route("/api/ai/generate-docs", post(generate_docs))
        .route("/api/ai/pipeline", post(run_pipeline))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}
