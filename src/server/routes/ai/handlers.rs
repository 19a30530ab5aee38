use super::extract::SpecUpload;
use crate::ai::{PipelineOutput, StageFailure};
use crate::auth::{Action, Session, authorize};
use crate::db::ComponentCreate;
use crate::error::{AiError, AtelierError, ResultExt};
use crate::server::extract::JsonBody;
use crate::server::guards::RequireSession;
use crate::server::router::AtelierState;
use atelier_schema::{
    Component, ComponentSpec, DocsRequest, ExtractedSpec, GeneratedCode, GeneratedDocs,
    PromptsRequest, UsagePrompts,
};
use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{info, warn};

/// Session and vendor key checks shared by every AI endpoint.
fn ready(state: &AtelierState, session: &Session) -> Result<(), AtelierError> {
    authorize(Some(session), Action::UseAi)?;
    if !state.ai.is_configured() {
        return Err(AiError::MissingApiKey.into());
    }
    Ok(())
}

/// POST /api/ai/extract-spec
pub async fn extract_spec(
    State(state): State<AtelierState>,
    RequireSession(session): RequireSession,
    upload: SpecUpload,
) -> Result<Json<ExtractedSpec>, AtelierError> {
    ready(&state, &session)?;
    let spec = state
        .pipeline()
        .extract(upload.image, upload.theme.as_ref())
        .await?;
    Ok(Json(spec))
}

/// POST /api/ai/generate-component
pub async fn generate_component(
    State(state): State<AtelierState>,
    RequireSession(session): RequireSession,
    JsonBody(spec): JsonBody<ComponentSpec>,
) -> Result<Json<GeneratedCode>, AtelierError> {
    ready(&state, &session)?;
    let code = state.pipeline().generate_code(&spec).await?;
    Ok(Json(GeneratedCode { code }))
}

/// POST /api/ai/generate-prompts
pub async fn generate_prompts(
    State(state): State<AtelierState>,
    RequireSession(session): RequireSession,
    JsonBody(request): JsonBody<PromptsRequest>,
) -> Result<Json<UsagePrompts>, AtelierError> {
    ready(&state, &session)?;
    Ok(Json(state.pipeline().generate_prompts(&request).await?))
}

/// POST /api/ai/generate-docs
pub async fn generate_docs(
    State(state): State<AtelierState>,
    RequireSession(session): RequireSession,
    JsonBody(request): JsonBody<DocsRequest>,
) -> Result<Json<GeneratedDocs>, AtelierError> {
    ready(&state, &session)?;
    Ok(Json(state.pipeline().generate_docs(&request).await?))
}

#[derive(Debug, Serialize)]
pub struct PipelineResponse {
    /// Draft ready for `POST /api/admin/components`.
    pub component: ComponentCreate,
    pub stages: PipelineOutput,
    /// Stored row when `persist` was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved: Option<Component>,
}

async fn persist_draft(
    state: &AtelierState,
    draft: Option<ComponentCreate>,
) -> Result<Option<Component>, AtelierError> {
    let Some(draft) = draft else {
        return Ok(None);
    };
    draft.validate()?;
    let saved = state
        .db
        .upsert_component(draft)
        .await
        .or_generic("Failed to save generated component")?;
    info!(component = %saved.slug, "generated component saved");
    Ok(Some(saved.into()))
}

/// POST /api/ai/pipeline
pub async fn run_pipeline(
    State(state): State<AtelierState>,
    RequireSession(session): RequireSession,
    upload: SpecUpload,
) -> Result<Json<PipelineResponse>, Response> {
    ready(&state, &session).map_err(IntoResponse::into_response)?;
    if upload.persist {
        authorize(Some(&session), Action::Create)
            .map_err(|denied| AtelierError::from(denied).into_response())?;
    }

    match state.pipeline().run(upload.image, upload.theme).await {
        Ok(stages) => {
            let component = stages
                .to_component()
                .ok_or_else(|| AtelierError::Internal("Pipeline produced no spec".into()))
                .map_err(IntoResponse::into_response)?;
            let saved = if upload.persist {
                persist_draft(&state, Some(component.clone()))
                    .await
                    .map_err(IntoResponse::into_response)?
            } else {
                None
            };
            Ok(Json(PipelineResponse {
                component,
                stages,
                saved,
            }))
        }
        Err(failure) => {
            if upload.persist {
                if let Err(e) = persist_draft(&state, failure.partial.to_component()).await {
                    warn!(error = %e, stage = %failure.stage, "failed to save partial component");
                }
            }
            Err(StageFailure::into_response(failure))
        }
    }
}
