//! Model-context-protocol tools over the read-only catalog.

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog;
use crate::db::DbActorHandle;
use crate::error::{AtelierError, ErrorBody};

pub const SERVER_NAME: &str = "atelier";

const INSTRUCTIONS: &str = "Read-only access to the Atelier design system: browse and search \
components (code, variants, props, usage prompts) and fetch theme tokens.";

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListComponentsRequest {
    /// Restrict to one category: buttons, inputs, layout, navigation, feedback,
    /// data-display, overlays or other. Unknown values match nothing.
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchComponentsRequest {
    /// Matched case-insensitively against name, description and category
    pub query: String,
    /// Optional category restriction, same values as `list_components`
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetComponentRequest {
    /// Component slug, e.g. `button`
    pub slug: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetThemeRequest {
    /// Theme value, e.g. `light`
    pub value: String,
}

#[derive(Clone)]
pub struct AtelierMcp {
    db: DbActorHandle,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl AtelierMcp {
    pub fn new(db: DbActorHandle) -> Self {
        Self {
            db,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "List every design-system component, optionally filtered by category.")]
    pub async fn list_components(
        &self,
        Parameters(req): Parameters<ListComponentsRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!(category = ?req.category, "mcp list_components");
        to_tool_result(
            catalog::list_components(&self.db, req.category, catalog::NO_LIMIT).await,
        )
    }

    #[tool(description = "Search components by name, description or category; returns at most 50 matches.")]
    pub async fn search_components(
        &self,
        Parameters(req): Parameters<SearchComponentsRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!(query = %req.query, category = ?req.category, "mcp search_components");
        to_tool_result(
            catalog::search_components(
                &self.db,
                &req.query,
                req.category,
                catalog::DEFAULT_SEARCH_LIMIT,
            )
            .await,
        )
    }

    #[tool(description = "Fetch one component by slug, including code, variants, props and prompts.")]
    pub async fn get_component(
        &self,
        Parameters(req): Parameters<GetComponentRequest>,
    ) -> Result<CallToolResult, McpError> {
        to_tool_result(catalog::component_by_slug(&self.db, &req.slug).await)
    }

    #[tool(description = "List every theme with its color, typography and spacing tokens.")]
    pub async fn list_themes(&self) -> Result<CallToolResult, McpError> {
        to_tool_result(catalog::list_themes(&self.db).await)
    }

    #[tool(description = "Fetch one theme by value.")]
    pub async fn get_theme(
        &self,
        Parameters(req): Parameters<GetThemeRequest>,
    ) -> Result<CallToolResult, McpError> {
        to_tool_result(catalog::theme_by_value(&self.db, &req.value).await)
    }
}

#[tool_handler]
impl ServerHandler for AtelierMcp {
    fn get_info(&self) -> ServerInfo {
        let mut server_info = Implementation::from_build_env();
        server_info.name = SERVER_NAME.to_string();
        server_info.version = env!("CARGO_PKG_VERSION").to_string();
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info,
            ..Default::default()
        }
    }
}

/// Domain failures become tool errors (`isError`) so the client sees `{error}`; only a
/// serialization failure is a protocol error.
fn to_tool_result<T: Serialize>(
    result: Result<T, AtelierError>,
) -> Result<CallToolResult, McpError> {
    match result {
        Ok(value) => serde_json::to_string_pretty(&value)
            .map(|text| CallToolResult::success(vec![Content::text(text)]))
            .map_err(|e| McpError::internal_error(e.to_string(), None)),
        Err(err) => {
            let body = ErrorBody {
                error: err.to_string(),
            };
            let text = serde_json::to_string_pretty(&body)
                .map_err(|e| McpError::internal_error(e.to_string(), None))?;
            Ok(CallToolResult::error(vec![Content::text(text)]))
        }
    }
}
