//! MCP tool definitions for mcp-spec.

use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use serde::Deserialize;

use mcpspec_core::{SpecError, SpecLibrary};

use crate::sections::SpecSection;

/// Server name reported during initialization.
pub const SERVER_NAME: &str = "mcp-spec";

/// MCP server exposing arithmetic, echo, and specification search tools.
#[derive(Debug, Clone)]
pub struct SpecMcpService {
    library: Arc<SpecLibrary>,
    tool_router: ToolRouter<Self>,
}

impl SpecMcpService {
    /// Create a service answering searches from `library`.
    pub fn new(library: SpecLibrary) -> Self {
        Self {
            library: Arc::new(library),
            tool_router: Self::tool_router(),
        }
    }

    #[must_use]
    pub fn library(&self) -> &SpecLibrary {
        &self.library
    }
}

// === Tool request types ===

/// Request to add two numbers.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddRequest {
    /// First addend
    pub a: f64,
    /// Second addend
    pub b: f64,
}

/// Request to echo text.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct EchoRequest {
    /// Text to echo back
    pub text: String,
}

/// Request for free-text search over the specification.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchSpecRequest {
    /// Free-text search query
    pub query: String,
    /// Maximum results to return (default: 5)
    #[serde(default)]
    #[schemars(range(min = 1))]
    pub limit: Option<usize>,
}

/// Request for a specification section by name.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchSectionRequest {
    /// Section name to look up
    pub query: SpecSection,
}

#[tool_router]
impl SpecMcpService {
    /// Add two numbers.
    #[tool(description = "Add two numbers")]
    fn add(&self, Parameters(req): Parameters<AddRequest>) -> String {
        (req.a + req.b).to_string()
    }

    /// Echo back the input text.
    #[tool(description = "Echo back the input text")]
    fn echo(&self, Parameters(req): Parameters<EchoRequest>) -> String {
        format!("Echo: {}", req.text)
    }

    /// Fuzzy search across the specification.
    #[tool(
        description = "Search the Model Context Protocol specification. Returns the best matching sections with line numbers and relevance scores."
    )]
    fn search_spec(&self, Parameters(req): Parameters<SearchSpecRequest>) -> String {
        tracing::debug!(query = %req.query, limit = ?req.limit, "search_spec");
        match self.library.search(&req.query, req.limit) {
            Ok(response) => serde_json::to_string_pretty(&response)
                .unwrap_or_else(|e| format!("Error serializing search results: {e}")),
            Err(e) => error_text(&e),
        }
    }

    /// Return the content of one specification section.
    #[tool(
        description = "Get the content of a Model Context Protocol specification section by its exact name"
    )]
    fn search_spec_by_section(&self, Parameters(req): Parameters<SearchSectionRequest>) -> String {
        tracing::debug!(section = %req.query, "search_spec_by_section");
        match self.library.section(req.query.as_str()) {
            Ok(content) => serde_json::to_string_pretty(&serde_json::json!({ "content": content }))
                .unwrap_or_else(|e| format!("Error serializing section: {e}")),
            Err(e) => error_text(&e),
        }
    }
}

#[tool_handler]
impl ServerHandler for SpecMcpService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(
                "MCP specification server. Use search_spec for free-text search over the \
                 Model Context Protocol specification and search_spec_by_section to read a \
                 section by name. add and echo are simple test tools."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Text returned to the client when a search tool cannot produce a payload.
fn error_text(err: &SpecError) -> String {
    match err {
        SpecError::IndexUnavailable | SpecError::NoMatch(_) | SpecError::SectionNotFound(_) => {
            err.to_string()
        }
        other => {
            tracing::warn!(error = %other, "search tool failed");
            format!("Error searching specification: {other}")
        }
    }
}
