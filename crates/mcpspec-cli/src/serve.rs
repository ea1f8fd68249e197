//! Stdio MCP server loop.

use anyhow::{Context, Result};
use rmcp::{transport::stdio, ServiceExt};

use mcpspec_core::SpecLibrary;
use mcpspec_mcp::SpecMcpService;

/// Serve the MCP tools over stdin/stdout until the client disconnects.
pub async fn run_stdio(library: SpecLibrary) -> Result<()> {
    // Searches reload the document per call; this only reports its state.
    match library.try_load() {
        Ok(index) => tracing::info!(
            document = %library.document_path().display(),
            chunks = index.len(),
            "specification indexed"
        ),
        Err(e) => tracing::warn!(error = %e, "specification unavailable, search tools disabled"),
    }

    // Clients wait for this line; it must not depend on the log filter.
    eprintln!("MCP server running on stdio");
    let service = SpecMcpService::new(library)
        .serve(stdio())
        .await
        .context("failed to start MCP server")?;

    let reason = service
        .waiting()
        .await
        .context("MCP server task failed")?;
    tracing::debug!(?reason, "MCP server stopped");

    Ok(())
}
