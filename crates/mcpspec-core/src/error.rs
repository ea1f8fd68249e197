//! Error types for mcp-spec.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level result type for mcp-spec operations.
pub type Result<T> = std::result::Result<T, SpecError>;

/// Top-level error type for mcp-spec.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("cannot read document {}: {source}", path.display())]
    DocumentUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Search index not initialized. The specification document could not be loaded.")]
    IndexUnavailable,

    #[error("No results found for query: {0}")]
    NoMatch(String),

    #[error("Section not found: {0}")]
    SectionNotFound(String),

    #[error("search error: {0}")]
    Search(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
