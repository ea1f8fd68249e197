//! # mcpspec-core
//!
//! Document chunking and fuzzy retrieval for the mcp-spec server.
//!
//! This crate defines everything below the MCP tool layer:
//! - [`DocumentChunk`] — the unit of indexing and retrieval
//! - [`Chunker`] / [`HeadingRule`] — line-scan markdown chunking
//! - [`FuzzyMatcher`] — bounded-error bitap matching
//! - [`SpecIndex`] — ranked free-text search and exact section lookup
//! - [`SpecLibrary`] — document loading, optional content-hash cache
//! - [`SpecConfig`] — TOML configuration
//! - Error type ([`SpecError`])

pub mod chunker;
pub mod config;
pub mod document;
pub mod error;
pub mod fuzzy;
pub mod index;
pub mod library;

pub use chunker::{chunk_document, Chunker, HeadingRule};
pub use config::SpecConfig;
pub use document::{DocumentChunk, DEFAULT_SECTION};
pub use error::{Result, SpecError};
pub use fuzzy::FuzzyMatcher;
pub use index::{SearchHit, SearchResponse, SpecIndex};
pub use library::{IndexCache, SpecLibrary};
