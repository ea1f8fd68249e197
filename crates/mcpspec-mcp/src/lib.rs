//! # mcpspec-mcp
//!
//! MCP (Model Context Protocol) server for the mcp-spec document.
//!
//! Exposes the following MCP tools:
//! - `add`: Add two numbers
//! - `echo`: Echo text back
//! - `search_spec`: Fuzzy full-text search over the specification
//! - `search_spec_by_section`: Read a section by its exact name

pub mod sections;
pub mod tools;

pub use sections::SpecSection;
pub use tools::{SpecMcpService, SERVER_NAME};
