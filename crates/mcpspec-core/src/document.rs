//! Document chunk type — the unit of indexing and retrieval.

use serde::{Deserialize, Serialize};

/// Section label applied to content that precedes the first heading.
pub const DEFAULT_SECTION: &str = "Overview";

/// A contiguous, labeled span of the source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentChunk {
    /// Zero-based sequence number in parse order.
    pub id: usize,
    /// Heading text governing this chunk.
    pub section: String,
    /// 1-based source line where the content begins.
    pub line: usize,
    /// Raw text span, trimmed of leading and trailing whitespace.
    pub content: String,
}

impl DocumentChunk {
    /// Number of lines in the chunk content.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }
}
