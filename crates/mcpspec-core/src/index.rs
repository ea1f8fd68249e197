//! In-memory search index over document chunks.
//!
//! Supports two query modes:
//! - free-text fuzzy search over chunk content and section titles,
//!   ranked best-first and truncated to a limit
//! - exact section lookup by heading text

use serde::{Deserialize, Serialize};

use crate::document::DocumentChunk;
use crate::error::{Result, SpecError};
use crate::fuzzy::FuzzyMatcher;

/// Default number of results for free-text search.
pub const DEFAULT_LIMIT: usize = 5;

/// A single ranked search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub section: String,
    pub line: usize,
    pub content: String,
    /// Relevance in `[0, 1]`; 1.0 is a perfect match.
    pub score: f64,
}

/// Free-text search payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub query: String,
    /// Number of matching chunks before truncation to the limit.
    pub total_results: usize,
    pub results: Vec<SearchHit>,
}

/// Fuzzy-searchable index built from a chunked document.
#[derive(Debug, Clone)]
pub struct SpecIndex {
    chunks: Vec<DocumentChunk>,
    matcher: FuzzyMatcher,
}

impl SpecIndex {
    #[must_use]
    pub fn new(chunks: Vec<DocumentChunk>, matcher: FuzzyMatcher) -> Self {
        Self { chunks, matcher }
    }

    #[must_use]
    pub fn chunks(&self) -> &[DocumentChunk] {
        &self.chunks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Ranked fuzzy search over chunk content and section titles.
    ///
    /// A chunk's distance is the better of its content and section
    /// distances. Results are ordered by ascending distance, ties by
    /// chunk order.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::Search`] if `limit` is zero.
    pub fn search(&self, query: &str, limit: usize) -> Result<SearchResponse> {
        if limit == 0 {
            return Err(SpecError::Search(
                "limit must be a positive integer".to_string(),
            ));
        }

        let mut scored: Vec<(f64, &DocumentChunk)> = self
            .chunks
            .iter()
            .filter_map(|chunk| {
                let content = self.matcher.distance(query, &chunk.content);
                let section = self.matcher.distance(query, &chunk.section);
                let best = match (content, section) {
                    (Some(a), Some(b)) => a.min(b),
                    (Some(a), None) | (None, Some(a)) => a,
                    (None, None) => return None,
                };
                Some((best, chunk))
            })
            .collect();

        scored.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.id.cmp(&b.1.id)));
        let total_results = scored.len();

        let results = scored
            .into_iter()
            .take(limit)
            .map(|(distance, chunk)| SearchHit {
                section: chunk.section.clone(),
                line: chunk.line,
                content: chunk.content.clone(),
                score: 1.0 - distance,
            })
            .collect();

        tracing::debug!(query, total_results, limit, "fuzzy search complete");

        Ok(SearchResponse {
            query: query.to_string(),
            total_results,
            results,
        })
    }

    /// First chunk whose section equals `name` exactly (case-sensitive).
    #[must_use]
    pub fn find_section(&self, name: &str) -> Option<&DocumentChunk> {
        self.chunks.iter().find(|c| c.section == name)
    }

    /// Content of the first chunk labeled `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::SectionNotFound`] if no chunk carries that label.
    pub fn section_content(&self, name: &str) -> Result<&str> {
        self.find_section(name)
            .map(|c| c.content.as_str())
            .ok_or_else(|| SpecError::SectionNotFound(name.to_string()))
    }
}
