//! Document loading and per-call index construction.
//!
//! Every query re-reads the document from disk. Without the cache, the
//! document is re-chunked and re-indexed on each call. With the cache,
//! the built index is reused until the SHA-256 of the content changes;
//! a rebuild swaps the shared index under a write lock, so readers see
//! either the old index or the new one, never a partial one.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use sha2::{Digest, Sha256};

use crate::chunker::Chunker;
use crate::config::SpecConfig;
use crate::error::{Result, SpecError};
use crate::fuzzy::FuzzyMatcher;
use crate::index::{SearchResponse, SpecIndex};

/// Loads the configured document and answers queries against it.
#[derive(Debug)]
pub struct SpecLibrary {
    path: PathBuf,
    chunker: Chunker,
    matcher: FuzzyMatcher,
    default_limit: usize,
    cache: Option<IndexCache>,
}

impl SpecLibrary {
    /// Create a library from a validated config.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::Config`] if the config fails validation.
    pub fn new(config: &SpecConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            path: config.document_path(),
            chunker: config.chunker(),
            matcher: config.matcher()?,
            default_limit: config.default_limit,
            cache: config.cache.then(IndexCache::default),
        })
    }

    #[must_use]
    pub fn document_path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    /// Read the document into memory.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::DocumentUnreadable`] on any I/O failure.
    pub fn read_document(&self) -> Result<String> {
        std::fs::read_to_string(&self.path).map_err(|source| SpecError::DocumentUnreadable {
            path: self.path.clone(),
            source,
        })
    }

    /// Chunk `text` and index the chunks.
    #[must_use]
    pub fn build_index(&self, text: &str) -> SpecIndex {
        let chunks = self.chunker.chunk(text);
        tracing::debug!(
            chunks = chunks.len(),
            rule = %self.chunker.rule(),
            "built document index"
        );
        SpecIndex::new(chunks, self.matcher)
    }

    /// Read the document and return a ready index.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::DocumentUnreadable`] if the document cannot be read.
    pub fn try_load(&self) -> Result<Arc<SpecIndex>> {
        let text = self.read_document()?;
        Ok(match &self.cache {
            Some(cache) => cache.get_or_build(&text, || self.build_index(&text)),
            None => Arc::new(self.build_index(&text)),
        })
    }

    /// Like [`try_load`](Self::try_load), but a read failure is logged and
    /// reported as "no index available".
    #[must_use]
    pub fn load(&self) -> Option<Arc<SpecIndex>> {
        match self.try_load() {
            Ok(index) => Some(index),
            Err(e) => {
                tracing::warn!(error = %e, "document unavailable, search disabled");
                None
            }
        }
    }

    /// Free-text search against a freshly loaded index.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::IndexUnavailable`] if the document could not be
    /// loaded, [`SpecError::NoMatch`] if nothing matched, and
    /// [`SpecError::Search`] for an invalid limit.
    pub fn search(&self, query: &str, limit: Option<usize>) -> Result<SearchResponse> {
        let index = self.load().ok_or(SpecError::IndexUnavailable)?;
        let response = index.search(query, limit.unwrap_or(self.default_limit))?;
        if response.results.is_empty() {
            return Err(SpecError::NoMatch(query.to_string()));
        }
        Ok(response)
    }

    /// Content of the first chunk in section `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::IndexUnavailable`] if the document could not be
    /// loaded and [`SpecError::SectionNotFound`] on a miss.
    pub fn section(&self, name: &str) -> Result<String> {
        let index = self.load().ok_or(SpecError::IndexUnavailable)?;
        index.section_content(name).map(str::to_string)
    }
}

/// Single-slot index cache keyed by document content hash.
#[derive(Debug, Default)]
pub struct IndexCache {
    slot: RwLock<Option<CachedIndex>>,
}

#[derive(Debug)]
struct CachedIndex {
    digest: String,
    index: Arc<SpecIndex>,
}

impl IndexCache {
    /// Return the cached index for `text`, building and storing a new one
    /// if the content changed.
    pub fn get_or_build(&self, text: &str, build: impl FnOnce() -> SpecIndex) -> Arc<SpecIndex> {
        let digest = content_digest(text);

        {
            let slot = self.slot.read().unwrap_or_else(|e| e.into_inner());
            if let Some(cached) = slot.as_ref().filter(|c| c.digest == digest) {
                return Arc::clone(&cached.index);
            }
        }

        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        if let Some(cached) = slot.as_ref().filter(|c| c.digest == digest) {
            return Arc::clone(&cached.index);
        }
        let index = Arc::new(build());
        tracing::debug!(digest = %digest, "index cache refreshed");
        *slot = Some(CachedIndex {
            digest,
            index: Arc::clone(&index),
        });
        index
    }
}

fn content_digest(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn library_for(path: &Path, cache: bool) -> SpecLibrary {
        let config = SpecConfig {
            document: path.to_path_buf(),
            cache,
            ..SpecConfig::default()
        };
        SpecLibrary::new(&config).unwrap()
    }

    #[test]
    fn missing_document_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let lib = library_for(&dir.path().join("nope.md"), false);

        assert!(lib.load().is_none());
        assert!(matches!(
            lib.try_load(),
            Err(SpecError::DocumentUnreadable { .. })
        ));
        assert!(matches!(
            lib.search("tools", None),
            Err(SpecError::IndexUnavailable)
        ));
        assert!(matches!(
            lib.section("Tools"),
            Err(SpecError::IndexUnavailable)
        ));
    }

    #[test]
    fn search_and_section_read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spec.md");
        fs::write(&path, "# Intro\nHello world\n## Details\nMore text\n").unwrap();
        let lib = library_for(&path, false);

        let resp = lib.search("details", None).unwrap();
        assert_eq!(resp.results[0].section, "Details");
        assert_eq!(lib.section("Intro").unwrap(), "# Intro\nHello world");
        assert!(matches!(
            lib.section("Missing"),
            Err(SpecError::SectionNotFound(_))
        ));
        assert!(matches!(
            lib.search("zzzzzzzz", None),
            Err(SpecError::NoMatch(q)) if q == "zzzzzzzz"
        ));
    }

    #[test]
    fn uncached_library_sees_edits_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spec.md");
        fs::write(&path, "# First\none\n").unwrap();
        let lib = library_for(&path, false);
        assert!(lib.section("First").is_ok());

        fs::write(&path, "# Second\ntwo\n").unwrap();
        assert!(lib.section("First").is_err());
        assert!(lib.section("Second").is_ok());
    }

    #[test]
    fn cache_reuses_index_until_content_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spec.md");
        fs::write(&path, "# First\none\n").unwrap();
        let lib = library_for(&path, true);

        let a = lib.try_load().unwrap();
        let b = lib.try_load().unwrap();
        assert!(Arc::ptr_eq(&a, &b));

        fs::write(&path, "# Second\ntwo\n").unwrap();
        let c = lib.try_load().unwrap();
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(c.chunks()[0].section, "Second");
        // readers holding the old snapshot are unaffected
        assert_eq!(a.chunks()[0].section, "First");
    }

    #[test]
    fn default_limit_applies_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spec.md");
        let doc: String = (0..8).map(|i| format!("# Tools {i}\ntools\n")).collect();
        fs::write(&path, doc).unwrap();
        let config = SpecConfig {
            document: path,
            default_limit: 3,
            ..SpecConfig::default()
        };
        let lib = SpecLibrary::new(&config).unwrap();

        let resp = lib.search("tools", None).unwrap();
        assert_eq!(resp.results.len(), 3);
        assert_eq!(resp.total_results, 8);
        assert_eq!(lib.search("tools", Some(6)).unwrap().results.len(), 6);
    }

    #[test]
    fn digest_is_stable() {
        assert_eq!(content_digest("abc"), content_digest("abc"));
        assert_ne!(content_digest("abc"), content_digest("abd"));
        assert_eq!(content_digest("").len(), 64);
    }
}
