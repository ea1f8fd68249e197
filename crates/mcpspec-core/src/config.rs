//! Server configuration.
//!
//! Loaded from an optional TOML file; every key is optional:
//!
//! ```toml
//! document = "docs/mcp-spec.md"   # see `SpecConfig::document_path`
//! heading-rule = "any-level"      # or "top-level"
//! max-chunk-lines = 500
//! default-limit = 5
//! tolerance = 0.3
//! cache = false
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::chunker::{Chunker, HeadingRule, DEFAULT_MAX_CHUNK_LINES};
use crate::error::{Result, SpecError};
use crate::fuzzy::{FuzzyMatcher, DEFAULT_TOLERANCE};
use crate::index::DEFAULT_LIMIT;

/// Bundled document location, relative to the install directory.
pub const DEFAULT_DOCUMENT: &str = "docs/mcp-spec.md";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct SpecConfig {
    /// Markdown document to index. Relative paths are resolved by
    /// [`SpecConfig::document_path`].
    pub document: PathBuf,
    pub heading_rule: HeadingRule,
    pub max_chunk_lines: usize,
    /// Result count when a search does not pass a limit.
    pub default_limit: usize,
    /// Fuzzy match tolerance, 0 (exact only) to 1 (anything).
    pub tolerance: f64,
    /// Reuse the built index while the document content is unchanged.
    pub cache: bool,
}

impl Default for SpecConfig {
    fn default() -> Self {
        Self {
            document: PathBuf::from(DEFAULT_DOCUMENT),
            heading_rule: HeadingRule::default(),
            max_chunk_lines: DEFAULT_MAX_CHUNK_LINES,
            default_limit: DEFAULT_LIMIT,
            tolerance: DEFAULT_TOLERANCE,
            cache: false,
        }
    }
}

impl SpecConfig {
    /// Load and validate a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::Io`] if the file cannot be read and
    /// [`SpecError::Config`] if it is malformed or fails validation.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&raw)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse and validate a TOML config string.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::Config`] if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw).map_err(|e| SpecError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::Config`] naming the first invalid key.
    pub fn validate(&self) -> Result<()> {
        if self.max_chunk_lines == 0 {
            return Err(SpecError::Config(
                "max-chunk-lines must be at least 1".to_string(),
            ));
        }
        if self.default_limit == 0 {
            return Err(SpecError::Config(
                "default-limit must be at least 1".to_string(),
            ));
        }
        FuzzyMatcher::new(self.tolerance)?;
        Ok(())
    }

    /// Location of the document.
    ///
    /// A relative path is looked up next to the executable, then in the
    /// working directory, then in the source tree the binary was built
    /// from. If none exists the first candidate is returned so the read
    /// failure names it.
    #[must_use]
    pub fn document_path(&self) -> PathBuf {
        if self.document.is_absolute() {
            return self.document.clone();
        }
        let candidates: Vec<PathBuf> = install_dir()
            .map(|dir| dir.join(&self.document))
            .into_iter()
            .chain([self.document.clone(), source_root().join(&self.document)])
            .collect();
        candidates
            .iter()
            .find(|path| path.exists())
            .unwrap_or(&candidates[0])
            .clone()
    }

    #[must_use]
    pub fn chunker(&self) -> Chunker {
        Chunker::new(self.heading_rule, self.max_chunk_lines)
    }

    /// # Errors
    ///
    /// Returns [`SpecError::Config`] if the tolerance is out of range.
    pub fn matcher(&self) -> Result<FuzzyMatcher> {
        FuzzyMatcher::new(self.tolerance)
    }
}

/// Directory containing the running executable.
#[must_use]
pub fn install_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}

/// Workspace root this crate was compiled from; holds the bundled `docs/`.
#[must_use]
pub fn source_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}
