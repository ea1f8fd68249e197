//! Line-scan markdown chunker.
//!
//! Splits a markdown document into [`DocumentChunk`]s at heading lines.
//! Which headings count as boundaries is decided by [`HeadingRule`]:
//!
//! ```markdown
//! # Intro          <- boundary under both rules
//! Hello world
//! ## Details       <- boundary only under HeadingRule::AnyLevel
//! More text
//! ```
//!
//! Sections longer than the configured line limit are force-split into
//! several chunks sharing one section label.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::document::{DocumentChunk, DEFAULT_SECTION};
use crate::error::SpecError;

/// Default maximum number of lines in a single chunk.
pub const DEFAULT_MAX_CHUNK_LINES: usize = 500;

/// Which heading lines start a new chunk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeadingRule {
    /// One or more `#` followed by a space (`#`, `##`, `###`, ...).
    #[default]
    AnyLevel,
    /// Exactly one `#` followed by a space.
    TopLevel,
}

impl HeadingRule {
    /// Return the heading text if `line` is a boundary under this rule.
    #[must_use]
    pub fn heading_text<'a>(&self, line: &'a str) -> Option<&'a str> {
        let rest = line.trim_start_matches('#');
        let level = line.len() - rest.len();
        let accepted = match self {
            Self::AnyLevel => level >= 1,
            Self::TopLevel => level == 1,
        };
        if accepted && rest.starts_with([' ', '\t']) {
            Some(rest.trim())
        } else {
            None
        }
    }
}

impl fmt::Display for HeadingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AnyLevel => f.write_str("any-level"),
            Self::TopLevel => f.write_str("top-level"),
        }
    }
}

impl FromStr for HeadingRule {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any-level" | "any" => Ok(Self::AnyLevel),
            "top-level" | "h1" => Ok(Self::TopLevel),
            other => Err(SpecError::Config(format!(
                "unknown heading rule '{other}' (expected 'any-level' or 'top-level')"
            ))),
        }
    }
}

/// Splits markdown text into ordered chunks.
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    rule: HeadingRule,
    max_lines: usize,
}

impl Default for Chunker {
    fn default() -> Self {
        Self {
            rule: HeadingRule::default(),
            max_lines: DEFAULT_MAX_CHUNK_LINES,
        }
    }
}

impl Chunker {
    /// Create a chunker. A `max_lines` of zero is treated as one.
    #[must_use]
    pub fn new(rule: HeadingRule, max_lines: usize) -> Self {
        Self {
            rule,
            max_lines: max_lines.max(1),
        }
    }

    #[must_use]
    pub fn rule(&self) -> HeadingRule {
        self.rule
    }

    #[must_use]
    pub fn max_lines(&self) -> usize {
        self.max_lines
    }

    /// Chunk a full document.
    ///
    /// Chunk ids are assigned in parse order and chunk lines ascend
    /// strictly. Whitespace-only spans never produce a chunk.
    #[must_use]
    pub fn chunk(&self, text: &str) -> Vec<DocumentChunk> {
        let mut state = ScanState::new();

        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            if let Some(title) = self.rule.heading_text(line) {
                state.flush();
                if !title.is_empty() {
                    state.section = title.to_string();
                }
            }
            state.push(line_no, line);
            if state.buffer.len() >= self.max_lines {
                state.flush();
            }
        }
        state.flush();

        state.chunks
    }
}

struct ScanState<'a> {
    chunks: Vec<DocumentChunk>,
    section: String,
    buffer: Vec<&'a str>,
    start: usize,
}

impl<'a> ScanState<'a> {
    fn new() -> Self {
        Self {
            chunks: Vec::new(),
            section: DEFAULT_SECTION.to_string(),
            buffer: Vec::new(),
            start: 1,
        }
    }

    fn push(&mut self, line_no: usize, line: &'a str) {
        if self.buffer.is_empty() {
            self.start = line_no;
        }
        self.buffer.push(line);
    }

    fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let joined = self.buffer.join("\n");
        let content = joined.trim();
        if !content.is_empty() {
            let leading_blank = self
                .buffer
                .iter()
                .take_while(|l| l.trim().is_empty())
                .count();
            self.chunks.push(DocumentChunk {
                id: self.chunks.len(),
                section: self.section.clone(),
                line: self.start + leading_blank,
                content: content.to_string(),
            });
        }
        self.buffer.clear();
    }
}

/// Chunk `text` with the default rule and line limit.
#[must_use]
pub fn chunk_document(text: &str) -> Vec<DocumentChunk> {
    Chunker::default().chunk(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SCENARIO: &str = "# Intro\nHello world\n## Details\nMore text\n";

    #[test]
    fn any_level_splits_on_every_heading() {
        let chunks = chunk_document(SCENARIO);
        assert_eq!(
            chunks,
            vec![
                DocumentChunk {
                    id: 0,
                    section: "Intro".to_string(),
                    line: 1,
                    content: "# Intro\nHello world".to_string(),
                },
                DocumentChunk {
                    id: 1,
                    section: "Details".to_string(),
                    line: 3,
                    content: "## Details\nMore text".to_string(),
                },
            ]
        );
    }

    #[test]
    fn top_level_ignores_nested_headings() {
        let chunks = Chunker::new(HeadingRule::TopLevel, 500).chunk(SCENARIO);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].section, "Intro");
        assert_eq!(
            chunks[0].content,
            "# Intro\nHello world\n## Details\nMore text"
        );
    }

    #[test]
    fn empty_document_yields_no_chunks() {
        assert!(chunk_document("").is_empty());
        assert!(chunk_document("\n\n   \n").is_empty());
    }

    #[test]
    fn content_before_first_heading_is_overview() {
        let chunks = chunk_document("preamble\n\n# First\nbody\n");
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].section, DEFAULT_SECTION);
        assert_eq!(chunks[0].content, "preamble");
        assert_eq!(chunks[1].section, "First");
        assert_eq!(chunks[1].line, 3);
    }

    #[test]
    fn line_points_at_first_non_blank_line() {
        let chunks = chunk_document("\n\n  text here\n");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].line, 3);
        assert_eq!(chunks[0].content, "text here");
    }

    #[test]
    fn heading_requires_space_after_markers() {
        let rule = HeadingRule::AnyLevel;
        assert_eq!(rule.heading_text("## Tools"), Some("Tools"));
        assert_eq!(rule.heading_text("#Tools"), None);
        assert_eq!(rule.heading_text("#hashtag"), None);
        assert_eq!(rule.heading_text(" # indented"), None);
        assert_eq!(HeadingRule::TopLevel.heading_text("## Tools"), None);
        assert_eq!(HeadingRule::TopLevel.heading_text("# Tools  "), Some("Tools"));
    }

    #[test]
    fn oversized_section_splits_and_keeps_label() {
        let mut doc = String::from("# Big\n");
        for i in 0..9 {
            doc.push_str(&format!("line {i}\n"));
        }
        // 10 lines total with max 4 -> 4 + 4 + 2
        let chunks = Chunker::new(HeadingRule::AnyLevel, 4).chunk(&doc);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.section == "Big"));
        assert_eq!(chunks[0].line, 1);
        assert_eq!(chunks[1].line, 5);
        assert_eq!(chunks[1].content, "line 3\nline 4\nline 5\nline 6");
        assert_eq!(chunks[2].line, 9);
    }

    #[test]
    fn span_of_exactly_max_lines_is_not_split() {
        let doc = "# A\none\ntwo\n# B\nthree\n";
        let chunks = Chunker::new(HeadingRule::AnyLevel, 3).chunk(doc);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].content, "# A\none\ntwo");
        assert_eq!(chunks[1].content, "# B\nthree");
    }

    #[test]
    fn default_limit_is_five_hundred_lines() {
        let body: String = (0..1000).map(|i| format!("row {i}\n")).collect();
        let chunks = chunk_document(&body);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].line_count(), 500);
        assert_eq!(chunks[1].line, 501);
    }

    #[test]
    fn heading_rule_parses_from_str() {
        assert_eq!("any-level".parse::<HeadingRule>().unwrap(), HeadingRule::AnyLevel);
        assert_eq!("top-level".parse::<HeadingRule>().unwrap(), HeadingRule::TopLevel);
        assert!("h7".parse::<HeadingRule>().is_err());
        assert_eq!(HeadingRule::TopLevel.to_string(), "top-level");
    }

    fn doc_line() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-z ]{0,12}",
            "#{1,3} [A-Za-z]{1,8}",
            Just(String::new()),
            Just("   ".to_string()),
        ]
    }

    fn document() -> impl Strategy<Value = String> {
        prop::collection::vec(doc_line(), 0..60).prop_map(|lines| lines.join("\n"))
    }

    fn rule() -> impl Strategy<Value = HeadingRule> {
        prop_oneof![Just(HeadingRule::AnyLevel), Just(HeadingRule::TopLevel)]
    }

    proptest! {
        #[test]
        fn chunks_cover_every_non_blank_line_once(doc in document(), rule in rule(), max in 1usize..12) {
            let chunks = Chunker::new(rule, max).chunk(&doc);
            let expected: Vec<&str> = doc
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .collect();
            let actual: Vec<&str> = chunks
                .iter()
                .flat_map(|c| c.content.lines())
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .collect();
            prop_assert_eq!(actual, expected);
        }

        #[test]
        fn chunks_respect_line_limit(doc in document(), rule in rule(), max in 1usize..12) {
            for chunk in Chunker::new(rule, max).chunk(&doc) {
                prop_assert!(chunk.line_count() <= max);
            }
        }

        #[test]
        fn ids_contiguous_and_lines_ascending(doc in document(), rule in rule()) {
            let chunks = Chunker::new(rule, 7).chunk(&doc);
            for (i, chunk) in chunks.iter().enumerate() {
                prop_assert_eq!(chunk.id, i);
            }
            for pair in chunks.windows(2) {
                prop_assert!(pair[0].line < pair[1].line);
            }
        }

        #[test]
        fn documents_without_headings_are_overview(lines in prop::collection::vec("[a-z ]{0,12}", 0..40), max in 1usize..12) {
            let doc = lines.join("\n");
            for chunk in Chunker::new(HeadingRule::AnyLevel, max).chunk(&doc) {
                prop_assert_eq!(chunk.section.as_str(), DEFAULT_SECTION);
            }
        }
    }
}
