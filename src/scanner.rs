//! Placeholder scanner
//!
//! Finds every `${{...}}` envelope in a text and parses each match into a
//! located [`PlaceholderOccurrence`]. Envelopes never span lines.
//!
//! Scanning is a pure function of its input: every call starts a fresh
//! search, so scanning the same text twice yields the same occurrences.

use crate::error::{Position, TemplateError};
use crate::placeholder::{ParserConfig, PlaceholderDeclaration};
use regex::Regex;
use std::sync::LazyLock;
use tracing::trace;

static GREEDY_ENVELOPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{\{.+\}\}").unwrap());

static LAZY_ENVELOPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{\{.+?\}\}").unwrap());

/// Configuration options for the scanner
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Let an envelope run to the last `}}` on its line
    ///
    /// With greedy matching two placeholders on the same line are read as a
    /// single envelope. Lazy matching stops at the first `}}` instead, which
    /// in turn forbids `}}` inside string values.
    pub greedy: bool,
}

impl ScannerConfig {
    /// Creates a new scanner configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets greedy or lazy envelope matching
    pub fn with_greedy(mut self, greedy: bool) -> Self {
        self.greedy = greedy;
        self
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self { greedy: true }
    }
}

/// A parsed placeholder together with where it was found
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderOccurrence {
    pub declaration: PlaceholderDeclaration,
    /// Byte offset of the opening marker
    pub offset: usize,
    /// Byte length of the whole placeholder text
    pub length: usize,
}

impl PlaceholderOccurrence {
    /// Name of the variable this occurrence refers to
    pub fn name(&self) -> &str {
        &self.declaration.name
    }

    /// Byte offset just past the closing marker
    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// Scanner producing placeholder occurrences from text
#[derive(Debug, Clone, Default)]
pub struct PlaceholderScanner {
    config: ScannerConfig,
    parser_config: ParserConfig,
}

impl PlaceholderScanner {
    /// Creates a scanner with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scanner with the given scanner and parser configuration
    pub fn with_config(config: ScannerConfig, parser_config: ParserConfig) -> Self {
        Self {
            config,
            parser_config,
        }
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    pub fn parser_config(&self) -> &ParserConfig {
        &self.parser_config
    }

    fn envelope(&self) -> &'static Regex {
        if self.config.greedy {
            &*GREEDY_ENVELOPE
        } else {
            &*LAZY_ENVELOPE
        }
    }

    /// Returns the byte length of the envelope starting exactly at the
    /// beginning of `text`, if there is one
    pub fn envelope_at_start(&self, text: &str) -> Option<usize> {
        self.envelope()
            .find(text)
            .filter(|m| m.start() == 0)
            .map(|m| m.end())
    }

    /// Counts envelope matches without parsing them
    pub fn count_matches(&self, text: &str) -> usize {
        self.envelope().find_iter(text).count()
    }

    /// Scans `text` for placeholders in left-to-right order
    ///
    /// Every envelope match must parse; the first one that does not aborts
    /// the scan with its position in `text`.
    pub fn scan(&self, text: &str) -> Result<Vec<PlaceholderOccurrence>, TemplateError> {
        self.envelope()
            .find_iter(text)
            .map(|m| {
                trace!(offset = m.start(), length = m.len(), "matched placeholder");
                PlaceholderDeclaration::deserialize_with_config(m.as_str(), &self.parser_config)
                    .map(|declaration| PlaceholderOccurrence {
                        declaration,
                        offset: m.start(),
                        length: m.len(),
                    })
                    .map_err(|source| TemplateError::Scan {
                        position: Position::at_offset(text, m.start()),
                        source,
                    })
            })
            .collect()
    }
}

/// Scans `text` with the default configuration
pub fn scan(text: &str) -> Result<Vec<PlaceholderOccurrence>, TemplateError> {
    PlaceholderScanner::new().scan(text)
}
