//! Document model
//!
//! A [`Document`] pairs template text with the placeholders scanned out of
//! it. The text is never modified; loading new text rescans it and replaces
//! the occurrence list wholesale.

use crate::error::{Result, Span, TemplateError};
use crate::placeholder::{ParserConfig, PlaceholderDeclaration};
use crate::render::{RenderConfig, SubstitutionEngine, ValueSource};
use crate::scanner::{PlaceholderOccurrence, PlaceholderScanner, ScannerConfig};
use indexmap::IndexSet;
use tracing::debug;

/// Template text plus its placeholder occurrences in left-to-right order
#[derive(Debug, Clone, Default)]
pub struct Document {
    text: String,
    occurrences: Vec<PlaceholderOccurrence>,
    scanner: PlaceholderScanner,
}

impl Document {
    /// Loads `text` with the default scanner and parser configuration
    ///
    /// An empty string is a valid document with no placeholders.
    pub fn load(text: impl Into<String>) -> Result<Self> {
        Self::with_config(text, ScannerConfig::default(), ParserConfig::default())
    }

    /// Loads `text` with explicit scanner and parser configuration
    pub fn with_config(
        text: impl Into<String>,
        scanner_config: ScannerConfig,
        parser_config: ParserConfig,
    ) -> Result<Self> {
        let mut document = Self {
            text: String::new(),
            occurrences: Vec::new(),
            scanner: PlaceholderScanner::with_config(scanner_config, parser_config),
        };
        document.load_text(text)?;
        Ok(document)
    }

    /// Replaces the document text and rescans it
    ///
    /// On error the document keeps its previous text and occurrences.
    pub fn load_text(&mut self, text: impl Into<String>) -> Result<()> {
        let text = text.into();
        let occurrences = self.scanner.scan(&text)?;
        debug!(
            occurrences = occurrences.len(),
            bytes = text.len(),
            "loaded document"
        );
        self.text = text;
        self.occurrences = occurrences;
        Ok(())
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn occurrences(&self) -> &[PlaceholderOccurrence] {
        &self.occurrences
    }

    pub fn scanner(&self) -> &PlaceholderScanner {
        &self.scanner
    }

    /// Returns the first occurrence of the variable `name`
    pub fn occurrence_by_name(&self, name: &str) -> Option<&PlaceholderOccurrence> {
        self.occurrences.iter().find(|occ| occ.name() == name)
    }

    /// Returns the variable names in first-seen order, without duplicates
    pub fn names(&self) -> IndexSet<&str> {
        self.occurrences.iter().map(|occ| occ.name()).collect()
    }

    /// Returns the declarations of all occurrences
    pub fn declarations(&self) -> impl Iterator<Item = &PlaceholderDeclaration> {
        self.occurrences.iter().map(|occ| &occ.declaration)
    }

    /// Scans `fragment` and keeps the placeholders naming a variable that
    /// this document also declares
    ///
    /// Offsets in the result are relative to `fragment`.
    pub fn find_occurrences_by_name_in(
        &self,
        fragment: &str,
    ) -> Result<Vec<PlaceholderOccurrence>> {
        let known = self.names();
        let found = self.scanner.scan(fragment)?;
        Ok(found
            .into_iter()
            .filter(|occ| known.contains(occ.name()))
            .collect())
    }

    /// Line and column span of an occurrence of this document
    pub fn span_of(&self, occurrence: &PlaceholderOccurrence) -> Span {
        Span::covering(&self.text, occurrence.offset, occurrence.length)
    }

    /// Renders the document with the given runtime values
    pub fn render<S: ValueSource + ?Sized>(&self, values: &S, strict: bool) -> Result<String> {
        let engine = SubstitutionEngine::with_config(RenderConfig::new().with_strict(strict));
        Ok(engine.render(self, values)?)
    }
}

impl TryFrom<Option<String>> for Document {
    type Error = TemplateError;

    fn try_from(text: Option<String>) -> Result<Self> {
        match text {
            Some(text) => Self::load(text),
            None => Err(TemplateError::Argument(
                "Document::load() cannot be called without text".to_string(),
            )),
        }
    }
}
