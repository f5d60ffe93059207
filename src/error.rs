//! Error types and position tracking for placeholder templates
//!
//! Errors are layered the same way the pipeline is: [`PlaceholderError`] for
//! a single `${{...}}` expression, [`RenderError`] for a substitution pass,
//! and [`TemplateError`] tying both to a document.

use crate::value::{TypedValue, ValueType};
use std::fmt;
use thiserror::Error;

/// Represents a position in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based, in characters)
    pub column: usize,
    /// Byte offset from start of input (0-based)
    pub offset: usize,
}

impl Position {
    /// Creates a new position at the start of input
    pub fn new() -> Self {
        Self {
            line: 1,
            column: 1,
            offset: 0,
        }
    }

    /// Computes the position of a byte offset inside `text`
    ///
    /// Offsets past the end of `text` clamp to the end.
    pub fn at_offset(text: &str, offset: usize) -> Self {
        let mut pos = Self::new();
        for c in text.chars() {
            if pos.offset >= offset {
                break;
            }
            pos.advance(c);
        }
        pos
    }

    /// Advances the position by one character
    pub fn advance(&mut self, c: char) {
        match c {
            '\n' => {
                self.line += 1;
                self.column = 1;
            }
            '\r' => {
                self.column = 1;
            }
            _ => {
                self.column += 1;
            }
        }
        self.offset += c.len_utf8();
    }

    /// Advances the position by multiple characters
    pub fn advance_by(&mut self, text: &str) {
        for c in text.chars() {
            self.advance(c);
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Represents a span of text in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Start position of the span
    pub start: Position,
    /// End position of the span
    pub end: Position,
}

impl Span {
    /// Creates a new span from start and end positions
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Creates the span covering `text[offset..offset + length]`
    pub fn covering(text: &str, offset: usize, length: usize) -> Self {
        let start = Position::at_offset(text, offset);
        let mut end = start;
        if let Some(matched) = text.get(offset..offset + length) {
            end.advance_by(matched);
        }
        Self { start, end }
    }

    /// Returns the length of the span in bytes
    pub fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }

    /// Returns true if the span is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(
                f,
                "{}:{}-{}",
                self.start.line, self.start.column, self.end.column
            )
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Main error type for template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    /// An entry point received no text where text was required
    #[error("{0}")]
    Argument(String),

    /// A placeholder found while scanning a document failed to parse
    #[error("Invalid placeholder at {position}: {source}")]
    Scan {
        position: Position,
        #[source]
        source: PlaceholderError,
    },

    /// A standalone placeholder failed to parse
    #[error(transparent)]
    Placeholder(#[from] PlaceholderError),

    /// A substitution pass failed
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl TemplateError {
    /// Returns the underlying placeholder error, located or not
    pub fn placeholder_error(&self) -> Option<&PlaceholderError> {
        match self {
            TemplateError::Scan { source, .. } => Some(source),
            TemplateError::Placeholder(error) => Some(error),
            _ => None,
        }
    }
}

/// Errors raised while parsing a single placeholder expression
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaceholderError {
    /// The text does not contain a `${{...}}` envelope
    #[error("{text} is not a placeholder")]
    NotAPlaceholder { text: String },

    /// A property segment is not of the form `key: value`
    #[error("{segment} is not a placeholder property")]
    MalformedProperty { segment: String },

    /// The property list has no `name` key
    #[error("{text} does not have a name")]
    MissingName { text: String },

    /// The `name` value is not an identifier
    #[error("`{name}` is not a valid variable name")]
    InvalidName { name: String },

    /// The `type` value is not a known type tag
    #[error("Placeholder type {type_name} does not exist")]
    UnknownType { type_name: String },

    /// Neither `value` nor `defaultValue` is present
    #[error("{text} does not have a value or a defaultValue")]
    MissingValue { text: String },

    /// An embedded literal does not conform to the declared type
    #[error("`{name}` is a `{expected}`, `{actual}` given")]
    TypeMismatch {
        name: String,
        expected: ValueType,
        actual: ValueType,
    },
}

impl PlaceholderError {
    /// Returns true for errors about the shape of the text rather than its content
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            PlaceholderError::NotAPlaceholder { .. }
                | PlaceholderError::MalformedProperty { .. }
                | PlaceholderError::MissingName { .. }
                | PlaceholderError::InvalidName { .. }
        )
    }
}

/// Errors raised while substituting values into a document
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    /// Strict rendering found variables with no value to substitute
    #[error("Variables in template without value: {}", .names.join(","))]
    MissingVariables { names: Vec<String> },

    /// A resolved value does not conform to the declared type
    #[error("Cannot assign {value} to variable {name}")]
    TypeMismatch {
        name: String,
        expected: ValueType,
        value: TypedValue,
    },
}

/// Result type for template operations
pub type Result<T> = std::result::Result<T, TemplateError>;
