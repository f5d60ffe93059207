//! # Mark Template
//!
//! Typed placeholders for Markdown and other plain text templates.
//!
//! ## Overview
//!
//! A template is ordinary text with embedded placeholder expressions:
//!
//! ```text
//! Dear ${{name: client, type: STRING, defaultValue: 'customer'}},
//! your balance is ${{name: balance, type: NUMBER, value: 0}}.
//! ```
//!
//! Each placeholder names a variable, declares its type and carries an
//! embedded `value`, a `defaultValue`, or both. Rendering replaces every
//! placeholder with the runtime value supplied for its name, falling back to
//! the embedded `value` and then to the `defaultValue`.
//!
//! ## Key Features
//!
//! - **Typed values**: `STRING`, `NUMBER`, `BOOLEAN`, `NULL` and untyped
//!   (`UNKNOWN`) placeholders, checked when parsed and when rendered
//! - **Precedence**: runtime value, then embedded `value`, then `defaultValue`
//! - **Strict rendering**: reject documents with variables left without a value
//! - **Round trips**: declarations serialize back to placeholder text
//! - **Serde integration**: runtime values load straight from JSON
//!
//! ## Basic Usage
//!
//! ```rust
//! use mark_template::{Document, RuntimeValues, TypedValue};
//!
//! let doc = Document::load("# Title\n${{name: 'x', type: STRING, defaultValue: 'hi'}}")?;
//! assert_eq!(doc.occurrences().len(), 1);
//! assert_eq!(doc.occurrences()[0].offset, 8);
//!
//! assert_eq!(doc.render(&RuntimeValues::new(), false)?, "# Title\nhi");
//!
//! let mut values = RuntimeValues::new();
//! values.insert("x".to_string(), TypedValue::from("bye"));
//! assert_eq!(doc.render(&values, false)?, "# Title\nbye");
//! # Ok::<(), mark_template::TemplateError>(())
//! ```
//!
//! ## Runtime Values from JSON
//!
//! ```rust
//! use mark_template::{render, Document, RuntimeValues};
//!
//! let doc = Document::load("Total: ${{name: total, type: NUMBER, defaultValue: 0}}")?;
//! let values: RuntimeValues = serde_json::from_str(r#"{ "total": 12.5 }"#).unwrap();
//! assert_eq!(render(&doc, &values, true)?, "Total: 12.5");
//! # Ok::<(), mark_template::TemplateError>(())
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use mark_template::{PlaceholderDeclaration, PlaceholderError, ValueType};
//!
//! let err = PlaceholderDeclaration::deserialize("${{type: NUMBER, name: v, defaultValue: '10'}}")
//!     .unwrap_err();
//! assert_eq!(
//!     err,
//!     PlaceholderError::TypeMismatch {
//!         name: "v".to_string(),
//!         expected: ValueType::Number,
//!         actual: ValueType::String,
//!     }
//! );
//! ```
//!
//! ## Grammar Notes
//!
//! - Type tags are uppercase and case-sensitive.
//! - Properties are split on every comma, including commas inside quoted
//!   strings, so string values cannot contain commas.
//! - A placeholder cannot span lines. By default an envelope runs to the last
//!   `}}` on its line; see [`ScannerConfig::with_greedy`].
//! - Offsets and lengths are byte offsets into the text.

pub mod document;
pub mod error;
pub mod placeholder;
pub mod render;
pub mod scanner;
pub mod value;

// Re-export main types and functions
pub use document::Document;
pub use error::{PlaceholderError, RenderError, Result, TemplateError};
pub use placeholder::{ParserConfig, PlaceholderDeclaration, Property, parse_property};
pub use render::{
    ChainedValueSource, RenderConfig, RuntimeValues, SubstitutionEngine, ValueSource, render,
};
pub use scanner::{PlaceholderOccurrence, PlaceholderScanner, ScannerConfig, scan};
pub use value::{TypedValue, ValueType};

// Re-export position types
pub use error::{Position, Span};
