//! Substitution engine
//!
//! Resolves every placeholder of a [`Document`] and splices the resolved
//! values into a copy of its text.
//!
//! Values resolve with the following precedence:
//!
//! 1. the runtime value supplied for the variable name
//! 2. the `value` embedded in the placeholder
//! 3. the `defaultValue` embedded in the placeholder
//!
//! A placeholder with no value at any level is left in the output verbatim.

use crate::document::Document;
use crate::error::RenderError;
use crate::placeholder::PlaceholderDeclaration;
use crate::scanner::PlaceholderOccurrence;
use crate::value::TypedValue;
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;
use std::hash::BuildHasher;
use tracing::{debug, trace, warn};

/// Runtime values keyed by variable name, in insertion order
pub type RuntimeValues = IndexMap<String, TypedValue>;

/// Trait for supplying runtime values to the engine
pub trait ValueSource {
    /// Resolves a variable by name
    fn resolve(&self, name: &str) -> Option<TypedValue>;

    /// Returns true if the source has a value for `name`
    fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }
}

impl<S: BuildHasher> ValueSource for IndexMap<String, TypedValue, S> {
    fn resolve(&self, name: &str) -> Option<TypedValue> {
        self.get(name).cloned()
    }

    fn contains(&self, name: &str) -> bool {
        self.contains_key(name)
    }
}

impl<S: BuildHasher> ValueSource for HashMap<String, TypedValue, S> {
    fn resolve(&self, name: &str) -> Option<TypedValue> {
        self.get(name).cloned()
    }

    fn contains(&self, name: &str) -> bool {
        self.contains_key(name)
    }
}

/// Value source that tries multiple sources in order
#[derive(Default)]
pub struct ChainedValueSource {
    sources: Vec<Box<dyn ValueSource>>,
}

impl ChainedValueSource {
    /// Creates a new, empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a source to the end of the chain
    pub fn add_source(&mut self, source: Box<dyn ValueSource>) {
        self.sources.push(source);
    }

    /// Creates a chain from a vector of sources
    pub fn from_sources(sources: Vec<Box<dyn ValueSource>>) -> Self {
        Self { sources }
    }
}

impl ValueSource for ChainedValueSource {
    fn resolve(&self, name: &str) -> Option<TypedValue> {
        self.sources.iter().find_map(|source| source.resolve(name))
    }

    fn contains(&self, name: &str) -> bool {
        self.sources.iter().any(|source| source.contains(name))
    }
}

/// Configuration options for rendering
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    /// Fail when a placeholder has neither an embedded `value` nor a runtime value
    pub strict: bool,
}

impl RenderConfig {
    /// Creates a new render configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets strict rendering
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// Engine substituting resolved values into document text
#[derive(Debug, Clone, Default)]
pub struct SubstitutionEngine {
    config: RenderConfig,
}

impl SubstitutionEngine {
    /// Creates an engine with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Renders `document` with `values`
    ///
    /// The document itself is not touched: substitution runs over a private
    /// copy of its occurrences whose offsets are shifted as earlier
    /// replacements grow or shrink the text. Nothing is returned unless every
    /// placeholder passes its type check.
    pub fn render<S: ValueSource + ?Sized>(
        &self,
        document: &Document,
        values: &S,
    ) -> Result<String, RenderError> {
        debug!(
            occurrences = document.occurrences().len(),
            strict = self.config.strict,
            "rendering document"
        );

        if self.config.strict {
            require_values(document.occurrences(), values)?;
        }

        let mut pending = document.occurrences().to_vec();
        let mut output = document.text().to_string();

        for index in 0..pending.len() {
            let occurrence = &pending[index];
            let Some(value) = resolve(&occurrence.declaration, values) else {
                debug!(
                    variable = occurrence.name(),
                    offset = occurrence.offset,
                    "leaving unresolved placeholder in place"
                );
                continue;
            };

            if !occurrence.declaration.matches_type(&value) {
                return Err(RenderError::TypeMismatch {
                    name: occurrence.name().to_string(),
                    expected: occurrence.declaration.value_type,
                    value,
                });
            }

            let offset = occurrence.offset;
            let matched = output
                .get(offset..)
                .and_then(|after| document.scanner().envelope_at_start(after));
            debug_assert!(
                matched.is_some(),
                "no placeholder for `{}` at shifted offset {}",
                occurrence.name(),
                offset
            );
            let Some(matched) = matched else {
                warn!(
                    variable = occurrence.name(),
                    offset, "no placeholder at shifted offset"
                );
                continue;
            };

            let replacement = value.to_string();
            let delta = replacement.len() as isize - matched as isize;
            trace!(variable = occurrence.name(), offset, delta, "substituting");

            output.replace_range(offset..offset + matched, &replacement);

            for later in &mut pending[index + 1..] {
                later.offset = later.offset.saturating_add_signed(delta);
            }
        }

        Ok(output)
    }
}

/// Renders `document` with the default engine
pub fn render<S: ValueSource + ?Sized>(
    document: &Document,
    values: &S,
    strict: bool,
) -> Result<String, RenderError> {
    SubstitutionEngine::with_config(RenderConfig::new().with_strict(strict)).render(document, values)
}

/// Picks the value for one placeholder by precedence
fn resolve<S: ValueSource + ?Sized>(
    declaration: &PlaceholderDeclaration,
    values: &S,
) -> Option<TypedValue> {
    values
        .resolve(&declaration.name)
        .or_else(|| declaration.value.clone())
        .or_else(|| declaration.default_value.clone())
}

/// Fails with the names of placeholders that have neither an embedded
/// `value` nor a runtime value. Embedded defaults do not count.
fn require_values<S: ValueSource + ?Sized>(
    occurrences: &[PlaceholderOccurrence],
    values: &S,
) -> Result<(), RenderError> {
    let missing: IndexSet<&str> = occurrences
        .iter()
        .filter(|occ| occ.declaration.value.is_none() && !values.contains(occ.name()))
        .map(|occ| occ.name())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(RenderError::MissingVariables {
            names: missing.into_iter().map(str::to_string).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placeholder::ParserConfig;
    use crate::scanner::ScannerConfig;
    use crate::value::ValueType;

    const TITLE_DOC: &str = "# Title\n${{name: 'x', type: STRING, defaultValue: 'hi'}}";

    fn values<const N: usize>(pairs: [(&str, TypedValue); N]) -> RuntimeValues {
        pairs
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }

    #[test]
    fn test_render_uses_default_then_runtime_value() {
        let doc = Document::load(TITLE_DOC).unwrap();
        assert_eq!(render(&doc, &RuntimeValues::new(), false).unwrap(), "# Title\nhi");
        assert_eq!(
            render(&doc, &values([("x", TypedValue::from("bye"))]), false).unwrap(),
            "# Title\nbye"
        );
    }

    #[test]
    fn test_embedded_value_beats_default() {
        let doc =
            Document::load("${{name: a, type: NUMBER, value: 0, defaultValue: 7}}!").unwrap();
        assert_eq!(render(&doc, &RuntimeValues::new(), false).unwrap(), "0!");
    }

    #[test]
    fn test_placeholder_free_text_is_unchanged() {
        let text = "# Plain\n\nNothing to see { here } $ {{ }}";
        let doc = Document::load(text).unwrap();
        assert_eq!(render(&doc, &RuntimeValues::new(), true).unwrap(), text);
    }

    #[test]
    fn test_offsets_shift_for_shorter_and_longer_replacements() {
        let text = "A ${{name: first, type: STRING, value: 'x'}} B\n\
                    C ${{name: second, type: STRING, value: 'y'}} D\n\
                    E ${{name: third, type: NUMBER, value: 3}} F";
        let doc = Document::load(text).unwrap();

        assert_eq!(
            render(&doc, &RuntimeValues::new(), false).unwrap(),
            "A x B\nC y D\nE 3 F"
        );

        let long = "a considerably longer replacement than the placeholder it replaces, honestly";
        assert_eq!(
            render(&doc, &values([("first", TypedValue::from(long))]), false).unwrap(),
            format!("A {} B\nC y D\nE 3 F", long)
        );
    }

    #[test]
    fn test_shifted_offsets_land_on_each_placeholder() {
        let text = "${{name: a, type: STRING, value: 'x'}}\n\
                    ü ${{name: b, type: STRING, value: 'y'}}\n\
                    ${{name: c, type: STRING, value: 'z'}}";
        let doc = Document::load(text).unwrap();
        let runtime = values([
            ("a", TypedValue::from("${{name: fake, value: 1}}")),
            ("b", TypedValue::from("ñandú")),
        ]);

        assert_eq!(
            render(&doc, &runtime, false).unwrap(),
            "${{name: fake, value: 1}}\nü ñandú\nz"
        );
    }

    #[test]
    fn test_repeated_variable_gets_same_value() {
        let text = "${{name: who, type: STRING, defaultValue: 'you'}} and\n\
                    ${{name: who, type: STRING, defaultValue: 'you'}} again";
        let doc = Document::load(text).unwrap();
        assert_eq!(
            render(&doc, &values([("who", TypedValue::from("me"))]), false).unwrap(),
            "me and\nme again"
        );
    }

    #[test]
    fn test_runtime_type_mismatch_aborts() {
        let doc = Document::load(TITLE_DOC).unwrap();
        let err = render(&doc, &values([("x", TypedValue::Boolean(false))]), false).unwrap_err();
        assert_eq!(err.to_string(), "Cannot assign false to variable x");
        assert_eq!(
            err,
            RenderError::TypeMismatch {
                name: "x".to_string(),
                expected: ValueType::String,
                value: TypedValue::Boolean(false),
            }
        );
    }

    #[test]
    fn test_strict_requires_value_or_runtime_value() {
        let text = "${{name: a, type: STRING, defaultValue: 'd'}}\n\
                    ${{name: b, type: STRING, value: 'v'}}\n\
                    ${{name: c, type: NUMBER, defaultValue: 1}}\n\
                    ${{name: a, type: STRING, defaultValue: 'd'}}";
        let doc = Document::load(text).unwrap();

        let err = render(&doc, &RuntimeValues::new(), true).unwrap_err();
        assert_eq!(
            err,
            RenderError::MissingVariables {
                names: vec!["a".to_string(), "c".to_string()],
            }
        );

        let supplied = values([("a", TypedValue::from("A")), ("c", TypedValue::from(2_i32))]);
        assert_eq!(render(&doc, &supplied, true).unwrap(), "A\nv\n2\nA");

        // non-strict falls back to defaults
        assert_eq!(render(&doc, &RuntimeValues::new(), false).unwrap(), "d\nv\n1\nd");
    }

    #[test]
    fn test_strict_counts_falsy_embedded_values() {
        let doc = Document::load("${{name: e, type: STRING, value: ''}}|").unwrap();
        assert_eq!(render(&doc, &RuntimeValues::new(), true).unwrap(), "|");
    }

    #[test]
    fn test_unresolved_placeholder_left_verbatim() {
        let placeholder = "${{name: n, type: NUMBER, value: 'nope'}}";
        let text = format!("{}\n${{{{name: m, type: NUMBER, value: 5}}}}", placeholder);
        let doc = Document::with_config(
            text,
            ScannerConfig::default(),
            ParserConfig::new().with_lenient_literals(true),
        )
        .unwrap();

        assert_eq!(
            render(&doc, &RuntimeValues::new(), false).unwrap(),
            format!("{}\n5", placeholder)
        );
        assert!(matches!(
            render(&doc, &RuntimeValues::new(), true),
            Err(RenderError::MissingVariables { .. })
        ));
    }

    #[test]
    fn test_document_is_not_modified() {
        let doc = Document::load(TITLE_DOC).unwrap();
        let before = doc.occurrences().to_vec();
        render(&doc, &values([("x", TypedValue::from("a much longer value"))]), false).unwrap();
        assert_eq!(doc.occurrences(), before.as_slice());
        assert_eq!(doc.text(), TITLE_DOC);
    }

    #[test]
    fn test_chained_sources() {
        let mut primary = HashMap::new();
        primary.insert("x".to_string(), TypedValue::from("first"));
        let fallback = values([
            ("x", TypedValue::from("second")),
            ("y", TypedValue::from(2_i32)),
        ]);

        let sources: Vec<Box<dyn ValueSource>> = vec![Box::new(primary), Box::new(fallback)];
        let chain = ChainedValueSource::from_sources(sources);
        assert_eq!(chain.resolve("x"), Some(TypedValue::from("first")));
        assert_eq!(chain.resolve("y"), Some(TypedValue::Number(2.0)));
        assert!(!chain.contains("z"));

        let doc = Document::load(TITLE_DOC).unwrap();
        let engine = SubstitutionEngine::new();
        assert_eq!(engine.render(&doc, &chain).unwrap(), "# Title\nfirst");
    }
}
