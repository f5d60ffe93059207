//! Placeholder parser
//!
//! Turns one `${{ key: value, ... }}` expression into a typed
//! [`PlaceholderDeclaration`] and writes declarations back out.
//!
//! Properties are separated by plain commas; a comma inside a quoted
//! string value splits the property list just like any other comma.

use crate::error::PlaceholderError;
use crate::value::{self, TypedValue, ValueType};
use serde::Serialize;
use smallvec::SmallVec;
use std::sync::LazyLock;
use tracing::debug;

use regex::Regex;

/// Opening marker of a placeholder
pub const OPEN_MARKER: &str = "${{";
/// Closing marker of a placeholder
pub const CLOSE_MARKER: &str = "}}";

static ENVELOPE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{\{.+\}\}").unwrap());

static PROPERTY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([a-zA-Z][a-zA-Z0-9]*)\s*:\s*(\S.*?)\s*$").unwrap()
});

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9]*$").unwrap());

/// Key naming the variable
pub const NAME_KEY: &str = "name";
/// Key declaring the value type
pub const TYPE_KEY: &str = "type";
/// Key embedding the current value
pub const VALUE_KEY: &str = "value";
/// Key embedding the fallback value
pub const DEFAULT_VALUE_KEY: &str = "defaultValue";

/// A single `key: value` property of a placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

/// Property list of one placeholder. Placeholders rarely carry more than the
/// four recognized keys, so the list stays inline.
pub type PropertyList<'a> = SmallVec<[Property<'a>; 4]>;

/// Parses one `key: value` segment
///
/// The key must be an identifier followed by a colon; the value runs to the
/// end of the segment with surrounding whitespace trimmed.
pub fn parse_property(segment: &str) -> Result<Property<'_>, PlaceholderError> {
    let malformed = || PlaceholderError::MalformedProperty {
        segment: segment.to_string(),
    };
    let caps = PROPERTY.captures(segment).ok_or_else(malformed)?;
    match (caps.get(1), caps.get(2)) {
        (Some(key), Some(value)) => Ok(Property {
            key: key.as_str(),
            value: value.as_str(),
        }),
        _ => Err(malformed()),
    }
}

/// Returns true if `text` contains a placeholder envelope
pub fn contains_placeholder(text: &str) -> bool {
    ENVELOPE.is_match(text)
}

/// Configuration options for the placeholder parser
#[derive(Debug, Clone, Default)]
pub struct ParserConfig {
    /// Drop embedded literals that fail type validation instead of failing
    pub lenient_literals: bool,
}

impl ParserConfig {
    /// Creates a new parser configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether invalid embedded literals are dropped rather than rejected
    pub fn with_lenient_literals(mut self, lenient: bool) -> Self {
        self.lenient_literals = lenient;
        self
    }
}

/// Parsed, typed form of a placeholder
///
/// Serializes as `{name, type, value, defaultValue}`, the plain data a
/// display component receives.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceholderDeclaration {
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    pub value: Option<TypedValue>,
    pub default_value: Option<TypedValue>,
}

impl PlaceholderDeclaration {
    /// Parses a placeholder with the default parser configuration
    pub fn deserialize(raw: &str) -> Result<Self, PlaceholderError> {
        Self::deserialize_with_config(raw, &ParserConfig::default())
    }

    /// Parses a placeholder
    ///
    /// `raw` must contain a `${{...}}` envelope; the three leading and two
    /// trailing characters are taken to be the markers.
    pub fn deserialize_with_config(
        raw: &str,
        config: &ParserConfig,
    ) -> Result<Self, PlaceholderError> {
        if !contains_placeholder(raw) {
            return Err(PlaceholderError::NotAPlaceholder {
                text: raw.to_string(),
            });
        }

        let inner = raw
            .len()
            .checked_sub(CLOSE_MARKER.len())
            .and_then(|end| raw.get(OPEN_MARKER.len()..end))
            .ok_or_else(|| PlaceholderError::NotAPlaceholder {
                text: raw.to_string(),
            })?;

        let properties = inner
            .split(',')
            .map(parse_property)
            .collect::<Result<PropertyList<'_>, _>>()?;

        // first occurrence of a key wins
        let find = |key: &str| {
            properties
                .iter()
                .find(|prop| prop.key == key)
                .map(|prop| prop.value)
        };

        let name = find(NAME_KEY)
            .map(unquote)
            .ok_or_else(|| PlaceholderError::MissingName {
                text: raw.to_string(),
            })?;
        if !IDENTIFIER.is_match(name) {
            return Err(PlaceholderError::InvalidName {
                name: name.to_string(),
            });
        }

        let value_type = match find(TYPE_KEY) {
            Some(tag) => tag
                .parse::<ValueType>()
                .map_err(|type_name| PlaceholderError::UnknownType { type_name })?,
            None => ValueType::Unknown,
        };

        let value_literal = find(VALUE_KEY);
        let default_literal = find(DEFAULT_VALUE_KEY);
        if value_literal.is_none() && default_literal.is_none() {
            return Err(PlaceholderError::MissingValue {
                text: raw.to_string(),
            });
        }

        let typed = |literal: Option<&str>| -> Result<Option<TypedValue>, PlaceholderError> {
            let Some(literal) = literal else {
                return Ok(None);
            };
            let validation = value::validate(value_type, literal);
            if !validation.valid {
                if config.lenient_literals {
                    debug!(
                        variable = name,
                        expected = %value_type,
                        actual = %validation.detected,
                        "dropping literal that does not match declared type"
                    );
                    return Ok(None);
                }
                return Err(PlaceholderError::TypeMismatch {
                    name: name.to_string(),
                    expected: value_type,
                    actual: validation.detected,
                });
            }
            Ok(value::convert(value_type, literal))
        };

        Ok(Self {
            name: name.to_string(),
            value_type,
            value: typed(value_literal)?,
            default_value: typed(default_literal)?,
        })
    }

    /// Writes the declaration back as placeholder text
    ///
    /// Absent `value`/`defaultValue` keys are omitted; present ones are
    /// always written, including `''`, `0` and `false`.
    pub fn serialize(&self) -> String {
        let mut properties = vec![
            format!("{}: {}", NAME_KEY, self.name),
            format!("{}: {}", TYPE_KEY, self.value_type),
        ];
        if let Some(value) = &self.value {
            properties.push(format!("{}: {}", VALUE_KEY, value.to_literal()));
        }
        if let Some(default_value) = &self.default_value {
            properties.push(format!(
                "{}: {}",
                DEFAULT_VALUE_KEY,
                default_value.to_literal()
            ));
        }
        format!("{}{}{}", OPEN_MARKER, properties.join(", "), CLOSE_MARKER)
    }

    /// Returns true if a runtime value may be assigned to this placeholder
    ///
    /// No coercion happens across types. `UNKNOWN` placeholders accept any value.
    pub fn matches_type(&self, candidate: &TypedValue) -> bool {
        match self.value_type {
            ValueType::String => matches!(candidate, TypedValue::String(_)),
            ValueType::Number => matches!(candidate, TypedValue::Number(_)),
            ValueType::Boolean => matches!(candidate, TypedValue::Boolean(_)),
            ValueType::Null => matches!(candidate, TypedValue::Null),
            ValueType::Unknown => true,
        }
    }

    /// Returns the embedded value, or the default when none is embedded
    pub fn display_value(&self) -> Option<&TypedValue> {
        self.value.as_ref().or(self.default_value.as_ref())
    }
}

impl std::str::FromStr for PlaceholderDeclaration {
    type Err = PlaceholderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::deserialize(s)
    }
}

/// Strips one layer of single quotes
fn unquote(text: &str) -> &str {
    text.strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
        .unwrap_or(text)
}
