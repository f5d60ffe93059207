//! Typed value grammar for placeholder literals
//!
//! A placeholder declares one of the [`ValueType`] tags and embeds literals
//! written in a tiny grammar:
//!
//! | Type      | Literal                     |
//! |-----------|-----------------------------|
//! | `STRING`  | `'any text'` (may be `''`)  |
//! | `NUMBER`  | `10`, `-999.999`, `+3.5`    |
//! | `BOOLEAN` | `true` or `false`           |
//! | `NULL`    | `null`                      |
//! | `UNKNOWN` | anything, kept verbatim     |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

static STRING_LITERAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^'(.*)'$").unwrap());

static NUMBER_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d+(\.\d+)?$").unwrap());

static BOOLEAN_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(true|false)$").unwrap());

static NULL_LITERAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^null$").unwrap());

/// Static type tag declared by a placeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValueType {
    String,
    Number,
    Boolean,
    Null,
    /// No type declared; literals are accepted and kept as raw text
    #[default]
    Unknown,
}

impl ValueType {
    /// Concrete types in detection order
    pub const CONCRETE: [ValueType; 4] = [
        ValueType::String,
        ValueType::Number,
        ValueType::Boolean,
        ValueType::Null,
    ];

    /// Returns the tag as written in placeholder text
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::String => "STRING",
            ValueType::Number => "NUMBER",
            ValueType::Boolean => "BOOLEAN",
            ValueType::Null => "NULL",
            ValueType::Unknown => "UNKNOWN",
        }
    }

    /// Returns true if `literal` is written in this type's literal grammar
    pub fn accepts_literal(&self, literal: &str) -> bool {
        let literal = literal.trim();
        match self {
            ValueType::String => STRING_LITERAL.is_match(literal),
            ValueType::Number => parse_number(literal).is_some(),
            ValueType::Boolean => BOOLEAN_LITERAL.is_match(literal),
            ValueType::Null => NULL_LITERAL.is_match(literal),
            ValueType::Unknown => true,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = String;

    /// Parses a type tag. Tags are case-sensitive and uppercase.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STRING" => Ok(ValueType::String),
            "NUMBER" => Ok(ValueType::Number),
            "BOOLEAN" => Ok(ValueType::Boolean),
            "NULL" => Ok(ValueType::Null),
            "UNKNOWN" => Ok(ValueType::Unknown),
            other => Err(other.to_string()),
        }
    }
}

/// Outcome of validating a literal against a declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validation {
    /// Whether the literal conforms to the declared type
    pub valid: bool,
    /// The type the literal was recognized as
    pub detected: ValueType,
}

/// Validates `literal` against `declared`
///
/// A valid literal reports the declared type. An invalid one reports the
/// first other concrete type whose grammar it matches, or `UNKNOWN`.
pub fn validate(declared: ValueType, literal: &str) -> Validation {
    if declared.accepts_literal(literal) {
        return Validation {
            valid: true,
            detected: declared,
        };
    }

    let detected = ValueType::CONCRETE
        .into_iter()
        .filter(|ty| *ty != declared)
        .find(|ty| ty.accepts_literal(literal))
        .unwrap_or(ValueType::Unknown);

    Validation {
        valid: false,
        detected,
    }
}

/// Returns the first concrete type whose grammar `literal` matches
pub fn detect_type(literal: &str) -> ValueType {
    ValueType::CONCRETE
        .into_iter()
        .find(|ty| ty.accepts_literal(literal))
        .unwrap_or(ValueType::Unknown)
}

/// Parses a NUMBER literal, rejecting digits too large to be finite
fn parse_number(literal: &str) -> Option<f64> {
    if !NUMBER_LITERAL.is_match(literal) {
        return None;
    }
    literal.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Converts a literal already validated for `ty` into a typed value
///
/// Returns `None` when the literal does not belong to the type's grammar.
pub fn convert(ty: ValueType, literal: &str) -> Option<TypedValue> {
    let trimmed = literal.trim();
    match ty {
        ValueType::String => STRING_LITERAL
            .captures(trimmed)
            .and_then(|caps| caps.get(1))
            .map(|content| TypedValue::String(content.as_str().to_string())),
        ValueType::Number => parse_number(trimmed).map(TypedValue::Number),
        ValueType::Boolean => match trimmed {
            "true" => Some(TypedValue::Boolean(true)),
            "false" => Some(TypedValue::Boolean(false)),
            _ => None,
        },
        ValueType::Null if trimmed == "null" => Some(TypedValue::Null),
        ValueType::Unknown => Some(TypedValue::Unknown(trimmed.to_string())),
        _ => None,
    }
}

/// A value carried by a placeholder or supplied at render time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypedValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
    /// Raw literal of an untyped placeholder
    #[serde(skip_deserializing)]
    Unknown(String),
}

impl TypedValue {
    /// Returns the type tag this value carries
    pub fn value_type(&self) -> ValueType {
        match self {
            TypedValue::String(_) => ValueType::String,
            TypedValue::Number(_) => ValueType::Number,
            TypedValue::Boolean(_) => ValueType::Boolean,
            TypedValue::Null => ValueType::Null,
            TypedValue::Unknown(_) => ValueType::Unknown,
        }
    }

    /// Returns a reference to the string if this is a String variant
    pub fn as_str(&self) -> Option<&str> {
        if let TypedValue::String(s) = self {
            Some(s.as_str())
        } else {
            None
        }
    }

    /// Returns the number if this is a Number variant
    pub fn as_f64(&self) -> Option<f64> {
        if let TypedValue::Number(n) = self {
            Some(*n)
        } else {
            None
        }
    }

    /// Returns the boolean if this is a Boolean variant
    pub fn as_bool(&self) -> Option<bool> {
        if let TypedValue::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    /// Returns true if this is a Null variant
    pub fn is_null(&self) -> bool {
        matches!(self, TypedValue::Null)
    }

    /// Writes the value back in literal grammar; strings are re-quoted
    pub fn to_literal(&self) -> String {
        match self {
            TypedValue::String(s) => format!("'{}'", s),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::String(s) => f.write_str(s),
            TypedValue::Number(n) => write!(f, "{}", n),
            TypedValue::Boolean(b) => write!(f, "{}", b),
            TypedValue::Null => f.write_str("null"),
            TypedValue::Unknown(raw) => f.write_str(raw),
        }
    }
}

impl From<&str> for TypedValue {
    fn from(value: &str) -> Self {
        TypedValue::String(value.to_string())
    }
}

impl From<String> for TypedValue {
    fn from(value: String) -> Self {
        TypedValue::String(value)
    }
}

impl From<f64> for TypedValue {
    fn from(value: f64) -> Self {
        TypedValue::Number(value)
    }
}

impl From<i64> for TypedValue {
    fn from(value: i64) -> Self {
        TypedValue::Number(value as f64)
    }
}

impl From<i32> for TypedValue {
    fn from(value: i32) -> Self {
        TypedValue::Number(f64::from(value))
    }
}

impl From<bool> for TypedValue {
    fn from(value: bool) -> Self {
        TypedValue::Boolean(value)
    }
}

impl<T: Into<TypedValue>> From<Option<T>> for TypedValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(TypedValue::Null, Into::into)
    }
}
