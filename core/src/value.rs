//! Kind-erased field values and scalar conversion.
//!
//! [`FieldValue`] is the currency of the binding pipeline: tokenized flag
//! values, environment overlays, config-file layers, and record field access
//! all traffic in it. Every kind has a zero value, which the precedence merge
//! and default application treat as "unset".

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// The value kinds a bindable field may declare.
///
/// # Examples
///
/// ```
/// use command_bind_core::{FieldValue, ValueKind};
///
/// assert_eq!(ValueKind::Int.zero(), FieldValue::Int(0));
/// assert_eq!(ValueKind::Bool.name(), "boolean");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// UTF-8 text.
    Text,
    /// Boolean switch.
    Bool,
    /// Signed integer, carried as `i64`.
    Int,
    /// Floating-point number, carried as `f64`.
    Float,
    /// Ordered list of text tokens; only valid for positional fields.
    TextSeq,
}

impl ValueKind {
    /// Returns the zero value for this kind.
    pub fn zero(self) -> FieldValue {
        match self {
            ValueKind::Text => FieldValue::Text(String::new()),
            ValueKind::Bool => FieldValue::Bool(false),
            ValueKind::Int => FieldValue::Int(0),
            ValueKind::Float => FieldValue::Float(0.0),
            ValueKind::TextSeq => FieldValue::TextSeq(Vec::new()),
        }
    }

    /// Human-readable kind name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Text => "text",
            ValueKind::Bool => "boolean",
            ValueKind::Int => "integer",
            ValueKind::Float => "float",
            ValueKind::TextSeq => "text sequence",
        }
    }

    /// Parses a raw string into a value of this kind.
    ///
    /// `field` names the destination field in error messages. Text passes
    /// through verbatim; a text sequence cannot be produced from a single
    /// string and is rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_bind_core::{FieldValue, ValueKind};
    ///
    /// assert_eq!(ValueKind::Int.parse("count", "42"), Ok(FieldValue::Int(42)));
    /// assert!(ValueKind::Bool.parse("pin", "yes").is_err());
    /// ```
    pub fn parse(self, field: &str, raw: &str) -> Result<FieldValue, ConversionError> {
        match self {
            ValueKind::Text => Ok(FieldValue::Text(raw.to_string())),
            ValueKind::Bool => raw
                .parse::<bool>()
                .map(FieldValue::Bool)
                .map_err(|_| self.invalid(field, raw)),
            ValueKind::Int => raw.parse::<i64>().map(FieldValue::Int).map_err(|e| {
                use std::num::IntErrorKind;
                match e.kind() {
                    IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                        ConversionError::OutOfRange {
                            field: field.to_string(),
                            value: raw.to_string(),
                        }
                    }
                    _ => self.invalid(field, raw),
                }
            }),
            ValueKind::Float => raw
                .parse::<f64>()
                .map(FieldValue::Float)
                .map_err(|_| self.invalid(field, raw)),
            ValueKind::TextSeq => Err(self.invalid(field, raw)),
        }
    }

    fn invalid(self, field: &str, raw: &str) -> ConversionError {
        ConversionError::InvalidValue {
            field: field.to_string(),
            value: raw.to_string(),
            expected: self.name(),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed field value with the kind erased into an enum.
///
/// # Examples
///
/// ```
/// use command_bind_core::{FieldValue, ValueKind};
///
/// let value = FieldValue::Text("ann".into());
/// assert_eq!(value.kind(), ValueKind::Text);
/// assert!(!value.is_zero());
/// assert!(FieldValue::Int(0).is_zero());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValue {
    /// UTF-8 text.
    Text(String),
    /// Boolean switch.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating-point number.
    Float(f64),
    /// Ordered list of text tokens.
    TextSeq(Vec<String>),
}

impl FieldValue {
    /// Returns the kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            FieldValue::Text(_) => ValueKind::Text,
            FieldValue::Bool(_) => ValueKind::Bool,
            FieldValue::Int(_) => ValueKind::Int,
            FieldValue::Float(_) => ValueKind::Float,
            FieldValue::TextSeq(_) => ValueKind::TextSeq,
        }
    }

    /// Whether this value equals its kind's zero value.
    pub fn is_zero(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Bool(b) => !b,
            FieldValue::Int(n) => *n == 0,
            FieldValue::Float(x) => *x == 0.0,
            FieldValue::TextSeq(items) => items.is_empty(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Int(n) => write!(f, "{n}"),
            FieldValue::Float(x) => write!(f, "{x}"),
            FieldValue::TextSeq(items) => f.write_str(&items.join(" ")),
        }
    }
}

/// Coerces an already-typed value into the declared kind of `field`.
///
/// Matching kinds pass through untouched. Text is parsed per kind, the way
/// the tokenizer's raw strings arrive. An integer offered to a float field is
/// widened losslessly, so config files may write `3` for a float. Every other
/// cross-kind offer is an error.
///
/// # Examples
///
/// ```
/// use command_bind_core::{coerce, FieldValue, ValueKind};
///
/// let widened = coerce("ratio", ValueKind::Float, FieldValue::Int(3));
/// assert_eq!(widened, Ok(FieldValue::Float(3.0)));
///
/// let parsed = coerce("count", ValueKind::Int, FieldValue::Text("7".into()));
/// assert_eq!(parsed, Ok(FieldValue::Int(7)));
/// ```
pub fn coerce(
    field: &str,
    kind: ValueKind,
    value: FieldValue,
) -> Result<FieldValue, ConversionError> {
    if value.kind() == kind {
        return Ok(value);
    }
    match (value, kind) {
        (FieldValue::Text(raw), _) => kind.parse(field, &raw),
        (FieldValue::Int(n), ValueKind::Float) => Ok(FieldValue::Float(n as f64)),
        (other, _) => Err(ConversionError::KindMismatch {
            field: field.to_string(),
            expected: kind.name(),
            found: other.kind().name(),
        }),
    }
}

/// Errors produced while converting raw values into a field's declared kind.
///
/// Every variant names the destination field so messages stay actionable
/// without additional context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The raw text cannot be parsed into the declared kind.
    #[error("invalid value '{value}' for field '{field}': expected {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: &'static str,
    },
    /// The value parses but does not fit the destination type.
    #[error("value '{value}' is out of range for field '{field}'")]
    OutOfRange { field: String, value: String },
    /// A typed value of an incompatible kind was offered to the field.
    #[error("field '{field}' expects {expected}, got {found}")]
    KindMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
    /// The record implementation does not expose the field.
    #[error("record exposes no field named '{0}'")]
    UnknownField(String),
}
