//! Schema analysis: from per-field annotations to [`SchemaMetadata`].
//!
//! The analyzer is a pure function over a record's [`RawField`] list. It
//! parses each annotation string, derives missing long names from field
//! identifiers, builds the long/short/env lookup maps and the ordered
//! positional list, and enforces the structural invariants (unique flag
//! names, `required` vs `default=` exclusivity, sequence fields positional,
//! at most one sequence positional).
//!
//! # Annotation grammar
//!
//! `short,long,description,token1|token2|...` — split on the first three
//! commas, so descriptions must not contain commas. Recognized tokens:
//! `required`, `hidden`, `positional`, `default=<literal>`, `env=<VAR>`,
//! `choices=<v1>;<v2>;...`. An empty short part means no short flag; an empty
//! long part derives the long name from the identifier (underscores become
//! hyphens); an empty `default=` literal counts as no default.
//!
//! # Examples
//!
//! ```
//! use command_bind_core::{analyze, RawField, ValueKind};
//!
//! let schema = analyze(&[
//!     RawField {
//!         ident: "name",
//!         kind: ValueKind::Text,
//!         annotation: "n,name,Name to greet,required",
//!     },
//!     RawField {
//!         ident: "max_width",
//!         kind: ValueKind::Int,
//!         annotation: ",,Column limit,default=80",
//!     },
//! ])
//! .unwrap();
//!
//! assert_eq!(schema.fields.len(), 2);
//! assert_eq!(schema.long("max-width").unwrap().ident, "max_width");
//! assert_eq!(schema.short('n').unwrap().long, "name");
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::record::{Bindable, RawField};
use crate::value::ValueKind;

/// Description of one bindable field's command-line surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    /// Record field identifier.
    pub ident: String,
    /// Declared value kind.
    pub kind: ValueKind,
    /// Single-character short flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short: Option<char>,
    /// Long flag name; derived from the identifier when not annotated.
    pub long: String,
    /// One-line description for help output.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Must be non-zero after binding.
    pub required: bool,
    /// Default literal applied to fields still at their zero value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Allowed values; empty means unconstrained.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
    /// Environment variable feeding the overlay layer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,
    /// Bound from the positional token list instead of a flag.
    pub positional: bool,
    /// Omitted from help output.
    pub hidden: bool,
}

/// Warnings surfaced at analysis time without failing the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SchemaWarning {
    /// A scalar positional declared after a sequence positional; the sequence
    /// consumes every remaining token, so this field can never receive one.
    UnreachablePositional {
        /// Identifier of the unreachable field.
        ident: String,
    },
}

impl fmt::Display for SchemaWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaWarning::UnreachablePositional { ident } => write!(
                f,
                "positional field '{ident}' follows a sequence positional and can never receive a token"
            ),
        }
    }
}

/// Analyzer-time schema errors. Fatal at command-registration time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Two fields declare the same short flag.
    #[error("duplicate short flag '-{short}' on field '{field}'")]
    DuplicateShort { short: char, field: String },
    /// Two fields declare (or derive) the same long flag.
    #[error("duplicate long flag '--{long}' on field '{field}'")]
    DuplicateLong { long: String, field: String },
    /// `required` and `default=` on the same field.
    #[error("field '{0}' cannot be both required and carry a default")]
    RequiredWithDefault(String),
    /// A sequence-kind field without the `positional` token.
    #[error("sequence field '{0}' must be declared positional")]
    SequenceNotPositional(String),
    /// A second sequence-kind positional; the first consumes every token.
    #[error("field '{0}' declares a second sequence positional")]
    SecondSequencePositional(String),
    /// A boolean default literal other than `true`/`false`.
    #[error("boolean field '{field}' has invalid default '{default}': expected 'true' or 'false'")]
    BadBoolDefault { field: String, default: String },
    /// The short part of an annotation holds more than one character.
    #[error("short flag on field '{field}' must be a single character, got '{short}'")]
    MultiCharShort { field: String, short: String },
    /// An annotation token outside the recognized set.
    #[error("unknown annotation token '{token}' on field '{field}'")]
    UnknownToken { token: String, field: String },
}

/// Analyzed schema: field specs in declaration order plus lookup tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaMetadata {
    /// Field specifications in declaration order.
    pub fields: Vec<FieldSpec>,
    /// Long flag name → index into `fields`.
    pub by_long: HashMap<String, usize>,
    /// Short flag character → index into `fields`.
    pub by_short: HashMap<char, usize>,
    /// Environment variable name → index into `fields`.
    pub by_env: HashMap<String, usize>,
    /// Indices of positional fields, in declaration order.
    pub positional: Vec<usize>,
    /// Warnings collected during analysis.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<SchemaWarning>,
}

impl SchemaMetadata {
    /// Looks a field up by long flag name.
    pub fn long(&self, name: &str) -> Option<&FieldSpec> {
        self.by_long.get(name).map(|&index| &self.fields[index])
    }

    /// Looks a field up by short flag character.
    pub fn short(&self, flag: char) -> Option<&FieldSpec> {
        self.by_short.get(&flag).map(|&index| &self.fields[index])
    }

    /// Positional fields in declaration order.
    pub fn positional_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.positional.iter().map(|&index| &self.fields[index])
    }

    /// Non-positional fields in declaration order.
    pub fn flag_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|spec| !spec.positional)
    }
}

/// Analyzes a record type's raw field list into [`SchemaMetadata`].
///
/// Pure function: same input, same output, no side effects. Errors are
/// reported in declaration order, first problem wins.
pub fn analyze(raw_fields: &[RawField]) -> Result<SchemaMetadata, SchemaError> {
    let mut fields: Vec<FieldSpec> = Vec::with_capacity(raw_fields.len());
    let mut by_long = HashMap::new();
    let mut by_short = HashMap::new();
    let mut by_env = HashMap::new();
    let mut positional = Vec::new();
    let mut warnings = Vec::new();
    let mut sequence_seen = false;

    for raw in raw_fields {
        let spec = parse_field(raw)?;
        let index = fields.len();

        if let Some(short) = spec.short {
            if by_short.insert(short, index).is_some() {
                return Err(SchemaError::DuplicateShort {
                    short,
                    field: spec.ident,
                });
            }
        }
        if by_long.insert(spec.long.clone(), index).is_some() {
            return Err(SchemaError::DuplicateLong {
                long: spec.long,
                field: spec.ident,
            });
        }
        if let Some(var) = &spec.env {
            by_env.insert(var.clone(), index);
        }
        if spec.positional {
            if spec.kind == ValueKind::TextSeq {
                if sequence_seen {
                    return Err(SchemaError::SecondSequencePositional(spec.ident));
                }
                sequence_seen = true;
            } else if sequence_seen {
                warnings.push(SchemaWarning::UnreachablePositional {
                    ident: spec.ident.clone(),
                });
            }
            positional.push(index);
        }
        fields.push(spec);
    }

    Ok(SchemaMetadata {
        fields,
        by_long,
        by_short,
        by_env,
        positional,
        warnings,
    })
}

/// Analyzes a [`Bindable`] record type.
///
/// # Examples
///
/// ```
/// use command_bind_core::{schema_of, Bindable};
///
/// #[derive(Default, Bindable)]
/// struct ListArgs {
///     #[bind("f,format,Output format,choices=json;yaml;table|default=table")]
///     format: String,
/// }
///
/// let schema = schema_of::<ListArgs>().unwrap();
/// assert_eq!(schema.long("format").unwrap().choices.len(), 3);
/// ```
pub fn schema_of<T: Bindable>() -> Result<SchemaMetadata, SchemaError> {
    analyze(T::raw_fields())
}

fn parse_field(raw: &RawField) -> Result<FieldSpec, SchemaError> {
    let mut parts = raw.annotation.splitn(4, ',');
    let short_part = parts.next().unwrap_or("").trim();
    let long_part = parts.next().unwrap_or("").trim();
    let description = parts.next().unwrap_or("").trim();
    let tokens_part = parts.next().unwrap_or("").trim();

    let mut shorts = short_part.chars();
    let short = match (shorts.next(), shorts.next()) {
        (None, _) => None,
        (Some(c), None) => Some(c),
        (Some(_), Some(_)) => {
            return Err(SchemaError::MultiCharShort {
                field: raw.ident.to_string(),
                short: short_part.to_string(),
            });
        }
    };

    let long = if long_part.is_empty() {
        raw.ident.replace('_', "-")
    } else {
        long_part.to_string()
    };

    let mut required = false;
    let mut hidden = false;
    let mut positional = false;
    let mut default = None;
    let mut env = None;
    let mut choices = Vec::new();

    for token in tokens_part.split('|') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        if token == "required" {
            required = true;
        } else if token == "hidden" {
            hidden = true;
        } else if token == "positional" {
            positional = true;
        } else if let Some(literal) = token.strip_prefix("default=") {
            if !literal.is_empty() {
                default = Some(literal.to_string());
            }
        } else if let Some(var) = token.strip_prefix("env=") {
            if !var.is_empty() {
                env = Some(var.to_string());
            }
        } else if let Some(list) = token.strip_prefix("choices=") {
            choices = list
                .split(';')
                .map(str::trim)
                .filter(|choice| !choice.is_empty())
                .map(String::from)
                .collect();
        } else {
            return Err(SchemaError::UnknownToken {
                token: token.to_string(),
                field: raw.ident.to_string(),
            });
        }
    }

    if required && default.is_some() {
        return Err(SchemaError::RequiredWithDefault(raw.ident.to_string()));
    }
    if raw.kind == ValueKind::TextSeq && !positional {
        return Err(SchemaError::SequenceNotPositional(raw.ident.to_string()));
    }
    if raw.kind == ValueKind::Bool {
        if let Some(literal) = &default {
            if literal != "true" && literal != "false" {
                return Err(SchemaError::BadBoolDefault {
                    field: raw.ident.to_string(),
                    default: literal.clone(),
                });
            }
        }
    }

    Ok(FieldSpec {
        ident: raw.ident.to_string(),
        kind: raw.kind,
        short,
        long,
        description: description.to_string(),
        required,
        default,
        choices,
        env,
        positional,
        hidden,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(ident: &'static str, kind: ValueKind, annotation: &'static str) -> RawField {
        RawField {
            ident,
            kind,
            annotation,
        }
    }

    #[test]
    fn test_analyze_full_annotation() {
        let schema = analyze(&[field(
            "format",
            ValueKind::Text,
            "f,format,Output format,default=table|env=APP_FORMAT|choices=json;yaml;table|hidden",
        )])
        .expect("valid annotation");

        let spec = &schema.fields[0];
        assert_eq!(spec.short, Some('f'));
        assert_eq!(spec.long, "format");
        assert_eq!(spec.description, "Output format");
        assert_eq!(spec.default.as_deref(), Some("table"));
        assert_eq!(spec.env.as_deref(), Some("APP_FORMAT"));
        assert_eq!(spec.choices, vec!["json", "yaml", "table"]);
        assert!(spec.hidden);
        assert!(!spec.required);
        assert_eq!(schema.by_env.get("APP_FORMAT"), Some(&0));
    }

    #[test]
    fn test_analyze_derives_long_name_from_ident() {
        let schema = analyze(&[field("max_line_width", ValueKind::Int, "")]).expect("valid");
        assert_eq!(schema.fields[0].long, "max-line-width");
        assert!(schema.long("max-line-width").is_some());
        assert_eq!(schema.fields[0].short, None);
    }

    #[test]
    fn test_analyze_ignores_empty_tokens() {
        let schema =
            analyze(&[field("tags", ValueKind::TextSeq, ",,Tags,positional||")]).expect("valid");
        assert!(schema.fields[0].positional);
        assert_eq!(schema.positional, vec![0]);
    }

    #[test]
    fn test_empty_default_counts_as_no_default() {
        let schema = analyze(&[field("name", ValueKind::Text, ",,,default=")]).expect("valid");
        assert_eq!(schema.fields[0].default, None);
    }

    #[test]
    fn test_duplicate_short_rejected() {
        let result = analyze(&[
            field("verbose", ValueKind::Bool, "v,verbose,,"),
            field("version", ValueKind::Bool, "v,version,,"),
        ]);
        assert_eq!(
            result,
            Err(SchemaError::DuplicateShort {
                short: 'v',
                field: "version".to_string(),
            })
        );
    }

    #[test]
    fn test_duplicate_long_rejected() {
        let result = analyze(&[
            field("output", ValueKind::Text, ",out,,"),
            field("outfile", ValueKind::Text, ",out,,"),
        ]);
        assert_eq!(
            result,
            Err(SchemaError::DuplicateLong {
                long: "out".to_string(),
                field: "outfile".to_string(),
            })
        );
    }

    #[test]
    fn test_required_with_default_rejected() {
        let result = analyze(&[field(
            "name",
            ValueKind::Text,
            ",,Name,required|default=ann",
        )]);
        assert_eq!(
            result,
            Err(SchemaError::RequiredWithDefault("name".to_string()))
        );
    }

    #[test]
    fn test_sequence_must_be_positional() {
        let result = analyze(&[field("tags", ValueKind::TextSeq, ",,Tags,")]);
        assert_eq!(
            result,
            Err(SchemaError::SequenceNotPositional("tags".to_string()))
        );
    }

    #[test]
    fn test_second_sequence_positional_rejected() {
        let result = analyze(&[
            field("sources", ValueKind::TextSeq, ",,With,positional"),
            field("sinks", ValueKind::TextSeq, ",,And,positional"),
        ]);
        assert_eq!(
            result,
            Err(SchemaError::SecondSequencePositional("sinks".to_string()))
        );
    }

    #[test]
    fn test_scalar_positional_after_sequence_warns() {
        let schema = analyze(&[
            field("sources", ValueKind::TextSeq, ",,Inputs,positional"),
            field("dest", ValueKind::Text, ",,Output,positional"),
        ])
        .expect("warning, not error");
        assert_eq!(
            schema.warnings,
            vec![SchemaWarning::UnreachablePositional {
                ident: "dest".to_string(),
            }]
        );
        assert_eq!(schema.positional, vec![0, 1]);
    }

    #[test]
    fn test_bad_boolean_default_rejected() {
        let result = analyze(&[field("pin", ValueKind::Bool, ",,Pin,default=yes")]);
        assert_eq!(
            result,
            Err(SchemaError::BadBoolDefault {
                field: "pin".to_string(),
                default: "yes".to_string(),
            })
        );
    }

    #[test]
    fn test_multi_character_short_rejected() {
        let result = analyze(&[field("verbose", ValueKind::Bool, "vv,verbose,,")]);
        assert_eq!(
            result,
            Err(SchemaError::MultiCharShort {
                field: "verbose".to_string(),
                short: "vv".to_string(),
            })
        );
    }

    #[test]
    fn test_unknown_annotation_token_rejected() {
        let result = analyze(&[field("name", ValueKind::Text, ",,Name,mandatory")]);
        assert_eq!(
            result,
            Err(SchemaError::UnknownToken {
                token: "mandatory".to_string(),
                field: "name".to_string(),
            })
        );
    }

    #[test]
    fn test_analysis_is_pure() {
        let raw = [
            field("name", ValueKind::Text, "n,name,Name,required"),
            field("tags", ValueKind::TextSeq, ",,Tags,positional"),
        ];
        assert_eq!(analyze(&raw), analyze(&raw));
    }
}
