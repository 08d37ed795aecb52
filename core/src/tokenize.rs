//! Flag tokenizing: raw argument vector → named values + positional tokens.
//!
//! The tokenizer is a state machine over token positions implementing the
//! POSIX/GNU surface: long flags as `--name value` / `--name=value` / bare
//! boolean `--name`, short flags as `-n value` with boolean bundling
//! (`-abc` ≡ `-a -b -c`), `--` as the end-of-flags marker, and bare `-` as a
//! positional token. It is strict: any leading-dash token that does not
//! resolve in the schema is a hard error, never silently dropped.
//!
//! Value flags are checked against the field's declared kind immediately so
//! unparseable input fails before any binding happens; the stored value stays
//! the raw string and conversion proper happens in the binder.

use std::collections::HashMap;

use thiserror::Error;

use crate::error::Result;
use crate::schema::SchemaMetadata;
use crate::value::{FieldValue, ValueKind};

/// Flag values and positional tokens produced by one tokenizing pass.
///
/// Values are keyed by long flag name regardless of how the flag was spelled
/// on the command line, so downstream lookups are long-name-only. Boolean
/// switches store a typed [`FieldValue::Bool`]; value flags store the raw
/// text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TokenizedArgs {
    /// Flag values keyed by long name.
    pub values: HashMap<String, FieldValue>,
    /// Positional tokens in the order they appeared.
    pub positionals: Vec<String>,
}

/// Tokenizer-time errors. Fatal to the current invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A `--name` token whose name is not in the schema.
    #[error("unknown flag: --{0}")]
    UnknownLong(String),
    /// A short flag character not in the schema.
    #[error("unknown flag: -{0}")]
    UnknownShort(char),
    /// A value flag at the end of the argument vector.
    #[error("flag {0} requires a value")]
    MissingValue(String),
    /// A value-taking short flag in a non-final bundle position.
    #[error("flag -{flag} takes a value and must be last in bundle '-{bundle}'")]
    BundledValueFlag { flag: char, bundle: String },
}

/// Tokenizes an argument vector against a schema's lookup tables.
///
/// Pure function: tokenizing the same vector twice yields equal
/// [`TokenizedArgs`].
///
/// # Examples
///
/// ```
/// use command_bind_core::{analyze, tokenize, FieldValue, RawField, ValueKind};
///
/// let schema = analyze(&[
///     RawField { ident: "verbose", kind: ValueKind::Bool, annotation: "v,verbose,," },
///     RawField { ident: "name", kind: ValueKind::Text, annotation: "n,name,," },
/// ])
/// .unwrap();
///
/// let args: Vec<String> = ["-v", "--name=Ann", "--", "-literal"]
///     .iter()
///     .map(|s| s.to_string())
///     .collect();
/// let tokens = tokenize(&args, &schema).unwrap();
///
/// assert_eq!(tokens.values["verbose"], FieldValue::Bool(true));
/// assert_eq!(tokens.values["name"], FieldValue::Text("Ann".into()));
/// assert_eq!(tokens.positionals, vec!["-literal"]);
/// ```
pub fn tokenize(args: &[String], schema: &SchemaMetadata) -> Result<TokenizedArgs> {
    let mut out = TokenizedArgs::default();
    let mut end_of_flags = false;
    let mut i = 0;

    while i < args.len() {
        let token = args[i].as_str();

        if end_of_flags || token == "-" || !token.starts_with('-') {
            out.positionals.push(token.to_string());
        } else if token == "--" {
            end_of_flags = true;
        } else if let Some(body) = token.strip_prefix("--") {
            i = tokenize_long(args, i, body, schema, &mut out)?;
        } else {
            // Single dash with at least one following character.
            let body = &token[1..];
            i = tokenize_bundle(args, i, body, schema, &mut out)?;
        }

        i += 1;
    }

    Ok(out)
}

fn tokenize_long(
    args: &[String],
    i: usize,
    body: &str,
    schema: &SchemaMetadata,
    out: &mut TokenizedArgs,
) -> Result<usize> {
    let (name, explicit) = match body.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (body, None),
    };
    let field = schema
        .long(name)
        .ok_or_else(|| ParseError::UnknownLong(name.to_string()))?;

    if field.kind == ValueKind::Bool {
        let value = match explicit {
            Some(literal) => field.kind.parse(&field.long, literal)?,
            None => FieldValue::Bool(true),
        };
        out.values.insert(field.long.clone(), value);
        return Ok(i);
    }

    let mut i = i;
    let raw = match explicit {
        Some(value) => value.to_string(),
        None => {
            i += 1;
            args.get(i)
                .cloned()
                .ok_or_else(|| ParseError::MissingValue(format!("--{name}")))?
        }
    };
    field.kind.parse(&field.long, &raw)?;
    out.values.insert(field.long.clone(), FieldValue::Text(raw));
    Ok(i)
}

fn tokenize_bundle(
    args: &[String],
    i: usize,
    bundle: &str,
    schema: &SchemaMetadata,
    out: &mut TokenizedArgs,
) -> Result<usize> {
    let chars: Vec<char> = bundle.chars().collect();
    let mut i = i;

    for (pos, &flag) in chars.iter().enumerate() {
        let field = schema.short(flag).ok_or(ParseError::UnknownShort(flag))?;

        if field.kind == ValueKind::Bool {
            out.values.insert(field.long.clone(), FieldValue::Bool(true));
            continue;
        }
        if pos + 1 != chars.len() {
            return Err(ParseError::BundledValueFlag {
                flag,
                bundle: bundle.to_string(),
            }
            .into());
        }

        i += 1;
        let raw = args
            .get(i)
            .cloned()
            .ok_or_else(|| ParseError::MissingValue(format!("-{flag}")))?;
        field.kind.parse(&field.long, &raw)?;
        out.values.insert(field.long.clone(), FieldValue::Text(raw));
    }

    Ok(i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::schema::analyze;
    use crate::record::RawField;

    fn schema() -> SchemaMetadata {
        analyze(&[
            RawField {
                ident: "verbose",
                kind: ValueKind::Bool,
                annotation: "v,verbose,,",
            },
            RawField {
                ident: "pin",
                kind: ValueKind::Bool,
                annotation: "p,pin,,",
            },
            RawField {
                ident: "all",
                kind: ValueKind::Bool,
                annotation: "a,all,,",
            },
            RawField {
                ident: "name",
                kind: ValueKind::Text,
                annotation: "n,name,,",
            },
            RawField {
                ident: "count",
                kind: ValueKind::Int,
                annotation: "c,count,,",
            },
        ])
        .expect("fixture schema is valid")
    }

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_long_flag_with_separate_value() {
        let tokens = tokenize(&args(&["--name", "Ann"]), &schema()).unwrap();
        assert_eq!(tokens.values["name"], FieldValue::Text("Ann".to_string()));
        assert!(tokens.positionals.is_empty());
    }

    #[test]
    fn test_equals_form_matches_separate_value_form() {
        let fixture = schema();
        let separate = tokenize(&args(&["--name", "Ann"]), &fixture).unwrap();
        let equals = tokenize(&args(&["--name=Ann"]), &fixture).unwrap();
        assert_eq!(separate, equals);
    }

    #[test]
    fn test_boolean_long_flag_records_true() {
        let tokens = tokenize(&args(&["--verbose"]), &schema()).unwrap();
        assert_eq!(tokens.values["verbose"], FieldValue::Bool(true));
    }

    #[test]
    fn test_boolean_long_flag_accepts_explicit_literal() {
        let tokens = tokenize(&args(&["--verbose=false"]), &schema()).unwrap();
        assert_eq!(tokens.values["verbose"], FieldValue::Bool(false));

        let err = tokenize(&args(&["--verbose=maybe"]), &schema()).unwrap_err();
        assert!(matches!(err, Error::Conversion(_)));
    }

    #[test]
    fn test_double_dash_ends_flag_parsing() {
        let tokens = tokenize(&args(&["--verbose", "--", "--name", "-v"]), &schema()).unwrap();
        assert_eq!(tokens.values["verbose"], FieldValue::Bool(true));
        assert_eq!(tokens.positionals, vec!["--name", "-v"]);
    }

    #[test]
    fn test_bare_dash_is_positional() {
        let tokens = tokenize(&args(&["-", "file"]), &schema()).unwrap();
        assert_eq!(tokens.positionals, vec!["-", "file"]);
        assert!(tokens.values.is_empty());
    }

    #[test]
    fn test_bundle_matches_separate_short_flags() {
        let fixture = schema();
        let bundled = tokenize(&args(&["-vpa"]), &fixture).unwrap();
        let separate = tokenize(&args(&["-v", "-p", "-a"]), &fixture).unwrap();
        assert_eq!(bundled, separate);
        assert_eq!(bundled.values.len(), 3);
    }

    #[test]
    fn test_bundle_trailing_value_flag_consumes_next_token() {
        let tokens = tokenize(&args(&["-vn", "Ann"]), &schema()).unwrap();
        assert_eq!(tokens.values["verbose"], FieldValue::Bool(true));
        assert_eq!(tokens.values["name"], FieldValue::Text("Ann".to_string()));
    }

    #[test]
    fn test_value_flag_must_be_last_in_bundle() {
        let err = tokenize(&args(&["-nv", "Ann"]), &schema()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "flag -n takes a value and must be last in bundle '-nv'"
        );
    }

    #[test]
    fn test_unknown_long_flag_message() {
        let err = tokenize(&args(&["--unknown"]), &schema()).unwrap_err();
        let Error::Parse(parse) = err else {
            panic!("expected a parse error");
        };
        assert_eq!(parse.to_string(), "unknown flag: --unknown");
    }

    #[test]
    fn test_unknown_short_flag_rejected() {
        let err = tokenize(&args(&["-vx"]), &schema()).unwrap_err();
        let Error::Parse(parse) = err else {
            panic!("expected a parse error");
        };
        assert_eq!(parse, ParseError::UnknownShort('x'));
    }

    #[test]
    fn test_missing_value_reported_for_both_spellings() {
        let long = tokenize(&args(&["--name"]), &schema()).unwrap_err();
        assert_eq!(long.to_string(), "flag --name requires a value");

        let short = tokenize(&args(&["-vn"]), &schema()).unwrap_err();
        assert_eq!(short.to_string(), "flag -n requires a value");
    }

    #[test]
    fn test_value_checked_against_kind_at_tokenize_time() {
        let err = tokenize(&args(&["--count", "seven"]), &schema()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value 'seven' for field 'count': expected integer"
        );
    }

    #[test]
    fn test_valid_value_stays_raw_text() {
        let tokens = tokenize(&args(&["--count", "7"]), &schema()).unwrap();
        assert_eq!(tokens.values["count"], FieldValue::Text("7".to_string()));
    }

    #[test]
    fn test_tokenizing_is_idempotent() {
        let fixture = schema();
        let vector = args(&["-vp", "--name=Ann", "rest", "--", "-x"]);
        assert_eq!(
            tokenize(&vector, &fixture).unwrap(),
            tokenize(&vector, &fixture).unwrap()
        );
    }

    #[test]
    fn test_value_from_short_flag_recorded_under_long_name() {
        let tokens = tokenize(&args(&["-c", "3"]), &schema()).unwrap();
        assert!(tokens.values.contains_key("count"));
        assert!(!tokens.values.contains_key("c"));
    }
}
