//! Binding: raw tokenized values → typed record fields.
//!
//! The binder walks the schema in declaration order, never the value map,
//! so conversion errors and default application are deterministic for a
//! fixed schema and input. Three operations compose the layering chain:
//!
//! - [`bind_values`] assigns a flag-value map (CLI, environment overlay, or
//!   config-file layer) into a record, looking each field up by long name
//!   with a short-name fallback.
//! - [`bind_positionals`] walks positional fields against the token list; a
//!   sequence field greedily consumes every remaining token.
//! - [`apply_defaults`] parses default literals into fields still at their
//!   kind's zero value. Runs last, after all explicit layers.
//!
//! [`bind`] is the single-layer convenience: tokenize, bind, apply defaults,
//! validate.

use std::collections::HashMap;

use tracing::debug;

use crate::error::Result;
use crate::record::{Bindable, SetError};
use crate::schema::{FieldSpec, SchemaMetadata};
use crate::tokenize::{TokenizedArgs, tokenize};
use crate::validate::validate;
use crate::value::{ConversionError, FieldValue, ValueKind, coerce};

/// Assigns flag values into `record`, field by field in declaration order.
///
/// Each field is looked up in `values` by long name, then by its short flag
/// spelled as a one-character key. Keys that resolve to no field are skipped
/// silently (the tokenizer has already validated CLI flag names; injected
/// maps such as config-file layers may carry keys for other commands).
pub fn bind_values<T: Bindable>(
    record: &mut T,
    values: &HashMap<String, FieldValue>,
    schema: &SchemaMetadata,
) -> std::result::Result<(), ConversionError> {
    let mut consumed = 0;

    for spec in &schema.fields {
        let value = values.get(&spec.long).or_else(|| {
            spec.short
                .and_then(|short| values.get(short.to_string().as_str()))
        });
        let Some(value) = value else { continue };
        consumed += 1;
        let value = coerce(&spec.long, spec.kind, value.clone())?;
        assign(record, spec, value)?;
    }

    if consumed < values.len() {
        let mut skipped: Vec<&str> = values
            .keys()
            .map(String::as_str)
            .filter(|key| schema.long(key).is_none())
            .collect();
        skipped.sort_unstable();
        debug!(keys = ?skipped, "skipping values that match no schema field");
    }

    Ok(())
}

/// Walks positional fields in declaration order against the token list.
///
/// A sequence field consumes every remaining token and binding stops; any
/// positional field declared after it stays unset. A scalar field consumes
/// exactly one token when one is available. Surplus tokens remain unbound.
pub fn bind_positionals<T: Bindable>(
    record: &mut T,
    tokens: &[String],
    schema: &SchemaMetadata,
) -> std::result::Result<(), ConversionError> {
    let mut index = 0;

    for spec in schema.positional_fields() {
        if spec.kind == ValueKind::TextSeq {
            let rest = tokens[index..].to_vec();
            assign(record, spec, FieldValue::TextSeq(rest))?;
            break;
        }
        let Some(token) = tokens.get(index) else {
            break;
        };
        let value = spec.kind.parse(&spec.long, token)?;
        assign(record, spec, value)?;
        index += 1;
    }

    Ok(())
}

/// Parses default literals into fields still at their kind's zero value.
///
/// An explicitly supplied value equal to the zero value is indistinguishable
/// from "not supplied" and receives the default; that is a documented
/// limitation of zero-value layering.
pub fn apply_defaults<T: Bindable>(
    record: &mut T,
    schema: &SchemaMetadata,
) -> std::result::Result<(), ConversionError> {
    for spec in &schema.fields {
        let Some(literal) = &spec.default else {
            continue;
        };
        let current = record
            .get(&spec.ident)
            .ok_or_else(|| ConversionError::UnknownField(spec.ident.clone()))?;
        if !current.is_zero() {
            continue;
        }
        let value = spec.kind.parse(&spec.long, literal)?;
        assign(record, spec, value)?;
    }

    Ok(())
}

/// Binds one tokenized argument vector: flag values, then positional tokens.
///
/// Defaults are not applied here; in the layered pipeline they run after the
/// precedence merge. Use [`apply_defaults`] or [`bind`] for a single layer.
pub fn bind_args<T: Bindable>(
    record: &mut T,
    args: &TokenizedArgs,
    schema: &SchemaMetadata,
) -> std::result::Result<(), ConversionError> {
    bind_values(record, &args.values, schema)?;
    bind_positionals(record, &args.positionals, schema)
}

/// Tokenizes and binds a single argument vector, applying defaults and
/// validating the result.
///
/// This is the whole pipeline for callers without config-file or environment
/// layers.
///
/// # Examples
///
/// ```
/// use command_bind_core::{bind, schema_of, Bindable};
///
/// #[derive(Debug, Default, Bindable)]
/// struct GreetArgs {
///     #[bind("n,name,Name to greet,required")]
///     name: String,
///     #[bind("c,count,Repetitions,default=1")]
///     count: i64,
/// }
///
/// let schema = schema_of::<GreetArgs>().unwrap();
/// let args: Vec<String> = vec!["--name".into(), "Ann".into()];
/// let greet: GreetArgs = bind(&args, &schema).unwrap();
///
/// assert_eq!(greet.name, "Ann");
/// assert_eq!(greet.count, 1);
/// ```
pub fn bind<T: Bindable>(args: &[String], schema: &SchemaMetadata) -> Result<T> {
    let tokens = tokenize(args, schema)?;
    let mut record = T::default();
    bind_args(&mut record, &tokens, schema)?;
    apply_defaults(&mut record, schema)?;
    validate(&record, schema)?;
    Ok(record)
}

fn assign<T: Bindable>(
    record: &mut T,
    spec: &FieldSpec,
    value: FieldValue,
) -> std::result::Result<(), ConversionError> {
    let rendered = value.to_string();
    let found = value.kind().name();
    match record.set(&spec.ident, value) {
        Ok(()) => Ok(()),
        Err(SetError::UnknownField) => Err(ConversionError::UnknownField(spec.ident.clone())),
        Err(SetError::KindMismatch) => Err(ConversionError::KindMismatch {
            field: spec.long.clone(),
            expected: spec.kind.name(),
            found,
        }),
        Err(SetError::OutOfRange) => Err(ConversionError::OutOfRange {
            field: spec.long.clone(),
            value: rendered,
        }),
    }
}
