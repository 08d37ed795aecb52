//! Merging two records of the same schema into one.
//!
//! Layered binding produces one record per source (environment, config
//! file, command line) and folds them together with [`merge_records`]: a
//! field the primary record already set keeps its value, a field still at
//! its kind's zero value is filled from the fallback. Chaining merges from
//! the strongest layer down realizes the precedence order: fill the CLI
//! record from the config-file record, after filling the config-file record
//! from the environment record.
//!
//! # Example
//!
//! ```
//! use command_bind_core::{merge_records, schema_of, Bindable};
//!
//! #[derive(Debug, Default, Bindable)]
//! struct Render {
//!     #[bind("w,width,Output width,")]
//!     width: i64,
//!     #[bind("t,theme,Color theme,")]
//!     theme: String,
//! }
//!
//! let schema = schema_of::<Render>().unwrap();
//! let mut cli = Render { width: 120, theme: String::new() };
//! let file = Render { width: 80, theme: "dark".into() };
//!
//! merge_records(&mut cli, &file, &schema).unwrap();
//! assert_eq!(cli.width, 120);
//! assert_eq!(cli.theme, "dark");
//! ```

use thiserror::Error;

use crate::record::{Bindable, SetError};
use crate::schema::SchemaMetadata;

/// Errors that can occur while merging two records.
#[derive(Debug, Error, PartialEq)]
pub enum MergeError {
    /// A schema field is missing from the record implementation.
    #[error("field '{0}' is missing from the record")]
    MissingField(String),
    /// The record implementation rejected a value of its own declared kind.
    #[error("field '{0}' rejected a value of its declared kind")]
    KindMismatch(String),
}

/// Fills every zero-valued field of `primary` from `fallback`.
///
/// Fields are visited in schema declaration order. A field `primary`
/// already set keeps its value; a field at its kind's zero value takes the
/// fallback value when that one is non-zero. A zero value on both sides is
/// left alone for default application to handle.
pub fn merge_records<T: Bindable>(
    primary: &mut T,
    fallback: &T,
    schema: &SchemaMetadata,
) -> Result<(), MergeError> {
    for spec in &schema.fields {
        let current = primary
            .get(&spec.ident)
            .ok_or_else(|| MergeError::MissingField(spec.ident.clone()))?;
        if !current.is_zero() {
            continue;
        }
        let value = fallback
            .get(&spec.ident)
            .ok_or_else(|| MergeError::MissingField(spec.ident.clone()))?;
        if value.is_zero() {
            continue;
        }
        match primary.set(&spec.ident, value) {
            Ok(()) => {}
            Err(SetError::UnknownField) => {
                return Err(MergeError::MissingField(spec.ident.clone()));
            }
            Err(SetError::KindMismatch | SetError::OutOfRange) => {
                return Err(MergeError::KindMismatch(spec.ident.clone()));
            }
        }
    }

    Ok(())
}
