//! The crate-wide error type.
//!
//! Every pipeline stage has its own focused error enum; [`Error`] is the
//! sum the public entry points return, so one `?` chain carries a failure
//! from any stage out to the caller. All variants are transparent: the
//! message the user sees is the stage's own message, with no added prefix.

use thiserror::Error;

use crate::merge::MergeError;
use crate::resolve::ResolveError;
use crate::schema::SchemaError;
use crate::tokenize::ParseError;
use crate::validate::ValidationError;
use crate::value::ConversionError;

/// Convenience alias used by the pipeline entry points.
pub type Result<T> = std::result::Result<T, Error>;

/// Any failure the binding pipeline can produce.
#[derive(Debug, Error)]
pub enum Error {
    /// A field annotation is invalid.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// The argument vector does not tokenize against the schema.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// A raw value does not convert to its field's declared kind.
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    /// Two records of the same type could not be merged.
    #[error(transparent)]
    Merge(#[from] MergeError),
    /// The fully bound record violates a required or choices constraint.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The argument vector does not name a runnable command.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    /// A command handler failed.
    #[error(transparent)]
    Handler(Box<dyn std::error::Error + Send + Sync>),
}
