//! Record access for binding.
//!
//! Rust has no runtime struct reflection, so the pipeline works against an
//! explicit type description: [`Bindable`] exposes each field's identifier,
//! value kind, and annotation string, plus kind-erased access over
//! [`FieldValue`]. Most callers derive the implementation with
//! `#[derive(Bindable)]`; hand-written implementations are equally supported.

use thiserror::Error;

use crate::value::{FieldValue, ValueKind};

/// Per-field type description consumed by the schema analyzer.
///
/// The annotation string carries the `short,long,description,token|token`
/// grammar documented in [`analyze`](crate::schema::analyze); it is parsed at
/// analysis time, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawField {
    /// Field identifier inside the record.
    pub ident: &'static str,
    /// Declared value kind.
    pub kind: ValueKind,
    /// Unparsed annotation string.
    pub annotation: &'static str,
}

/// Why a [`Bindable::set`] call was refused.
///
/// Callers that hold the schema translate these into errors naming the field;
/// the variants themselves stay context-free so generated code can return
/// them without allocating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SetError {
    /// No field with the given identifier.
    #[error("unknown field")]
    UnknownField,
    /// The value's kind does not match the field's declared kind.
    #[error("kind mismatch")]
    KindMismatch,
    /// The value does not fit the destination type's range.
    #[error("out of range")]
    OutOfRange,
}

/// A configuration record the pipeline can describe, populate, and read back.
///
/// Implementations must keep the three methods consistent: every identifier
/// in [`raw_fields`](Bindable::raw_fields) is readable through
/// [`get`](Bindable::get) and writable through [`set`](Bindable::set) with a
/// value of the declared kind. The derive macro guarantees this; the binder
/// and merger report inconsistent hand-written implementations as conversion
/// or merge errors.
///
/// # Examples
///
/// ```
/// use command_bind_core::{Bindable, FieldValue, RawField, SetError, ValueKind};
///
/// #[derive(Default)]
/// struct Greeting {
///     name: String,
/// }
///
/// impl Bindable for Greeting {
///     fn raw_fields() -> &'static [RawField] {
///         &[RawField {
///             ident: "name",
///             kind: ValueKind::Text,
///             annotation: "n,name,Name to greet",
///         }]
///     }
///
///     fn get(&self, ident: &str) -> Option<FieldValue> {
///         match ident {
///             "name" => Some(FieldValue::Text(self.name.clone())),
///             _ => None,
///         }
///     }
///
///     fn set(&mut self, ident: &str, value: FieldValue) -> Result<(), SetError> {
///         match ident {
///             "name" => match value {
///                 FieldValue::Text(v) => {
///                     self.name = v;
///                     Ok(())
///                 }
///                 _ => Err(SetError::KindMismatch),
///             },
///             _ => Err(SetError::UnknownField),
///         }
///     }
/// }
///
/// let mut record = Greeting::default();
/// record.set("name", FieldValue::Text("Ann".into())).unwrap();
/// assert_eq!(record.get("name"), Some(FieldValue::Text("Ann".into())));
/// ```
pub trait Bindable: Default {
    /// Per-field descriptions, in declaration order.
    fn raw_fields() -> &'static [RawField];

    /// Reads a field by identifier. `None` means no such field.
    fn get(&self, ident: &str) -> Option<FieldValue>;

    /// Writes a field by identifier.
    fn set(&mut self, ident: &str, value: FieldValue) -> Result<(), SetError>;
}
