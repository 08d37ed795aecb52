//! Post-bind validation of a fully layered record.
//!
//! Runs after every source has been bound and merged, so it sees the final
//! value of each field. Checks are applied in schema declaration order and
//! the first failure is returned, which keeps diagnostics deterministic for
//! a fixed schema and input.
//!
//! # Example
//!
//! ```
//! use command_bind_core::{schema_of, validate, Bindable, ValidationError};
//!
//! #[derive(Debug, Default, Bindable)]
//! struct Publish {
//!     #[bind("t,tag,Release tag,required")]
//!     tag: String,
//! }
//!
//! let schema = schema_of::<Publish>().unwrap();
//! let record = Publish::default();
//!
//! let err = validate(&record, &schema).unwrap_err();
//! assert_eq!(err, ValidationError::MissingRequired("tag".to_string()));
//! ```

use thiserror::Error;

use crate::record::Bindable;
use crate::schema::SchemaMetadata;
use crate::value::FieldValue;

/// Record validation errors.
///
/// Each variant describes one constraint violation. The `Display` impl
/// provides the message shown to the end user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is still at its kind's zero value.
    #[error("required field '{0}' was not provided")]
    MissingRequired(String),
    /// A field value is not one of the allowed choices.
    #[error("invalid value '{value}' for field '{field}': allowed values are {}", .allowed.join(", "))]
    InvalidChoice {
        /// Long name of the offending field.
        field: String,
        /// The rejected value, rendered canonically.
        value: String,
        /// The values the annotation allows.
        allowed: Vec<String>,
    },
    /// A schema field is missing from the record implementation.
    #[error("field '{0}' is missing from the record")]
    MissingField(String),
}

/// Validates a bound record against its schema.
///
/// Checks required fields and choice constraints in declaration order and
/// returns the first violation. Choice constraints are skipped for fields
/// still at their zero value; `required` is the tool for mandatory fields.
/// A sequence field is checked element by element.
///
/// # Examples
///
/// ```
/// use command_bind_core::{schema_of, validate, Bindable, ValidationError};
///
/// #[derive(Debug, Default, Bindable)]
/// struct Export {
///     #[bind("f,format,Output format,choices=json;yaml")]
///     format: String,
/// }
///
/// let schema = schema_of::<Export>().unwrap();
///
/// let ok = Export { format: "json".into() };
/// assert!(validate(&ok, &schema).is_ok());
///
/// let bad = Export { format: "xml".into() };
/// let err = validate(&bad, &schema).unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "invalid value 'xml' for field 'format': allowed values are json, yaml",
/// );
/// ```
pub fn validate<T: Bindable>(record: &T, schema: &SchemaMetadata) -> Result<(), ValidationError> {
    for spec in &schema.fields {
        let value = record
            .get(&spec.ident)
            .ok_or_else(|| ValidationError::MissingField(spec.ident.clone()))?;

        if spec.required && value.is_zero() {
            return Err(ValidationError::MissingRequired(spec.long.clone()));
        }

        if spec.choices.is_empty() || value.is_zero() {
            continue;
        }

        match &value {
            FieldValue::TextSeq(items) => {
                for item in items {
                    if !spec.choices.contains(item) {
                        return Err(ValidationError::InvalidChoice {
                            field: spec.long.clone(),
                            value: item.clone(),
                            allowed: spec.choices.clone(),
                        });
                    }
                }
            }
            scalar => {
                let rendered = scalar.to_string();
                if !spec.choices.contains(&rendered) {
                    return Err(ValidationError::InvalidChoice {
                        field: spec.long.clone(),
                        value: rendered,
                        allowed: spec.choices.clone(),
                    });
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{RawField, SetError};
    use crate::schema::analyze;
    use crate::value::ValueKind;

    #[derive(Debug, Default)]
    struct Export {
        format: String,
        level: i64,
        tags: Vec<String>,
    }

    impl Bindable for Export {
        fn raw_fields() -> &'static [RawField] {
            &[
                RawField {
                    ident: "format",
                    kind: ValueKind::Text,
                    annotation: "f,format,Output format,required|choices=json;yaml",
                },
                RawField {
                    ident: "level",
                    kind: ValueKind::Int,
                    annotation: ",level,Compression level,choices=1;3;9",
                },
                RawField {
                    ident: "tags",
                    kind: ValueKind::TextSeq,
                    annotation: ",tags,Export tags,positional|choices=draft;final",
                },
            ]
        }

        fn get(&self, ident: &str) -> Option<FieldValue> {
            match ident {
                "format" => Some(FieldValue::Text(self.format.clone())),
                "level" => Some(FieldValue::Int(self.level)),
                "tags" => Some(FieldValue::TextSeq(self.tags.clone())),
                _ => None,
            }
        }

        fn set(&mut self, ident: &str, value: FieldValue) -> Result<(), SetError> {
            match (ident, value) {
                ("format", FieldValue::Text(v)) => {
                    self.format = v;
                    Ok(())
                }
                ("level", FieldValue::Int(v)) => {
                    self.level = v;
                    Ok(())
                }
                ("tags", FieldValue::TextSeq(v)) => {
                    self.tags = v;
                    Ok(())
                }
                _ => Err(SetError::UnknownField),
            }
        }
    }

    fn export_schema() -> SchemaMetadata {
        analyze(Export::raw_fields()).expect("fixture schema is valid")
    }

    #[test]
    fn test_validate_accepts_satisfied_record() {
        let record = Export {
            format: "json".to_string(),
            level: 3,
            tags: vec!["draft".to_string(), "final".to_string()],
        };
        assert!(validate(&record, &export_schema()).is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_required_field() {
        let record = Export {
            level: 1,
            ..Export::default()
        };
        let err = validate(&record, &export_schema()).unwrap_err();
        assert_eq!(err, ValidationError::MissingRequired("format".to_string()));
    }

    #[test]
    fn test_validate_rejects_value_outside_choices() {
        let record = Export {
            format: "xml".to_string(),
            ..Export::default()
        };
        let err = validate(&record, &export_schema()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidChoice {
                field: "format".to_string(),
                value: "xml".to_string(),
                allowed: vec!["json".to_string(), "yaml".to_string()],
            }
        );
    }

    #[test]
    fn test_validate_checks_numeric_choices_canonically() {
        let record = Export {
            format: "json".to_string(),
            level: 2,
            ..Export::default()
        };
        let err = validate(&record, &export_schema()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidChoice {
                field: "level".to_string(),
                value: "2".to_string(),
                allowed: vec!["1".to_string(), "3".to_string(), "9".to_string()],
            }
        );
    }

    #[test]
    fn test_validate_checks_each_sequence_element() {
        let record = Export {
            format: "json".to_string(),
            tags: vec!["draft".to_string(), "stale".to_string()],
            ..Export::default()
        };
        let err = validate(&record, &export_schema()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidChoice {
                field: "tags".to_string(),
                value: "stale".to_string(),
                allowed: vec!["draft".to_string(), "final".to_string()],
            }
        );
    }

    #[test]
    fn test_validate_skips_choices_for_unset_fields() {
        let record = Export {
            format: "yaml".to_string(),
            ..Export::default()
        };
        assert!(validate(&record, &export_schema()).is_ok());
    }

    #[test]
    fn test_validate_reports_first_violation_in_declaration_order() {
        let record = Export {
            format: String::new(),
            level: 2,
            ..Export::default()
        };
        let err = validate(&record, &export_schema()).unwrap_err();
        assert_eq!(err, ValidationError::MissingRequired("format".to_string()));
    }
}
