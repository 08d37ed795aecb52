//! Environment variable overlay.
//!
//! Fields annotated with `env=VAR` can take their value from the process
//! environment. [`environment_values`] collects those variables into a
//! flag-value map that binds through the same path as every other layer,
//! so a config file or CLI flag still overrides it.
//!
//! Lookups go through the [`EnvSource`] trait rather than [`std::env`]
//! directly. Tests inject a map-backed source; mutating the real process
//! environment is unsound under Rust 2024.

use std::collections::HashMap;

use crate::schema::SchemaMetadata;
use crate::value::{FieldValue, ValueKind};

/// A source of environment variables.
///
/// Implemented by [`ProcessEnv`] for the real process environment and by
/// `HashMap<String, String>` for tests.
pub trait EnvSource {
    /// Returns the value of `name`, or `None` when it is not set or not
    /// valid Unicode.
    fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment.
///
/// # Examples
///
/// ```
/// use command_bind_core::{EnvSource, ProcessEnv};
///
/// assert_eq!(ProcessEnv.var("COMMAND_BIND_NO_SUCH_VAR"), None);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Collects environment variables for every `env=`-annotated field.
///
/// Returns a map keyed by long name, suitable for
/// [`bind_values`](crate::bind_values). Variables that are unset or set to
/// the empty string are skipped, so an empty export behaves like no export
/// at all. Values are carried as raw text and converted to the field's kind
/// at bind time; a sequence field receives its variable as a one-element
/// sequence, since the environment cannot express arrays.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
///
/// use command_bind_core::{environment_values, schema_of, Bindable, FieldValue};
///
/// #[derive(Debug, Default, Bindable)]
/// struct Serve {
///     #[bind("p,port,Listen port,env=SERVE_PORT")]
///     port: i64,
/// }
///
/// let schema = schema_of::<Serve>().unwrap();
/// let mut env = HashMap::new();
/// env.insert("SERVE_PORT".to_string(), "8080".to_string());
///
/// let values = environment_values(&env, &schema);
/// assert_eq!(values.get("port"), Some(&FieldValue::Text("8080".into())));
/// ```
pub fn environment_values(
    source: &dyn EnvSource,
    schema: &SchemaMetadata,
) -> HashMap<String, FieldValue> {
    let mut values = HashMap::new();

    for spec in &schema.fields {
        let Some(name) = &spec.env else { continue };
        let Some(raw) = source.var(name) else { continue };
        if raw.is_empty() {
            continue;
        }
        let value = if spec.kind == ValueKind::TextSeq {
            FieldValue::TextSeq(vec![raw])
        } else {
            FieldValue::Text(raw)
        };
        values.insert(spec.long.clone(), value);
    }

    values
}
