//! Config-file loading into flag-value maps.
//!
//! A config file is a flat JSON or YAML object keyed by flag long names.
//! Scalars become typed [`FieldValue`]s, arrays of strings become sequence
//! values, and `null` entries are dropped as if the key were absent. The
//! loaded map feeds the binding pipeline as the config-file layer; keys
//! that match no schema field are skipped at bind time.
//!
//! # Example
//!
//! ```
//! use command_bind_config::ConfigFile;
//! use command_bind_core::FieldValue;
//!
//! let file = ConfigFile::from_json_str(r#"{"theme": "dark", "width": 120}"#).unwrap();
//! assert_eq!(file.values().get("theme"), Some(&FieldValue::Text("dark".into())));
//! assert_eq!(file.values().get("width"), Some(&FieldValue::Int(120)));
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use command_bind_core::{Bindable, FieldValue, apply_defaults, bind_values, schema_of, validate};

use crate::error::{ConfigError, Result};

/// A parsed config file as a flag-value map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    values: HashMap<String, FieldValue>,
    path: Option<PathBuf>,
}

impl ConfigFile {
    /// Loads a config file, choosing the format by extension.
    ///
    /// `.json` parses as JSON, `.yml` and `.yaml` as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownExtension`] for any other extension,
    /// [`ConfigError::IoError`] if the file cannot be read, or the format's
    /// parse/shape errors.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use command_bind_config::ConfigFile;
    ///
    /// let file = ConfigFile::load("notectl.json").unwrap();
    /// println!("loaded {} values", file.values().len());
    /// ```
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        if !matches!(extension, "json" | "yml" | "yaml") {
            return Err(ConfigError::UnknownExtension(extension.to_string()));
        }

        let raw = std::fs::read_to_string(path)?;
        let mut file = if extension == "json" {
            Self::from_json_str(&raw)?
        } else {
            Self::from_yaml_str(&raw)?
        };
        file.path = Some(path.to_path_buf());
        Ok(file)
    }

    /// Parses a JSON document whose top level is a flat object.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::JsonError`] for invalid JSON,
    /// [`ConfigError::NotAnObject`] for a non-object root, or
    /// [`ConfigError::UnsupportedValue`] for nested objects and arrays with
    /// non-string elements.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let document: serde_json::Value = serde_json::from_str(raw)?;
        let serde_json::Value::Object(entries) = document else {
            return Err(ConfigError::NotAnObject);
        };

        let mut values = HashMap::new();
        for (key, entry) in entries {
            if let Some(value) = json_value(&key, entry)? {
                values.insert(key, value);
            }
        }
        Ok(Self { values, path: None })
    }

    /// Parses a YAML document whose top level is a flat mapping.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::YamlError`] for invalid YAML,
    /// [`ConfigError::NotAnObject`] for a non-mapping root,
    /// [`ConfigError::NonStringKey`] for non-string keys, or
    /// [`ConfigError::UnsupportedValue`] for nested or tagged values.
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let document: serde_yaml::Value = serde_yaml::from_str(raw)?;
        let serde_yaml::Value::Mapping(entries) = document else {
            return Err(ConfigError::NotAnObject);
        };

        let mut values = HashMap::new();
        for (key, entry) in entries {
            let serde_yaml::Value::String(key) = key else {
                return Err(ConfigError::NonStringKey);
            };
            if let Some(value) = yaml_value(&key, entry)? {
                values.insert(key, value);
            }
        }
        Ok(Self { values, path: None })
    }

    /// The loaded flag-value map, keyed by long name.
    pub fn values(&self) -> &HashMap<String, FieldValue> {
        &self.values
    }

    /// Consumes the file, returning the flag-value map.
    pub fn into_values(self) -> HashMap<String, FieldValue> {
        self.values
    }

    /// The path the file was loaded from, when [`load`](Self::load) was used.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Materializes a typed record from this file alone.
    ///
    /// Binds the loaded values, applies schema defaults, and validates. Use
    /// the registry pipeline instead when CLI arguments or environment
    /// variables should participate.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_bind_config::ConfigFile;
    /// use command_bind_core::Bindable;
    ///
    /// #[derive(Debug, Default, Bindable)]
    /// struct Render {
    ///     #[bind("t,theme,Color theme,default=light")]
    ///     theme: String,
    ///     #[bind("w,width,Output width,default=80")]
    ///     width: i64,
    /// }
    ///
    /// let file = ConfigFile::from_json_str(r#"{"theme": "dark"}"#).unwrap();
    /// let render: Render = file.bind().unwrap();
    /// assert_eq!(render.theme, "dark");
    /// assert_eq!(render.width, 80);
    /// ```
    pub fn bind<T: Bindable>(&self) -> command_bind_core::Result<T> {
        let schema = schema_of::<T>()?;
        let mut record = T::default();
        bind_values(&mut record, &self.values, &schema)?;
        apply_defaults(&mut record, &schema)?;
        validate(&record, &schema)?;
        Ok(record)
    }
}

fn json_value(key: &str, value: serde_json::Value) -> Result<Option<FieldValue>> {
    let mapped = match value {
        serde_json::Value::Null => return Ok(None),
        serde_json::Value::Bool(flag) => FieldValue::Bool(flag),
        serde_json::Value::Number(number) => match number.as_i64() {
            Some(int) => FieldValue::Int(int),
            None => FieldValue::Float(
                number
                    .as_f64()
                    .ok_or_else(|| ConfigError::UnsupportedValue(key.to_string()))?,
            ),
        },
        serde_json::Value::String(text) => FieldValue::Text(text),
        serde_json::Value::Array(items) => {
            let mut seq = Vec::with_capacity(items.len());
            for item in items {
                let serde_json::Value::String(text) = item else {
                    return Err(ConfigError::UnsupportedValue(key.to_string()));
                };
                seq.push(text);
            }
            FieldValue::TextSeq(seq)
        }
        serde_json::Value::Object(_) => {
            return Err(ConfigError::UnsupportedValue(key.to_string()));
        }
    };
    Ok(Some(mapped))
}

fn yaml_value(key: &str, value: serde_yaml::Value) -> Result<Option<FieldValue>> {
    let mapped = match value {
        serde_yaml::Value::Null => return Ok(None),
        serde_yaml::Value::Bool(flag) => FieldValue::Bool(flag),
        serde_yaml::Value::Number(number) => match number.as_i64() {
            Some(int) => FieldValue::Int(int),
            None => FieldValue::Float(
                number
                    .as_f64()
                    .ok_or_else(|| ConfigError::UnsupportedValue(key.to_string()))?,
            ),
        },
        serde_yaml::Value::String(text) => FieldValue::Text(text),
        serde_yaml::Value::Sequence(items) => {
            let mut seq = Vec::with_capacity(items.len());
            for item in items {
                let serde_yaml::Value::String(text) = item else {
                    return Err(ConfigError::UnsupportedValue(key.to_string()));
                };
                seq.push(text);
            }
            FieldValue::TextSeq(seq)
        }
        serde_yaml::Value::Mapping(_) | serde_yaml::Value::Tagged(_) => {
            return Err(ConfigError::UnsupportedValue(key.to_string()));
        }
    };
    Ok(Some(mapped))
}
