//! Config-file layer for the command-bind pipeline.
//!
//! Loads flat JSON or YAML documents into flag-value maps that merge
//! beneath CLI arguments and above environment variables:
//!
//! - [`ConfigFile::load`] picks the format from the file extension.
//! - [`ConfigFile::from_json_str`] and [`ConfigFile::from_yaml_str`] parse
//!   in-memory documents.
//! - [`ConfigFile::bind`] materializes a typed record from the file alone.
//!
//! # Example
//!
//! ```
//! use command_bind_config::ConfigFile;
//! use command_bind_core::FieldValue;
//!
//! let file = ConfigFile::from_yaml_str("theme: dark\nwidth: 120\n").unwrap();
//! assert_eq!(file.values().get("width"), Some(&FieldValue::Int(120)));
//! ```

mod error;
mod file;

pub use error::{ConfigError, Result};
pub use file::ConfigFile;
