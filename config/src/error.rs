//! Error types for config-file loading.

use thiserror::Error;

/// Errors that can occur while loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The document's top level is not an object.
    #[error("config root must be an object of flag values")]
    NotAnObject,

    /// A value is neither a scalar nor an array of strings.
    #[error("unsupported value shape for key '{0}'")]
    UnsupportedValue(String),

    /// A mapping key is not a string.
    #[error("config keys must be strings")]
    NonStringKey,

    /// The file extension names no supported format.
    #[error("unrecognized config extension: {0}")]
    UnknownExtension(String),
}

/// Convenience alias for results with [`ConfigError`].
pub type Result<T> = std::result::Result<T, ConfigError>;
