//! Settings error types

use thiserror::Error;

/// Errors from loading, saving, or validating configuration
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Reading or writing the configuration file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed
    #[error("JSON settings error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML deserialization failed
    #[error("TOML settings error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization failed
    #[error("TOML settings error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// The configuration file extension names no supported format
    #[error("unsupported settings format: {extension}")]
    UnsupportedFormat {
        /// The unrecognized file extension.
        extension: String,
    },

    /// A value failed validation
    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// Result type using SettingsError
pub type Result<T> = std::result::Result<T, SettingsError>;
