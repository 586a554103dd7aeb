//! Error types for option resolution and options-file handling.

use std::path::PathBuf;

/// Errors that can occur while resolving a build configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An enumerated or boolean option received a value outside its declared set.
    #[error("invalid value '{value}' for option '{name}' (expected {expected})")]
    InvalidOptionValue {
        /// Option name as written by the user.
        name: String,
        /// The rejected value.
        value: String,
        /// Human-readable list of accepted values.
        expected: &'static str,
    },

    /// The option name is not part of the option surface.
    #[error("unknown option '{name}'")]
    UnknownOption {
        /// The unrecognized option name.
        name: String,
    },

    /// An option assignment was not of the form `key=value`.
    #[error("malformed option assignment '{input}' (expected key=value)")]
    MalformedAssignment {
        /// The raw assignment text.
        input: String,
    },

    /// TOML deserialization error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// I/O error reading an options file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Options file not found.
    #[error("options file not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
