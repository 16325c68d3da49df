use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

/// A single log line could not be turned into a [`LogRecord`].
///
/// [`LogRecord`]: crate::models::LogRecord
#[derive(Error, Debug)]
pub enum ParseError {
    /// The line ran out of tokens before `field` was reached.
    #[error("missing field `{field}` (line has {found} of 6 tokens)")]
    MissingField { field: &'static str, found: usize },

    /// The leading count token is not a base-10 unsigned integer.
    #[error("invalid count `{token}`: {source}")]
    InvalidCount {
        token: String,
        #[source]
        source: ParseIntError,
    },
}

/// All errors produced by keystats.
#[derive(Error, Debug)]
pub enum KeystatsError {
    /// A log file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The historical log directory could not be listed.
    #[error("Failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A log line was malformed.
    #[error("{path}:{line}: {source}")]
    Parse {
        path: PathBuf,
        line: usize,
        #[source]
        source: ParseError,
    },

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A JSON config document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),
}

/// Convenience alias used throughout the keystats crates.
pub type Result<T> = std::result::Result<T, KeystatsError>;
