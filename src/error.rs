// ⚠️ Error types
// Line-level failures and source-level failures are separate kinds:
// ingestion recovers from both, but callers can tell them apart.

use std::path::PathBuf;
use thiserror::Error;

/// Why a line of text could not become a `Record`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Record text is empty or whitespace")]
    BlankInput,

    #[error("Parameter string parsing exception: Expected: {expected} parameters, Actual: {actual} parameters.")]
    FieldCountMismatch { expected: usize, actual: usize },

    #[error("Invalid Gender parameter value: {0}")]
    InvalidGender(String),

    #[error("Invalid Date of Birth parameter value: {0}")]
    InvalidDate(String),
}

impl ParseError {
    /// Short machine-readable code, stable across message wording changes
    pub fn kind(&self) -> &'static str {
        match self {
            ParseError::BlankInput => "blank_input",
            ParseError::FieldCountMismatch { .. } => "field_count_mismatch",
            ParseError::InvalidGender(_) => "invalid_gender",
            ParseError::InvalidDate(_) => "invalid_date",
        }
    }
}

/// A line source that could not be opened or read.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Input source was not available: {name}")]
    Unavailable {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl SourceError {
    pub fn unavailable(name: impl Into<String>, source: std::io::Error) -> Self {
        SourceError::Unavailable {
            name: name.into(),
            source,
        }
    }
}

/// Configuration file problems
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file '{path}': {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
