//! Error types for ingestion, classification and configuration.

use thiserror::Error;

/// Errors that abort the ingestion of a single file.
///
/// Ingestion errors are always scoped to one file: other files in the same
/// batch are still attempted, and the Dataset is left untouched for the
/// failing source.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Content is not decodable as delimited text.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The grid after the preamble does not have the expected column count.
    #[error("Schema mismatch: expected {expected} columns, found {found}")]
    SchemaMismatch { expected: usize, found: usize },

    /// The file could not be read.
    #[error("Read error: {0}")]
    Io(String),
}

impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> Self {
        IngestError::Io(err.to_string())
    }
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        IngestError::Parse(err.to_string())
    }
}

/// The classifier was asked for a profile that is not configured.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown service profile: {0}")]
pub struct UnknownProfileError(pub String);

/// Errors raised while loading the service-agreement configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A threshold triple is not ordered `caution <= warning <= critical`.
    #[error("Profile '{profile}' has unordered {kind} thresholds")]
    UnorderedThresholds { profile: String, kind: String },

    /// A threshold cut point is NaN or infinite.
    #[error("Profile '{profile}' has a non-finite {kind} threshold")]
    NonFiniteThreshold { profile: String, kind: String },

    #[error("No service profiles configured")]
    NoProfiles,

    #[error("Default profile '{0}' is not configured")]
    MissingDefault(String),

    #[error("Invalid column mapping: {0}")]
    InvalidColumns(String),
}
