//! Domain error types
//!
//! This module defines the error taxonomy of the export engine. All errors are
//! domain-specific and don't expose third-party types: adapters translate
//! PostgreSQL, spreadsheet and I/O failures into [`EngineError`] at the seam.

use std::fmt;
use thiserror::Error;

/// Main engine error type
///
/// Every fallible operation in the engine returns this type. Variants follow
/// the four failure classes the transport layer distinguishes (authorization,
/// validation, data access, internal) plus the ambient failures of the binary
/// (configuration, I/O, serialization).
#[derive(Debug, Error)]
pub enum EngineError {
    /// Missing or invalid tenant principal
    #[error("Authorization error: {0}")]
    Authorization(String),

    /// Malformed caller input; `field` names the offending parameter
    #[error("Validation error on '{field}': {message}")]
    Validation { field: String, message: String },

    /// Underlying store query failed; `scope` names the entity kind (or the
    /// whole snapshot for collection-wide failures such as timeouts)
    #[error("Data access error ({scope}): {message}")]
    DataAccess { scope: String, message: String },

    /// Invariant violation inside the engine (projector/serializer defect)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl EngineError {
    /// Creates a validation error for a named field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a data access error scoped to an entity kind or collection step
    pub fn data_access(scope: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DataAccess {
            scope: scope.into(),
            message: message.into(),
        }
    }

    /// Classifies the error for status and exit-code mapping
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Authorization(_) => ErrorKind::Authorization,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::DataAccess { .. } => ErrorKind::DataAccess,
            Self::Internal(_) | Self::Io(_) | Self::Serialization(_) => ErrorKind::Internal,
            Self::Configuration(_) => ErrorKind::Configuration,
        }
    }
}

/// Coarse error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No or invalid tenant principal
    Authorization,
    /// Bad caller input
    Validation,
    /// Store failure
    DataAccess,
    /// Engine defect or unexpected failure
    Internal,
    /// Invalid configuration
    Configuration,
}

impl ErrorKind {
    /// Process exit code used by the CLI for this class of failure
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::Authorization | ErrorKind::Validation | ErrorKind::Configuration => 2,
            ErrorKind::DataAccess => 4,
            ErrorKind::Internal => 5,
        }
    }
}

/// Pipeline stage of an export call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportStage {
    /// Resolving the tenant principal
    Authorization,
    /// Parsing the report date and computing the window
    Window,
    /// Fetching the tenant snapshot from the store
    Collect,
    /// Projecting records into sheet rows
    Project,
    /// Building the workbook bytes
    Serialize,
}

impl ExportStage {
    /// Stable stage name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportStage::Authorization => "authorization",
            ExportStage::Window => "window",
            ExportStage::Collect => "collect",
            ExportStage::Project => "project",
            ExportStage::Serialize => "serialize",
        }
    }
}

impl fmt::Display for ExportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An engine error tagged with the stage that produced it
///
/// This is the only error type leaving the export orchestrator, so callers
/// can pick a response without inspecting messages.
#[derive(Debug, Error)]
#[error("{stage} stage failed: {error}")]
pub struct StageError {
    /// Stage that failed
    pub stage: ExportStage,

    /// Underlying error, unchanged
    #[source]
    pub error: EngineError,
}

impl StageError {
    /// Tags an error with its stage
    pub fn new(stage: ExportStage, error: EngineError) -> Self {
        Self { stage, error }
    }

    /// Classification of the underlying error
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for EngineError {
    fn from(err: toml::de::Error) -> Self {
        EngineError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_display() {
        let err = EngineError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_validation_error_names_field() {
        let err = EngineError::validation("date", "expected YYYY-MM-DD");
        assert_eq!(
            err.to_string(),
            "Validation error on 'date': expected YYYY-MM-DD"
        );
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            EngineError::Authorization("no token".into()).kind(),
            ErrorKind::Authorization
        );
        assert_eq!(
            EngineError::data_access("clients", "boom").kind(),
            ErrorKind::DataAccess
        );
        assert_eq!(
            EngineError::Internal("dup".into()).kind(),
            ErrorKind::Internal
        );
        assert_eq!(EngineError::Io("disk".into()).kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(ErrorKind::Validation.exit_code(), 2);
        assert_eq!(ErrorKind::Authorization.exit_code(), 2);
        assert_eq!(ErrorKind::DataAccess.exit_code(), 4);
        assert_eq!(ErrorKind::Internal.exit_code(), 5);
    }

    #[test]
    fn test_stage_error_keeps_source() {
        let err = StageError::new(
            ExportStage::Collect,
            EngineError::data_access("products", "connection reset"),
        );
        assert_eq!(err.stage, ExportStage::Collect);
        assert_eq!(err.kind(), ErrorKind::DataAccess);
        assert_eq!(
            err.to_string(),
            "collect stage failed: Data access error (products): connection reset"
        );
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(
            source.as_deref(),
            Some("Data access error (products): connection reset")
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: EngineError = io_err.into();
        assert!(matches!(err, EngineError::Io(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: EngineError = toml_err.into();
        assert!(matches!(err, EngineError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }
}
