//! # Construction Errors
//!
//! Errors raised while *building* schemas: unknown chain operators, bad
//! operator arguments, malformed schema documents, and configuration.
//! These are programming/configuration errors and never appear as
//! validation results; validation failures are [`validcast_core::CastError`].

use thiserror::Error;
use validcast_core::Path;

/// Error while building a schema through the registry, a chain, or a
/// schema document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChainError {
    /// No operator with this name is registered.
    #[error("`{0}` is not a registered chain operator")]
    UnknownOperator(String),

    /// A required operator argument was not supplied.
    #[error("operator `{operator}` is missing argument {index}")]
    MissingArgument {
        operator: String,
        index: usize,
    },

    /// An operator argument has the wrong shape.
    #[error("operator `{operator}` argument {index} is invalid: {reason}")]
    InvalidArgument {
        operator: String,
        index: usize,
        reason: String,
    },

    /// A schema document could not be decoded.
    #[error("invalid schema document at {path}: {reason}")]
    Document {
        /// Location within the document.
        path: Path,
        reason: String,
    },
}

impl ChainError {
    pub(crate) fn document(path: &Path, reason: impl Into<String>) -> Self {
        Self::Document {
            path: path.clone(),
            reason: reason.into(),
        }
    }

    /// Attach a document location; errors that already carry one are kept.
    pub(crate) fn within(self, path: &Path) -> Self {
        match self {
            Self::Document { .. } => self,
            other => Self::document(path, other.to_string()),
        }
    }
}

/// Engine configuration error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable holds an unusable value.
    #[error("invalid value {value:?} for {var}: {reason}")]
    InvalidValue {
        var: String,
        value: String,
        reason: String,
    },

    /// The process-wide configuration was installed twice.
    #[error("engine configuration is already initialized")]
    AlreadyInitialized,
}
