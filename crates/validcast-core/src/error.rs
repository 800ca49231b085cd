//! # Error Model
//!
//! Two failure kinds, both carrying the [`Path`] at which they were first
//! detected:
//!
//! - **InvalidType**: the value does not satisfy, or cannot be cast to, the
//!   schema. Recoverable by caller policy (`fallback` substitutes a default).
//! - **InvalidSchema**: the schema itself is unusable. Never suppressed or
//!   defaulted; always propagates to the top.
//!
//! Errors are values, not panics. The path is fixed when the error is created
//! and is never rewritten by enclosing schema nodes.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::path::Path;

/// Result of casting a value: the cast value (`None` when absent) or the
/// first error encountered.
pub type CastResult = Result<Option<Value>, CastError>;

/// Result of a validator function, before the engine normalizes it.
pub type Outcome = Result<Option<Value>, Failure>;

/// The kind of a [`CastError`], as it appears in the serialized form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    InvalidType,
    InvalidSchema,
}

/// A validation failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CastError {
    /// The value failed to satisfy or cast to the schema at `path`.
    #[error(
        "invalid type at {path}{}",
        .orig_error.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
    )]
    InvalidType {
        /// Location of the offending value.
        path: Path,
        /// Message reported by the validator function that rejected the value.
        orig_error: Option<String>,
    },

    /// The schema at `path` is malformed or unusable.
    #[error("invalid schema at {path}: {reason}")]
    InvalidSchema {
        /// Location of the value being validated when the schema was rejected.
        path: Path,
        /// Why the schema was rejected.
        reason: String,
        /// Description of the offending schema node.
        schema: Option<String>,
        /// The value being validated, if present.
        value: Option<Value>,
    },
}

impl CastError {
    /// An `InvalidType` at `path` with no further detail.
    pub fn invalid_type(path: Path) -> Self {
        Self::InvalidType {
            path,
            orig_error: None,
        }
    }

    /// An `InvalidType` at `path` carrying the validator's message.
    pub fn invalid_type_with(path: Path, message: impl Into<String>) -> Self {
        Self::InvalidType {
            path,
            orig_error: Some(message.into()),
        }
    }

    /// An `InvalidSchema` at `path`.
    pub fn invalid_schema(path: Path, reason: impl Into<String>) -> Self {
        Self::InvalidSchema {
            path,
            reason: reason.into(),
            schema: None,
            value: None,
        }
    }

    /// Attach a description of the offending schema to an `InvalidSchema`.
    pub fn with_schema(mut self, description: impl Into<String>) -> Self {
        if let Self::InvalidSchema { schema, .. } = &mut self {
            *schema = Some(description.into());
        }
        self
    }

    /// Attach the value being validated to an `InvalidSchema`.
    pub fn with_value(mut self, offending: Option<&Value>) -> Self {
        if let Self::InvalidSchema { value, .. } = &mut self {
            *value = offending.cloned();
        }
        self
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidType { .. } => ErrorKind::InvalidType,
            Self::InvalidSchema { .. } => ErrorKind::InvalidSchema,
        }
    }

    /// Location at which the error was first detected.
    pub fn path(&self) -> &Path {
        match self {
            Self::InvalidType { path, .. } | Self::InvalidSchema { path, .. } => path,
        }
    }

    pub fn is_invalid_type(&self) -> bool {
        matches!(self, Self::InvalidType { .. })
    }

    pub fn is_invalid_schema(&self) -> bool {
        matches!(self, Self::InvalidSchema { .. })
    }

    /// The message of the validator function that rejected the value, if any.
    pub fn orig_error(&self) -> Option<&str> {
        match self {
            Self::InvalidType { orig_error, .. } => orig_error.as_deref(),
            Self::InvalidSchema { .. } => None,
        }
    }
}

/// JSON-friendly projection:
/// `{kind, message, path, origError?, reason?, schema?, value?}`.
impl Serialize for CastError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("kind", &self.kind())?;
        map.serialize_entry("message", &self.to_string())?;
        map.serialize_entry("path", self.path())?;
        match self {
            Self::InvalidType { orig_error, .. } => {
                if let Some(orig) = orig_error {
                    map.serialize_entry("origError", orig)?;
                }
            }
            Self::InvalidSchema {
                reason,
                schema,
                value,
                ..
            } => {
                map.serialize_entry("reason", reason)?;
                if let Some(schema) = schema {
                    map.serialize_entry("schema", schema)?;
                }
                if let Some(value) = value {
                    map.serialize_entry("value", value)?;
                }
            }
        }
        map.end()
    }
}

/// What a validator function reports when it rejects a value.
///
/// The engine turns every failure into a [`CastError`]: `Reject` and
/// `Message` become `InvalidType` at the current path, `Cast` errors keep
/// the path they were created with.
#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
    /// Bare rejection.
    Reject,
    /// Rejection with a reason, kept as `orig_error`.
    Message(String),
    /// An error produced by a nested engine call.
    Cast(CastError),
}

impl Failure {
    /// Normalize into a [`CastError`] for a value located at `path`.
    pub fn at(self, path: &Path) -> CastError {
        match self {
            Self::Reject => CastError::invalid_type(path.clone()),
            Self::Message(message) => CastError::invalid_type_with(path.clone(), message),
            Self::Cast(err) => err,
        }
    }
}

impl From<CastError> for Failure {
    fn from(err: CastError) -> Self {
        Self::Cast(err)
    }
}

impl From<&str> for Failure {
    fn from(message: &str) -> Self {
        Self::Message(message.to_string())
    }
}

impl From<String> for Failure {
    fn from(message: String) -> Self {
        Self::Message(message)
    }
}
