//! Engine configuration.
//!
//! Defaults are suitable for most callers. Override via environment
//! variables or explicit construction:
//!
//! - `VALIDCAST_MAX_DEPTH` (default: 256): maximum nesting of engine calls
//!   before validation aborts with `InvalidSchema`. Guards against cyclic
//!   schemas built from self-referencing validator functions.
//!
//! The process-wide configuration is installed once with [`init`] during
//! single-threaded setup, or loaded lazily from the environment on first use.

use std::env::VarError;
use std::sync::OnceLock;

use crate::error::ConfigError;

/// Environment variable overriding [`EngineConfig::max_depth`].
pub const MAX_DEPTH_VAR: &str = "VALIDCAST_MAX_DEPTH";

/// Default maximum nesting of engine calls.
pub const DEFAULT_MAX_DEPTH: usize = 256;

static GLOBAL: OnceLock<EngineConfig> = OnceLock::new();

/// Configuration consulted by the recursive engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum nesting of engine calls.
    pub max_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset variables use their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `VALIDCAST_MAX_DEPTH` is not a
    /// positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_var(std::env::var(MAX_DEPTH_VAR))
    }

    fn from_var(var: Result<String, VarError>) -> Result<Self, ConfigError> {
        match var {
            Ok(raw) => Ok(Self {
                max_depth: parse_max_depth(&raw)?,
            }),
            Err(VarError::NotPresent) => Ok(Self::default()),
            Err(VarError::NotUnicode(raw)) => Err(ConfigError::InvalidValue {
                var: MAX_DEPTH_VAR.to_string(),
                value: raw.to_string_lossy().into_owned(),
                reason: "not valid unicode".to_string(),
            }),
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

fn parse_max_depth(raw: &str) -> Result<usize, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidValue {
        var: MAX_DEPTH_VAR.to_string(),
        value: raw.to_string(),
        reason: reason.to_string(),
    };
    match raw.trim().parse::<usize>() {
        Ok(0) => Err(invalid("must be greater than zero")),
        Ok(depth) => Ok(depth),
        Err(e) => Err(invalid(&e.to_string())),
    }
}

/// Install the process-wide configuration.
///
/// # Errors
///
/// Returns `ConfigError::AlreadyInitialized` if a configuration was already
/// installed or lazily loaded.
pub fn init(config: EngineConfig) -> Result<(), ConfigError> {
    GLOBAL
        .set(config)
        .map_err(|_| ConfigError::AlreadyInitialized)
}

/// The process-wide configuration, loading it from the environment on first
/// use. An invalid environment falls back to the defaults.
pub fn global() -> &'static EngineConfig {
    GLOBAL.get_or_init(|| {
        EngineConfig::from_env().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring invalid engine configuration");
            EngineConfig::default()
        })
    })
}
