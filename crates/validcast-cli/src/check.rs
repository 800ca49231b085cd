//! # Check Subcommand
//!
//! Loads a schema document and an input document, runs the engine, and
//! renders the cast value or the error as JSON.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde_json::Value;
use validcast_core::{CastError, ErrorKind};
use validcast_schema::{validate_and_cast_with, EngineConfig, Schema};

use crate::load::{load_document, read_stdin};

/// Exit code for input that does not fit the schema.
pub const EXIT_INVALID_TYPE: i32 = 1;
/// Exit code for a malformed schema.
pub const EXIT_INVALID_SCHEMA: i32 = 2;

/// Arguments for the check subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Schema document (JSON, or YAML by extension).
    #[arg(long)]
    pub schema: PathBuf,

    /// Input document; stdin when omitted.
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Print single-line JSON.
    #[arg(long)]
    pub compact: bool,
}

/// Rendered result of a check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Text for stdout; empty when the cast value is absent.
    pub output: String,
    pub exit_code: i32,
}

/// Run the check subcommand.
///
/// Load and decode errors are returned as `Err`; validation errors are part
/// of the [`Report`].
pub fn run(args: &CheckArgs, config: &EngineConfig) -> anyhow::Result<Report> {
    let schema_doc = load_document(&args.schema)?;
    let schema = Schema::from_document(&schema_doc)
        .with_context(|| format!("invalid schema document {}", args.schema.display()))?;
    let input = match &args.input {
        Some(path) => load_document(path)?,
        None => read_stdin()?,
    };
    tracing::debug!(schema = %args.schema.display(), "running check");
    render(validate_and_cast_with(Some(&input), &schema, config), args.compact)
}

/// Render an engine result.
pub fn render(result: Result<Option<Value>, CastError>, compact: bool) -> anyhow::Result<Report> {
    let (value, exit_code) = match result {
        Ok(None) => {
            return Ok(Report {
                output: String::new(),
                exit_code: 0,
            })
        }
        Ok(Some(value)) => (value, 0),
        Err(err) => {
            tracing::info!(kind = ?err.kind(), path = %err.path(), "validation failed");
            let code = match err.kind() {
                ErrorKind::InvalidType => EXIT_INVALID_TYPE,
                ErrorKind::InvalidSchema => EXIT_INVALID_SCHEMA,
            };
            (serde_json::to_value(&err)?, code)
        }
    };
    let output = if compact {
        serde_json::to_string(&value)?
    } else {
        serde_json::to_string_pretty(&value)?
    };
    Ok(Report { output, exit_code })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use validcast_core::Path;

    #[test]
    fn test_render_success() {
        let report = render(Ok(Some(json!({"a": 1}))), true).unwrap();
        assert_eq!(report, Report { output: r#"{"a":1}"#.to_string(), exit_code: 0 });
    }

    #[test]
    fn test_render_absent() {
        let report = render(Ok(None), false).unwrap();
        assert!(report.output.is_empty());
        assert_eq!(report.exit_code, 0);
    }

    #[test]
    fn test_render_errors() {
        let report = render(Err(CastError::invalid_type(Path::root().child("a"))), true).unwrap();
        assert_eq!(report.exit_code, EXIT_INVALID_TYPE);
        let rendered: Value = serde_json::from_str(&report.output).unwrap();
        assert_eq!(rendered["kind"], json!("InvalidType"));
        assert_eq!(rendered["path"], json!(["a"]));

        let report = render(Err(CastError::invalid_schema(Path::root(), "bad")), true).unwrap();
        assert_eq!(report.exit_code, EXIT_INVALID_SCHEMA);
    }
}
