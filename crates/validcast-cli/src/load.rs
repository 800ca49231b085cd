//! # Document Loading
//!
//! Reads JSON or YAML documents into `serde_json::Value`. The format is
//! chosen by file extension: `.yaml`/`.yml` are YAML, everything else JSON.

use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context};
use serde_json::Value;

/// Document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// Load the document at `path`.
pub fn load_document(path: &Path) -> anyhow::Result<Value> {
    let format = Format::from_path(path);
    tracing::debug!(path = %path.display(), ?format, "loading document");
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    parse_document(&content, format)
        .with_context(|| format!("cannot parse {}", path.display()))
}

/// Read a JSON document from stdin.
pub fn read_stdin() -> anyhow::Result<Value> {
    let mut content = String::new();
    std::io::stdin()
        .read_to_string(&mut content)
        .context("cannot read stdin")?;
    parse_document(&content, Format::Json).context("cannot parse stdin")
}

pub fn parse_document(content: &str, format: Format) -> anyhow::Result<Value> {
    match format {
        Format::Json => Ok(serde_json::from_str(content).context("invalid JSON")?),
        Format::Yaml => {
            let yaml: serde_yaml::Value = serde_yaml::from_str(content).context("invalid YAML")?;
            yaml_to_json(&yaml)
        }
    }
}

/// Convert a YAML value tree to JSON. Tags are dropped; keys must be
/// scalars.
fn yaml_to_json(yaml: &serde_yaml::Value) -> anyhow::Result<Value> {
    Ok(match yaml {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(*b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                match n.as_f64().and_then(serde_json::Number::from_f64) {
                    Some(f) => Value::Number(f),
                    None => bail!("cannot represent YAML number {n} in JSON"),
                }
            }
        }
        serde_yaml::Value::String(s) => Value::String(s.clone()),
        serde_yaml::Value::Sequence(seq) => {
            Value::Array(seq.iter().map(yaml_to_json).collect::<anyhow::Result<_>>()?)
        }
        serde_yaml::Value::Mapping(map) => {
            let mut object = serde_json::Map::with_capacity(map.len());
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => bail!("unsupported YAML key: {other:?}"),
                };
                object.insert(key, yaml_to_json(v)?);
            }
            Value::Object(object)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(&tagged.value)?,
    })
}
