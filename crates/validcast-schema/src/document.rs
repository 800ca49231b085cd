//! # Schema Documents
//!
//! Decodes schemas from plain JSON (or YAML) values so they can live in
//! files:
//!
//! | Document                              | Schema                          |
//! |---------------------------------------|---------------------------------|
//! | `"string"`                            | tag                             |
//! | `[]`                                  | any array                       |
//! | `[s]`                                 | array of `s`                    |
//! | `{"$op": "name", "args": [...]}`      | registered operator             |
//! | `{"$chain": [s, ...]}`                | `pipe` over the decoded stages  |
//! | any other object                      | mapping                         |
//!
//! Mapping keys ending in `?` are optional. A `"$noAdditionalProperties":
//! true` entry closes the mapping. Numbers, booleans and null are not
//! schemas. Tag names are not checked here; unknown tags surface as
//! `InvalidSchema` during validation.

use serde_json::{Map, Value};
use validcast_core::Path;

use crate::chain::Arg;
use crate::error::ChainError;
use crate::primitives;
use crate::registry;
use crate::schema::{Mapping, Schema};

const OP_KEY: &str = "$op";
const ARGS_KEY: &str = "args";
const CHAIN_KEY: &str = "$chain";
const CLOSED_KEY: &str = "$noAdditionalProperties";

impl Schema {
    /// Decode a schema document.
    ///
    /// # Errors
    ///
    /// Returns `ChainError::Document` naming the offending location for
    /// malformed documents, unknown operators and bad operator arguments.
    pub fn from_document(doc: &Value) -> Result<Schema, ChainError> {
        decode(doc, &Path::root())
    }
}

fn decode(doc: &Value, path: &Path) -> Result<Schema, ChainError> {
    match doc {
        Value::String(tag) => Ok(Schema::Tag(tag.clone())),
        Value::Array(items) => match items.as_slice() {
            [] => Ok(Schema::any_array()),
            [element] => Ok(Schema::sequence(decode(element, &path.child(0usize))?)),
            _ => Err(ChainError::document(
                path,
                format!("array schemas take at most one element, got {}", items.len()),
            )),
        },
        Value::Object(object) if object.contains_key(OP_KEY) => decode_op(object, path),
        Value::Object(object) if object.contains_key(CHAIN_KEY) => decode_chain(object, path),
        Value::Object(object) => decode_mapping(object, path),
        other => Err(ChainError::document(
            path,
            format!("expected a string, array or object, got {}", validcast_core::value::kind_name(Some(other))),
        )),
    }
}

fn decode_op(object: &Map<String, Value>, path: &Path) -> Result<Schema, ChainError> {
    if let Some(extra) = object.keys().find(|k| *k != OP_KEY && *k != ARGS_KEY) {
        return Err(ChainError::document(
            path,
            format!("unexpected key `{extra}` in operator"),
        ));
    }
    let name = match object.get(OP_KEY) {
        Some(Value::String(name)) => name,
        _ => {
            return Err(ChainError::document(
                &path.child(OP_KEY),
                "operator name must be a string",
            ))
        }
    };
    let args: Vec<Arg> = match object.get(ARGS_KEY) {
        None => Vec::new(),
        Some(Value::Array(args)) => args.iter().cloned().map(Arg::from).collect(),
        Some(_) => {
            return Err(ChainError::document(
                &path.child(ARGS_KEY),
                "operator arguments must be an array",
            ))
        }
    };
    registry::build(name, &args).map_err(|e| e.within(path))
}

fn decode_chain(object: &Map<String, Value>, path: &Path) -> Result<Schema, ChainError> {
    if object.len() > 1 {
        return Err(ChainError::document(
            path,
            format!("`{CHAIN_KEY}` cannot be combined with other keys"),
        ));
    }
    let stages_path = path.child(CHAIN_KEY);
    let stages = match object.get(CHAIN_KEY) {
        Some(Value::Array(stages)) if !stages.is_empty() => stages,
        _ => {
            return Err(ChainError::document(
                &stages_path,
                "chain must be a non-empty array",
            ))
        }
    };
    let mut decoded = stages
        .iter()
        .enumerate()
        .map(|(i, stage)| decode(stage, &stages_path.child(i)))
        .collect::<Result<Vec<_>, _>>()?;
    if decoded.len() == 1 {
        return Ok(decoded.remove(0));
    }
    Ok(primitives::pipe(decoded).into())
}

fn decode_mapping(object: &Map<String, Value>, path: &Path) -> Result<Schema, ChainError> {
    let mut mapping = Mapping::new();
    for (key, doc) in object {
        if key == CLOSED_KEY {
            match doc {
                Value::Bool(true) => mapping = mapping.no_additional_properties(),
                Value::Bool(false) => {}
                _ => {
                    return Err(ChainError::document(
                        &path.child(key.as_str()),
                        "expected a boolean",
                    ))
                }
            }
            continue;
        }
        let schema = decode(doc, &path.child(key.as_str()))?;
        mapping = mapping.field(key.as_str(), schema);
    }
    Ok(mapping.into())
}
