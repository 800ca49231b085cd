//! # Recursive Engine
//!
//! Interprets a [`Schema`] against a value, walking both in lock-step and
//! producing either the cast value or the first error encountered.
//!
//! Dispatch by node shape:
//!
//! 1. **Tag**: known primitive names delegate to [`checks`]; unknown names
//!    are `InvalidSchema`.
//! 2. **Func**: the function's result is the cast value. Failures are
//!    normalized: `InvalidSchema` propagates verbatim, nested `InvalidType`
//!    keeps its path, bare rejections become `InvalidType` at this path.
//! 3. **Mapping**: requires a record. Value keys are visited first, then
//!    declared keys missing from the value. Undeclared keys pass through
//!    unless the mapping rejects additional properties; declared-optional
//!    keys may be absent.
//! 4. **Sequence**: requires an array. The wildcard `[]` returns it
//!    unchanged; otherwise every element is cast in index order.
//!
//! The first error in key/index order aborts the walk. Inputs are never
//! mutated; results are freshly built.

use std::cell::Cell;

use serde_json::{Map, Value};
use validcast_core::{CastError, CastResult, Path};

use crate::checks;
use crate::config::{self, EngineConfig};
use crate::schema::{Mapping, Primitive, Schema};

thread_local! {
    static DEPTH: Cell<usize> = const { Cell::new(0) };
    static MAX_DEPTH: Cell<Option<usize>> = const { Cell::new(None) };
}

/// Validate and cast `value` against `schema`, starting at the root path.
///
/// `None` stands for an absent value. On success the result is the cast
/// value, which is itself `None` when the schema maps the input to absent
/// (e.g. `optional` on an absent input).
pub fn validate_and_cast(value: Option<&Value>, schema: &Schema) -> CastResult {
    validate_and_cast_at(value, schema, &Path::root(), &[])
}

/// Like [`validate_and_cast`], using `config` instead of the process-wide
/// configuration for the duration of the call.
pub fn validate_and_cast_with(
    value: Option<&Value>,
    schema: &Schema,
    config: &EngineConfig,
) -> CastResult {
    let _limit = LimitOverride::install(config.max_depth);
    validate_and_cast(value, schema)
}

/// Validate and cast a value located at `path` below `ancestors`.
///
/// This is the entry point for validator functions that delegate to the
/// engine; they pass through the path and ancestor chain they were given.
pub fn validate_and_cast_at(
    value: Option<&Value>,
    schema: &Schema,
    path: &Path,
    ancestors: &[&Value],
) -> CastResult {
    let _depth = DepthGuard::enter(path)?;

    match schema {
        Schema::Tag(tag) => match Primitive::from_tag(tag) {
            Some(primitive) => checks::check(primitive, value, path),
            None => {
                tracing::trace!(%path, tag = %tag, "unsupported schema tag");
                Err(
                    CastError::invalid_schema(path.clone(), format!("unknown primitive tag {tag:?}"))
                        .with_schema(schema.to_string())
                        .with_value(value),
                )
            }
        },
        Schema::Func(validator) => validator
            .call(value, path, ancestors)
            .map_err(|failure| failure.at(path)),
        Schema::Mapping(mapping) => cast_mapping(value, mapping, path, ancestors),
        Schema::Sequence(element) => {
            let Some(array @ Value::Array(items)) = value else {
                return Err(CastError::invalid_type(path.clone()));
            };
            match element {
                None => Ok(Some(array.clone())),
                Some(element) => {
                    let element: &Schema = element;
                    cast_items(array, items, path, ancestors, |_| element)
                }
            }
        }
    }
}

fn cast_mapping(
    value: Option<&Value>,
    mapping: &Mapping,
    path: &Path,
    ancestors: &[&Value],
) -> CastResult {
    let Some(record_value @ Value::Object(record)) = value else {
        return Err(CastError::invalid_type(path.clone()));
    };

    let mut keys: Vec<&str> = record.keys().map(String::as_str).collect();
    keys.extend(
        mapping
            .fields()
            .iter()
            .filter(|field| !record.contains_key(&field.key))
            .map(|field| field.key.as_str()),
    );

    let parents = with_parent(ancestors, record_value);
    let mut cast = Map::with_capacity(keys.len());
    for key in keys {
        let entry = record.get(key);
        let result = match mapping.get(key) {
            None if mapping.rejects_additional_properties() => {
                return Err(CastError::invalid_type(path.child(key)));
            }
            None => entry.cloned(),
            Some(field) if field.optional && entry.is_none() => None,
            Some(field) => validate_and_cast_at(entry, &field.schema, &path.child(key), &parents)?,
        };
        // Absent results are omitted from the cast record.
        if let Some(result) = result {
            cast.insert(key.to_string(), result);
        }
    }
    Ok(Some(Value::Object(cast)))
}

/// Cast every element of `array` with the schema chosen by `schema_for`,
/// stopping at the first error. Absent element results become `null`.
pub(crate) fn cast_items<'s>(
    array: &Value,
    items: &[Value],
    path: &Path,
    ancestors: &[&Value],
    schema_for: impl Fn(usize) -> &'s Schema,
) -> CastResult {
    let parents = with_parent(ancestors, array);
    let mut cast = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let result =
            validate_and_cast_at(Some(item), schema_for(index), &path.child(index), &parents)?;
        cast.push(result.unwrap_or(Value::Null));
    }
    Ok(Some(Value::Array(cast)))
}

fn with_parent<'a>(ancestors: &[&'a Value], parent: &'a Value) -> Vec<&'a Value> {
    let mut parents = Vec::with_capacity(ancestors.len() + 1);
    parents.extend_from_slice(ancestors);
    parents.push(parent);
    parents
}

/// Tracks nesting of engine calls on the current thread.
struct DepthGuard;

impl DepthGuard {
    fn enter(path: &Path) -> Result<Self, CastError> {
        let depth = DEPTH.with(|d| {
            let depth = d.get() + 1;
            d.set(depth);
            depth
        });
        let guard = DepthGuard;
        let limit = MAX_DEPTH
            .with(Cell::get)
            .unwrap_or_else(|| config::global().max_depth);
        if depth > limit {
            tracing::warn!(%path, limit, "schema nesting limit exceeded");
            return Err(CastError::invalid_schema(
                path.clone(),
                format!("maximum schema depth of {limit} exceeded"),
            ));
        }
        Ok(guard)
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}

/// Scoped override of the depth limit for the current thread.
struct LimitOverride {
    previous: Option<usize>,
}

impl LimitOverride {
    fn install(limit: usize) -> Self {
        let previous = MAX_DEPTH.with(|m| m.replace(Some(limit)));
        Self { previous }
    }
}

impl Drop for LimitOverride {
    fn drop(&mut self) {
        MAX_DEPTH.with(|m| m.set(self.previous));
    }
}
