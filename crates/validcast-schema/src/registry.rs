//! # Operator Registry
//!
//! Process-wide table from operator name to factory. Seeded with the
//! built-in primitives under their camelCase names; callers add their own
//! with [`register_chain_operator`]. Every registered name is reachable both
//! as a chain entry point ([`chain`][crate::chain::chain]) and as a chain
//! step ([`Chain::op`][crate::chain::Chain::op]), and from schema documents
//! (`{"$op": name, "args": [...]}`).
//!
//! ## Setup Phase
//!
//! Register custom operators during single-threaded setup, before
//! validations that use them start. Lookups hold the read lock only long
//! enough to clone the factory handle, so factories may themselves build
//! schemas through the registry.

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use crate::chain::{Arg, Args};
use crate::error::ChainError;
use crate::primitives;
use crate::schema::{Primitive, Schema};

/// Builds a schema stage from operator arguments.
pub type Factory = Arc<dyn Fn(&[Arg]) -> Result<Schema, ChainError> + Send + Sync>;

type BuiltinFactory = fn(&[Arg]) -> Result<Schema, ChainError>;

static REGISTRY: OnceLock<RwLock<BTreeMap<String, Factory>>> = OnceLock::new();

fn registry() -> &'static RwLock<BTreeMap<String, Factory>> {
    REGISTRY.get_or_init(|| RwLock::new(builtins()))
}

fn builtins() -> BTreeMap<String, Factory> {
    let table: [(&str, BuiltinFactory); 16] = [
        ("isString", |_| Ok(Primitive::String.into())),
        ("isNumber", |_| Ok(Primitive::Number.into())),
        ("isBoolean", |_| Ok(Primitive::Boolean.into())),
        ("optional", |args| {
            let args = Args::new("optional", args);
            Ok(primitives::optional(args.schema(0)?).into())
        }),
        ("default", |args| {
            let args = Args::new("default", args);
            let value = args.value(0)?;
            // `default(undefined)` leaves absent values absent.
            Ok(match value {
                Some(value) => primitives::default(value).into(),
                None => Schema::func("default", |value, _, _| Ok(value.cloned())),
            })
        }),
        ("fallback", |args| {
            let args = Args::new("fallback", args);
            Ok(primitives::fallback(args.schema(0)?, args.value(1)?).into())
        }),
        ("enums", |args| {
            let args = Args::new("enums", args);
            Ok(primitives::enums(args.list(0)?).into())
        }),
        ("either", |args| {
            let args = Args::new("either", args);
            Ok(primitives::either(args.schemas_from(0)?).into())
        }),
        ("oneOf", |args| {
            let args = Args::new("oneOf", args);
            Ok(primitives::one_of(args.schemas_from(0)?).into())
        }),
        ("arrayOneOf", |args| {
            let args = Args::new("arrayOneOf", args);
            Ok(primitives::array_one_of(args.schemas_from(0)?).into())
        }),
        ("arrayOrdered", |args| {
            let args = Args::new("arrayOrdered", args);
            Ok(primitives::array_ordered(args.schema_list()?).into())
        }),
        ("toFiniteNumber", |args| {
            let args = Args::new("toFiniteNumber", args);
            Ok(primitives::to_finite_number(args.value(0)?).into())
        }),
        ("toArray", |args| {
            let args = Args::new("toArray", args);
            Ok(primitives::to_array(args.optional_schema(0)?).into())
        }),
        ("toPlainObject", |args| {
            let args = Args::new("toPlainObject", args);
            Ok(primitives::to_plain_object(args.value(0)?).into())
        }),
        ("toObject", |args| {
            let args = Args::new("toObject", args);
            Ok(primitives::to_object(args.schema(0)?).into())
        }),
        ("pipe", |args| {
            let args = Args::new("pipe", args);
            Ok(primitives::pipe(args.schemas_from(0)?).into())
        }),
    ];

    table
        .into_iter()
        .map(|(name, factory)| (name.to_string(), Arc::new(factory) as Factory))
        .collect()
}

/// Register `factory` under `name`, replacing any previous operator of the
/// same name (built-ins included).
pub fn register_chain_operator<F>(name: impl Into<String>, factory: F)
where
    F: Fn(&[Arg]) -> Result<Schema, ChainError> + Send + Sync + 'static,
{
    let name = name.into();
    let previous = registry().write().insert(name.clone(), Arc::new(factory));
    if previous.is_some() {
        tracing::warn!(operator = %name, "chain operator replaced");
    } else {
        tracing::debug!(operator = %name, "chain operator registered");
    }
}

/// The factory registered under `name`.
pub fn lookup(name: &str) -> Option<Factory> {
    registry().read().get(name).cloned()
}

pub fn is_registered(name: &str) -> bool {
    registry().read().contains_key(name)
}

/// All registered operator names, sorted.
pub fn operator_names() -> Vec<String> {
    registry().read().keys().cloned().collect()
}

/// Build a stage with the operator registered under `name`.
///
/// # Errors
///
/// Returns `ChainError::UnknownOperator` if `name` is not registered,
/// otherwise whatever the factory reports.
pub fn build(name: &str, args: &[Arg]) -> Result<Schema, ChainError> {
    let factory = lookup(name).ok_or_else(|| ChainError::UnknownOperator(name.to_string()))?;
    factory(args)
}
