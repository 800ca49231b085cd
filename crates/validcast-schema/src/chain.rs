//! # Chainable Pipelines
//!
//! A [`Chain`] is an immutable pipeline of schema stages. Every method
//! returns a *new* chain equal to `pipe(self, next)`, leaving the receiver
//! usable, so a common prefix can be shared:
//!
//! ```
//! use serde_json::json;
//! use validcast_schema::{validate_and_cast, Chain, Schema};
//!
//! let number = Chain::new().to_finite_number(None);
//! let weight = Schema::from(number.default(json!(0)));
//! let price = Schema::from(number.fallback("number", Some(json!(-1))));
//!
//! assert_eq!(validate_and_cast(Some(&json!("1.5kg")), &weight), Ok(Some(json!(1.5))));
//! assert_eq!(validate_and_cast(None, &weight), Ok(Some(json!(0))));
//! assert_eq!(validate_and_cast(Some(&json!("n/a")), &price), Ok(Some(json!(-1))));
//! ```
//!
//! Built-in primitives have typed methods. They resolve their operator in
//! the registry each time they are called, so replacing a built-in with
//! [`register_chain_operator`][crate::registry::register_chain_operator]
//! affects typed methods and [`Chain::op`] alike. Other registered operators
//! are reached through [`Chain::op`], which fails with
//! [`ChainError::UnknownOperator`] for unknown names.

use serde_json::Value;
use validcast_core::CastError;

use crate::error::ChainError;
use crate::primitives;
use crate::registry;
use crate::schema::{Schema, Validator};

/// An argument to a registry operator: a schema or a plain value.
///
/// Value arguments used where a schema is expected are decoded as schema
/// documents, so `"string"` works as both.
#[derive(Debug, Clone)]
pub enum Arg {
    Schema(Schema),
    /// A plain value; `None` is absent.
    Value(Option<Value>),
}

impl From<Schema> for Arg {
    fn from(schema: Schema) -> Self {
        Self::Schema(schema)
    }
}

impl From<Validator> for Arg {
    fn from(validator: Validator) -> Self {
        Self::Schema(validator.into())
    }
}

impl From<Chain> for Arg {
    fn from(chain: Chain) -> Self {
        Self::Schema(chain.into())
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Self::Value(Some(value))
    }
}

impl From<Option<Value>> for Arg {
    fn from(value: Option<Value>) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Self::Value(Some(Value::String(s.to_string())))
    }
}

/// Positional access to operator arguments with operator-aware errors.
///
/// Custom operator factories use this to read their arguments.
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    operator: &'a str,
    args: &'a [Arg],
}

impl<'a> Args<'a> {
    pub fn new(operator: &'a str, args: &'a [Arg]) -> Self {
        Self { operator, args }
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Required schema argument.
    pub fn schema(&self, index: usize) -> Result<Schema, ChainError> {
        self.optional_schema(index)?
            .ok_or_else(|| self.missing(index))
    }

    /// Schema argument that may be omitted or absent.
    pub fn optional_schema(&self, index: usize) -> Result<Option<Schema>, ChainError> {
        match self.args.get(index) {
            None | Some(Arg::Value(None)) => Ok(None),
            Some(Arg::Schema(schema)) => Ok(Some(schema.clone())),
            Some(Arg::Value(Some(doc))) => Schema::from_document(doc)
                .map(Some)
                .map_err(|e| self.invalid(index, e.to_string())),
        }
    }

    /// Value argument; omitted arguments are absent.
    pub fn value(&self, index: usize) -> Result<Option<Value>, ChainError> {
        match self.args.get(index) {
            None => Ok(None),
            Some(Arg::Value(value)) => Ok(value.clone()),
            Some(Arg::Schema(_)) => Err(self.invalid(index, "expected a value, got a schema")),
        }
    }

    /// Required array-valued argument, as its elements.
    pub fn list(&self, index: usize) -> Result<Vec<Value>, ChainError> {
        match self.value(index)? {
            Some(Value::Array(items)) => Ok(items),
            Some(_) => Err(self.invalid(index, "expected an array")),
            None => Err(self.missing(index)),
        }
    }

    /// Every argument from `start` on, as schemas.
    pub fn schemas_from(&self, start: usize) -> Result<Vec<Schema>, ChainError> {
        (start..self.args.len()).map(|i| self.schema(i)).collect()
    }

    /// A list of schemas given either as one array-valued argument of schema
    /// documents or as separate schema arguments.
    pub fn schema_list(&self) -> Result<Vec<Schema>, ChainError> {
        match self.args {
            [Arg::Value(Some(Value::Array(docs)))] => docs
                .iter()
                .map(|doc| Schema::from_document(doc).map_err(|e| self.invalid(0, e.to_string())))
                .collect(),
            _ => self.schemas_from(0),
        }
    }

    fn missing(&self, index: usize) -> ChainError {
        ChainError::MissingArgument {
            operator: self.operator.to_string(),
            index,
        }
    }

    fn invalid(&self, index: usize, reason: impl Into<String>) -> ChainError {
        ChainError::InvalidArgument {
            operator: self.operator.to_string(),
            index,
            reason: reason.into(),
        }
    }
}

/// Immutable pipeline of schema stages.
///
/// An empty chain is the identity. Converting a chain into a [`Schema`]
/// yields its single stage, or a [`primitives::pipe`] over all stages.
#[derive(Debug, Clone)]
pub struct Chain {
    stages: Vec<Schema>,
}

impl Chain {
    /// The identity pipeline.
    #[allow(clippy::new_without_default)] // `default` is the operator method.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// `pipe(self, stage)`.
    pub fn then(&self, stage: impl Into<Schema>) -> Self {
        let mut stages = Vec::with_capacity(self.stages.len() + 1);
        stages.extend_from_slice(&self.stages);
        stages.push(stage.into());
        Self { stages }
    }

    /// Append the stage built by the registered operator `name`.
    ///
    /// # Errors
    ///
    /// Returns `ChainError::UnknownOperator` if `name` is not registered,
    /// or the factory's own error for bad arguments.
    pub fn op(&self, name: &str, args: &[Arg]) -> Result<Self, ChainError> {
        Ok(self.then(registry::build(name, args)?))
    }

    pub fn stages(&self) -> &[Schema] {
        &self.stages
    }

    /// Append a built-in operator, resolved through the registry so that
    /// replacements registered under its name take effect.
    ///
    /// A replacement that rejects the arguments yields a stage failing with
    /// `InvalidSchema`.
    fn builtin(&self, name: &'static str, args: Vec<Arg>) -> Self {
        match registry::build(name, &args) {
            Ok(stage) => self.then(stage),
            Err(e) => {
                tracing::warn!(operator = name, error = %e, "chain operator rejected its arguments");
                self.then(unbuildable(name, e))
            }
        }
    }

    pub fn is_string(&self) -> Self {
        self.builtin("isString", Vec::new())
    }

    pub fn is_number(&self) -> Self {
        self.builtin("isNumber", Vec::new())
    }

    pub fn is_boolean(&self) -> Self {
        self.builtin("isBoolean", Vec::new())
    }

    pub fn optional(&self, schema: impl Into<Schema>) -> Self {
        self.builtin("optional", vec![Arg::Schema(schema.into())])
    }

    pub fn default(&self, default_value: Value) -> Self {
        self.builtin("default", vec![default_value.into()])
    }

    pub fn fallback(&self, schema: impl Into<Schema>, default_value: Option<Value>) -> Self {
        self.builtin(
            "fallback",
            vec![Arg::Schema(schema.into()), default_value.into()],
        )
    }

    pub fn enums(&self, list: Vec<Value>) -> Self {
        self.builtin("enums", vec![Value::Array(list).into()])
    }

    pub fn either(&self, schemas: Vec<Schema>) -> Self {
        self.builtin("either", schema_args(schemas))
    }

    pub fn one_of(&self, schemas: Vec<Schema>) -> Self {
        self.builtin("oneOf", schema_args(schemas))
    }

    pub fn array_one_of(&self, schemas: Vec<Schema>) -> Self {
        self.builtin("arrayOneOf", schema_args(schemas))
    }

    pub fn array_ordered(&self, schemas: Vec<Schema>) -> Self {
        self.builtin("arrayOrdered", schema_args(schemas))
    }

    pub fn to_finite_number(&self, default_value: Option<Value>) -> Self {
        self.builtin("toFiniteNumber", vec![default_value.into()])
    }

    pub fn to_array(&self, element: Option<Schema>) -> Self {
        self.builtin("toArray", element.map(Arg::Schema).into_iter().collect())
    }

    pub fn to_plain_object(&self, default_value: Option<Value>) -> Self {
        self.builtin("toPlainObject", vec![default_value.into()])
    }

    pub fn to_object(&self, schema: impl Into<Schema>) -> Self {
        self.builtin("toObject", vec![Arg::Schema(schema.into())])
    }
}

fn schema_args(schemas: Vec<Schema>) -> Vec<Arg> {
    schemas.into_iter().map(Arg::Schema).collect()
}

/// Stage standing in for an operator whose factory failed.
fn unbuildable(name: &'static str, error: ChainError) -> Schema {
    let reason = error.to_string();
    Schema::func(name, move |value, path, _| {
        Err(CastError::invalid_schema(path.clone(), reason.clone())
            .with_value(value)
            .into())
    })
}

impl From<Chain> for Schema {
    fn from(chain: Chain) -> Self {
        let mut stages = chain.stages;
        match stages.len() {
            0 => Schema::func("identity", |value, _, _| Ok(value.cloned())),
            1 => stages.remove(0),
            _ => primitives::pipe(stages).into(),
        }
    }
}

/// Start a chain from the registered operator `name`:
/// `pipe(identity, factory(args))`.
///
/// # Errors
///
/// Returns `ChainError::UnknownOperator` if `name` is not registered.
pub fn chain(name: &str, args: &[Arg]) -> Result<Chain, ChainError> {
    Chain::new().op(name, args)
}
