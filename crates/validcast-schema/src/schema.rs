//! # Schema Nodes
//!
//! A [`Schema`] is a closed union of four node shapes:
//!
//! - **Tag**: a primitive base-kind name (`"string"`, `"number"`,
//!   `"boolean"`). Unknown names are kept and rejected by the engine as
//!   `InvalidSchema`.
//! - **Func**: a named validator/transform function ([`Validator`]).
//! - **Mapping**: a structural record schema with optional keys and an
//!   optional "no additional properties" flag.
//! - **Sequence**: a single-element sequence schema; `None` is the wildcard
//!   `[]` that accepts any array unchanged.
//!
//! Schemas are immutable after construction and cheap to clone: validator
//! closures are shared behind `Arc`.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use validcast_core::{Outcome, Path};

use crate::error::ChainError;

/// Suffix marking a mapping key as optional, e.g. `"description?"`.
pub const OPTIONAL_MARKER: char = '?';

/// The three built-in base kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    String,
    Number,
    Boolean,
}

impl Primitive {
    /// All primitives, in tag order.
    pub const ALL: [Primitive; 3] = [Self::String, Self::Number, Self::Boolean];

    /// Resolve a primitive tag. Returns `None` for unknown tags.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "string" => Some(Self::String),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signature shared by every validator/transform function.
///
/// Arguments are the value (`None` when absent), its path, and the chain of
/// enclosing container values, outermost first.
pub type ValidatorFn = dyn Fn(Option<&Value>, &Path, &[&Value]) -> Outcome + Send + Sync;

/// A named, shareable validator/transform function.
#[derive(Clone)]
pub struct Validator {
    name: Cow<'static, str>,
    func: Arc<ValidatorFn>,
}

impl Validator {
    /// Wrap a function as a validator.
    pub fn new<F>(name: impl Into<Cow<'static, str>>, func: F) -> Self
    where
        F: Fn(Option<&Value>, &Path, &[&Value]) -> Outcome + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the function directly, without engine normalization.
    pub fn call(&self, value: Option<&Value>, path: &Path, ancestors: &[&Value]) -> Outcome {
        (self.func)(value, path, ancestors)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Validator").field(&self.name).finish()
    }
}

/// One declared key of a [`Mapping`].
#[derive(Debug, Clone)]
pub struct Field {
    /// Key name, without the optional marker.
    pub key: String,
    /// Whether the key may be absent from the value.
    pub optional: bool,
    pub schema: Schema,
}

/// Structural record schema.
///
/// Fields keep their declaration order. Keys present in the value but not
/// declared pass through unchanged unless
/// [`no_additional_properties`][Mapping::no_additional_properties] is set.
#[derive(Debug, Clone, Default)]
pub struct Mapping {
    fields: Vec<Field>,
    no_additional_properties: bool,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a key. A trailing `?` marks the key optional.
    pub fn field(self, key: impl Into<String>, schema: impl Into<Schema>) -> Self {
        let key = key.into();
        if let Some(stripped) = key.strip_suffix(OPTIONAL_MARKER) {
            let stripped = stripped.to_string();
            return self.insert(stripped, true, schema.into());
        }
        self.insert(key, false, schema.into())
    }

    /// Declare a required key, taken literally.
    pub fn required(self, key: impl Into<String>, schema: impl Into<Schema>) -> Self {
        self.insert(key.into(), false, schema.into())
    }

    /// Declare an optional key, taken literally.
    pub fn optional(self, key: impl Into<String>, schema: impl Into<Schema>) -> Self {
        self.insert(key.into(), true, schema.into())
    }

    /// Reject any key not explicitly declared.
    pub fn no_additional_properties(mut self) -> Self {
        self.no_additional_properties = true;
        self
    }

    fn insert(mut self, key: String, optional: bool, schema: Schema) -> Self {
        let field = Field {
            key,
            optional,
            schema,
        };
        // Redeclaring a key replaces it in place.
        match self.fields.iter_mut().find(|f| f.key == field.key) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
        self
    }

    /// Look up a declared key (marker stripped).
    pub fn get(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn rejects_additional_properties(&self) -> bool {
        self.no_additional_properties
    }
}

impl<K: Into<String>, S: Into<Schema>> FromIterator<(K, S)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, S)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Mapping::new(), |mapping, (key, schema)| mapping.field(key, schema))
    }
}

/// A schema node.
#[derive(Debug, Clone)]
pub enum Schema {
    /// Primitive tag.
    Tag(String),
    /// Validator/transform function.
    Func(Validator),
    /// Structural record schema.
    Mapping(Mapping),
    /// Single-element sequence schema; `None` accepts any array unchanged.
    Sequence(Option<Box<Schema>>),
}

impl Schema {
    /// Sequence whose every element must satisfy `element`.
    pub fn sequence(element: impl Into<Schema>) -> Self {
        Self::Sequence(Some(Box::new(element.into())))
    }

    /// The wildcard `[]`: any array passes unchanged.
    pub fn any_array() -> Self {
        Self::Sequence(None)
    }

    /// Wrap a function as a schema node.
    pub fn func<F>(name: impl Into<Cow<'static, str>>, func: F) -> Self
    where
        F: Fn(Option<&Value>, &Path, &[&Value]) -> Outcome + Send + Sync + 'static,
    {
        Self::Func(Validator::new(name, func))
    }
}

impl From<&str> for Schema {
    fn from(tag: &str) -> Self {
        Self::Tag(tag.to_string())
    }
}

impl From<String> for Schema {
    fn from(tag: String) -> Self {
        Self::Tag(tag)
    }
}

impl From<Primitive> for Schema {
    fn from(primitive: Primitive) -> Self {
        Self::Tag(primitive.as_str().to_string())
    }
}

impl From<Validator> for Schema {
    fn from(validator: Validator) -> Self {
        Self::Func(validator)
    }
}

impl From<Mapping> for Schema {
    fn from(mapping: Mapping) -> Self {
        Self::Mapping(mapping)
    }
}

/// Array-literal form: `[]` is the wildcard, `[s]` a sequence of `s`.
impl TryFrom<Vec<Schema>> for Schema {
    type Error = ChainError;

    fn try_from(mut elements: Vec<Schema>) -> Result<Self, Self::Error> {
        match elements.len() {
            0 => Ok(Self::any_array()),
            1 => Ok(Self::sequence(elements.remove(0))),
            n => Err(ChainError::document(
                &Path::root(),
                format!("array schemas take at most one element, got {n}"),
            )),
        }
    }
}

/// Compact description used in `InvalidSchema` errors and logs.
impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(tag) => write!(f, "{tag:?}"),
            Self::Func(validator) => write!(f, "fn {}", validator.name()),
            Self::Mapping(mapping) => {
                f.write_str("{")?;
                for (i, field) in mapping.fields().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    let marker = if field.optional { "?" } else { "" };
                    write!(f, "{}{marker}: {}", field.key, field.schema)?;
                }
                if mapping.rejects_additional_properties() {
                    f.write_str(" (closed)")?;
                }
                f.write_str("}")
            }
            Self::Sequence(None) => f.write_str("[]"),
            Self::Sequence(Some(element)) => write!(f, "[{element}]"),
        }
    }
}
