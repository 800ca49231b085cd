//! # validcast-schema — Schema-Driven Validation and Casting
//!
//! Validates an arbitrary JSON value against a declarative schema and, in
//! the same pass, produces a transformed ("cast") value.
//!
//! ## Schemas
//!
//! A [`Schema`] is one of four node shapes:
//!
//! - a **tag** naming a base kind (`"string"`, `"number"`, `"boolean"`);
//! - a **function** ([`Validator`]) that returns the cast value or a failure;
//! - a **mapping** of keys to sub-schemas ([`Mapping`]);
//! - a **sequence**: `[]` accepts any array, `[s]` casts every element by `s`.
//!
//! Schemas are built in code, through [`Chain`] pipelines and registered
//! operators, or decoded from JSON/YAML documents with
//! [`Schema::from_document`].
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//! use validcast_schema::{primitives, validate_and_cast, Chain, Mapping, Schema};
//!
//! let schema: Schema = Mapping::new()
//!     .field("id", "number")
//!     .field("weight", Chain::new().to_finite_number(None).default(json!(0)))
//!     .field("tags?", primitives::to_array(Some("string".into())))
//!     .into();
//!
//! let out = validate_and_cast(Some(&json!({"id": 1, "weight": "2kg"})), &schema);
//! assert_eq!(out, Ok(Some(json!({"id": 1, "weight": 2}))));
//! ```
//!
//! ## Errors
//!
//! Validation fails with [`CastError`]: `InvalidType` when the input does not
//! fit, `InvalidSchema` when the schema itself is malformed. Building schemas
//! through the registry or from documents fails with [`ChainError`].

pub mod chain;
pub mod checks;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod primitives;
pub mod registry;
pub mod schema;

pub use chain::{chain, Arg, Args, Chain};
pub use config::EngineConfig;
pub use engine::{validate_and_cast, validate_and_cast_at, validate_and_cast_with};
pub use error::{ChainError, ConfigError};
pub use registry::{is_registered, operator_names, register_chain_operator};
pub use schema::{Field, Mapping, Primitive, Schema, Validator};

pub use validcast_core;
pub use validcast_core::{CastError, CastResult, ErrorKind, Failure, Outcome, Path, PathSegment};
