//! # validcast-core — Foundational Types for validcast
//!
//! This crate is the leaf of the validcast workspace. It defines the data
//! carried between the recursive engine, the primitives, and callers:
//!
//! 1. **[`Path`]**: the keys and indices from the root value to the node
//!    being validated. Attached to every error.
//!
//! 2. **[`CastError`]**: the two failure kinds, `InvalidType` (bad input)
//!    and `InvalidSchema` (bad schema). Serializes to a JSON-friendly shape.
//!
//! 3. **[`Failure`]**: what a validator function reports when it rejects a
//!    value. The engine normalizes it into a [`CastError`] at the current path.
//!
//! 4. **[`value`]**: helpers over `serde_json::Value`: plain-record checks,
//!    lenient numeric parsing, number construction.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `validcast-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod path;
pub mod value;

pub use error::{CastError, CastResult, ErrorKind, Failure, Outcome};
pub use path::{Path, PathSegment};
