//! # validcast-cli — Command-Line Interface
//!
//! Validates and casts documents against schema documents from the shell.
//!
//! ## Subcommands
//!
//! - `check`: cast an input document against a schema document
//! - `operators`: list the registered chain operators
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; handlers here return values and
//!   never exit the process.
//! - Schema semantics belong to `validcast-schema`; this crate only loads
//!   files and renders results.

pub mod check;
pub mod load;
