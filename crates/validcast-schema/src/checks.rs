//! Primitive checks for the built-in base kinds.
//!
//! Each check returns the value unchanged when it has the expected runtime
//! kind, else `InvalidType` at `path`. Absent values never match.

use serde_json::Value;
use validcast_core::{CastError, CastResult, Path};

use crate::schema::Primitive;

/// Run the check for `primitive`.
pub fn check(primitive: Primitive, value: Option<&Value>, path: &Path) -> CastResult {
    match primitive {
        Primitive::String => is_string(value, path),
        Primitive::Number => is_number(value, path),
        Primitive::Boolean => is_boolean(value, path),
    }
}

pub fn is_string(value: Option<&Value>, path: &Path) -> CastResult {
    match value {
        Some(v @ Value::String(_)) => Ok(Some(v.clone())),
        _ => Err(CastError::invalid_type(path.clone())),
    }
}

/// JSON numbers are always finite, so every number passes.
pub fn is_number(value: Option<&Value>, path: &Path) -> CastResult {
    match value {
        Some(v @ Value::Number(_)) => Ok(Some(v.clone())),
        _ => Err(CastError::invalid_type(path.clone())),
    }
}

pub fn is_boolean(value: Option<&Value>, path: &Path) -> CastResult {
    match value {
        Some(v @ Value::Bool(_)) => Ok(Some(v.clone())),
        _ => Err(CastError::invalid_type(path.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_string() {
        let path = Path::root();
        assert_eq!(is_string(Some(&json!("x")), &path), Ok(Some(json!("x"))));
        assert!(is_string(Some(&json!(1)), &path).is_err());
        assert!(is_string(None, &path).is_err());
    }

    #[test]
    fn test_is_number() {
        let path = Path::root().child("n");
        assert_eq!(is_number(Some(&json!(2.5)), &path), Ok(Some(json!(2.5))));
        assert_eq!(
            is_number(Some(&json!("2.5")), &path),
            Err(CastError::invalid_type(path.clone()))
        );
    }

    // The boolean check accepts booleans only; strings are rejected.
    #[test]
    fn test_is_boolean_checks_booleans() {
        let path = Path::root();
        assert_eq!(is_boolean(Some(&json!(false)), &path), Ok(Some(json!(false))));
        assert!(is_boolean(Some(&json!("true")), &path).is_err());
        assert!(is_boolean(Some(&json!(null)), &path).is_err());
    }

    #[test]
    fn test_check_dispatch() {
        let path = Path::root();
        assert!(check(Primitive::String, Some(&json!("s")), &path).is_ok());
        assert!(check(Primitive::Number, Some(&json!("s")), &path).is_err());
        assert!(check(Primitive::Boolean, Some(&json!(true)), &path).is_ok());
    }
}
