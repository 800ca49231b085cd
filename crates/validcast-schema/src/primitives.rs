//! # Transform/Validator Primitives
//!
//! Higher-order factories. Each takes its configuration and returns a
//! [`Validator`] the engine can run as a schema node.
//!
//! | Factory | Behavior |
//! |---|---|
//! | [`optional`] | absent passes through; else the schema applies |
//! | [`fallback`] | `InvalidType` from the schema becomes the default |
//! | [`default`] | absent becomes the default; no schema |
//! | [`to_finite_number`] | lenient numeric parse, else the default |
//! | [`to_array`] | absent/null → `[]`, scalar → `[scalar]`, then the element schema |
//! | [`to_plain_object`] | non-records become the default |
//! | [`to_object`] | non-records become `{}`, then the mapping schema |
//! | [`enums`] | value must equal one of the list |
//! | [`one_of`] / [`either`] | first alternative that succeeds |
//! | [`array_one_of`] | [`one_of`] applied to each element |
//! | [`array_ordered`] | element `i` uses schema `i mod n` |
//! | [`pipe`] | left-to-right composition, first error wins |
//!
//! `InvalidSchema` errors are never swallowed: `fallback` and `one_of`
//! propagate them even where they discard `InvalidType`.

use serde_json::{Map, Value};
use validcast_core::value::{is_plain_object, number_from_f64, parse_float};
use validcast_core::{CastError, Failure, Path};

use crate::engine::{cast_items, validate_and_cast_at};
use crate::schema::{Schema, Validator};

fn invalid_schema(path: &Path, value: Option<&Value>, reason: &str) -> Failure {
    CastError::invalid_schema(path.clone(), reason)
        .with_value(value)
        .into()
}

/// Absent values pass through untouched; anything else must satisfy
/// `schema`. `null` is present.
pub fn optional(schema: impl Into<Schema>) -> Validator {
    let schema = schema.into();
    Validator::new("optional", move |value, path, ancestors| match value {
        None => Ok(None),
        Some(_) => Ok(validate_and_cast_at(value, &schema, path, ancestors)?),
    })
}

/// Apply `schema`; on `InvalidType` substitute `default_value`.
///
/// `default_value` may itself be absent.
pub fn fallback(schema: impl Into<Schema>, default_value: Option<Value>) -> Validator {
    let schema = schema.into();
    Validator::new("fallback", move |value, path, ancestors| {
        match validate_and_cast_at(value, &schema, path, ancestors) {
            Ok(cast) => Ok(cast),
            Err(err @ CastError::InvalidSchema { .. }) => Err(err.into()),
            Err(CastError::InvalidType { .. }) => Ok(default_value.clone()),
        }
    })
}

/// Absent values become `default_value`; present values pass unchanged.
pub fn default(default_value: Value) -> Validator {
    Validator::new("default", move |value, _, _| {
        Ok(Some(value.unwrap_or(&default_value).clone()))
    })
}

/// Parse the value as a float with leading-numeric-prefix semantics.
///
/// Finite results are returned as numbers; anything else (empty string,
/// non-numeric text, records, `Infinity`) yields `default_value`. An empty
/// string is not zero.
pub fn to_finite_number(default_value: Option<Value>) -> Validator {
    Validator::new("toFiniteNumber", move |value, _, _| {
        Ok(parse_float(value)
            .and_then(number_from_f64)
            .or_else(|| default_value.clone()))
    })
}

/// Normalize to an array: absent and `null` become `[]`, a non-array value
/// is wrapped as `[value]`, arrays pass through.
///
/// With an element schema, a non-empty result is cast as a sequence of it.
/// Empty arrays are always valid.
pub fn to_array(element: Option<Schema>) -> Validator {
    let sequence = element.map(Schema::sequence);
    Validator::new("toArray", move |value, path, ancestors| {
        let normalized = match value {
            None | Some(Value::Null) => Value::Array(Vec::new()),
            Some(array @ Value::Array(_)) => array.clone(),
            Some(other) => Value::Array(vec![other.clone()]),
        };
        match &sequence {
            Some(sequence) if normalized.as_array().is_some_and(|a| !a.is_empty()) => {
                Ok(validate_and_cast_at(Some(&normalized), sequence, path, ancestors)?)
            }
            _ => Ok(Some(normalized)),
        }
    })
}

/// Records pass through; anything else becomes `default_value`, or `{}`
/// when no default is given.
pub fn to_plain_object(default_value: Option<Value>) -> Validator {
    let default_value = default_value.unwrap_or_else(|| Value::Object(Map::new()));
    Validator::new("toPlainObject", move |value, _, _| {
        if is_plain_object(value) {
            Ok(value.cloned())
        } else {
            Ok(Some(default_value.clone()))
        }
    })
}

/// Cast a record against a mapping schema, substituting `{}` for anything
/// that is not a record, so missing objects still get their fields defaulted.
///
/// A non-mapping `schema` is `InvalidSchema`.
pub fn to_object(schema: impl Into<Schema>) -> Validator {
    let schema = schema.into();
    Validator::new("toObject", move |value, path, ancestors| {
        if !matches!(schema, Schema::Mapping(_)) {
            return Err(CastError::invalid_schema(
                path.clone(),
                "toObject requires a mapping schema",
            )
            .with_schema(schema.to_string())
            .with_value(value)
            .into());
        }
        let empty = Value::Object(Map::new());
        let target = if is_plain_object(value) {
            value
        } else {
            Some(&empty)
        };
        Ok(validate_and_cast_at(target, &schema, path, ancestors)?)
    })
}

/// The value must equal one of `list`. An empty list is `InvalidSchema`.
pub fn enums(list: Vec<Value>) -> Validator {
    Validator::new("enums", move |value, path, _| {
        if list.is_empty() {
            return Err(invalid_schema(path, value, "enums requires a non-empty list"));
        }
        match value {
            Some(v) if list.contains(v) => Ok(Some(v.clone())),
            _ => Err(Failure::Reject),
        }
    })
}

/// Try each schema in order and return the first successful cast.
///
/// If every alternative fails with `InvalidType`, the result is a bare
/// `InvalidType` at the current path; the individual reasons are dropped.
/// No alternatives is `InvalidSchema`.
pub fn one_of(schemas: Vec<Schema>) -> Validator {
    Validator::new("oneOf", move |value, path, ancestors| {
        if schemas.is_empty() {
            return Err(invalid_schema(path, value, "oneOf requires at least one schema"));
        }
        for schema in &schemas {
            match validate_and_cast_at(value, schema, path, ancestors) {
                Ok(cast) => return Ok(cast),
                Err(err @ CastError::InvalidSchema { .. }) => return Err(err.into()),
                Err(CastError::InvalidType { .. }) => continue,
            }
        }
        Err(Failure::Reject)
    })
}

/// Alias of [`one_of`].
pub fn either(schemas: Vec<Schema>) -> Validator {
    one_of(schemas)
}

/// Require an array and cast each element with [`one_of`]`(schemas)`.
pub fn array_one_of(schemas: Vec<Schema>) -> Validator {
    let empty = schemas.is_empty();
    let alternatives = Schema::from(one_of(schemas));
    Validator::new("arrayOneOf", move |value, path, ancestors| {
        if empty {
            return Err(invalid_schema(path, value, "arrayOneOf requires at least one schema"));
        }
        let Some(array @ Value::Array(items)) = value else {
            return Err(Failure::Reject);
        };
        Ok(cast_items(array, items, path, ancestors, |_| &alternatives)?)
    })
}

/// Require an array and cast element `i` with `schemas[i % schemas.len()]`.
pub fn array_ordered(schemas: Vec<Schema>) -> Validator {
    Validator::new("arrayOrdered", move |value, path, ancestors| {
        if schemas.is_empty() {
            return Err(invalid_schema(path, value, "arrayOrdered requires at least one schema"));
        }
        let Some(array @ Value::Array(items)) = value else {
            return Err(Failure::Reject);
        };
        Ok(cast_items(array, items, path, ancestors, |index| {
            &schemas[index % schemas.len()]
        })?)
    })
}

/// Feed the value through `stages` left to right; the first error aborts.
/// No stages is `InvalidSchema`.
pub fn pipe(stages: Vec<Schema>) -> Validator {
    Validator::new("pipe", move |value, path, ancestors| {
        if stages.is_empty() {
            return Err(invalid_schema(path, value, "pipe requires at least one stage"));
        }
        let mut current = value.cloned();
        for stage in &stages {
            current = validate_and_cast_at(current.as_ref(), stage, path, ancestors)?;
        }
        Ok(current)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::validate_and_cast;
    use crate::schema::Mapping;
    use serde_json::json;
    use validcast_core::CastResult;

    fn cast(value: &Value, schema: impl Into<Schema>) -> CastResult {
        validate_and_cast(Some(value), &schema.into())
    }

    fn cast_absent(schema: impl Into<Schema>) -> CastResult {
        validate_and_cast(None, &schema.into())
    }

    fn type_error_at<const N: usize>(segments: [&str; N]) -> CastResult {
        Err(CastError::invalid_type(segments.into_iter().collect()))
    }

    /// Fails the test if invoked.
    fn tripwire() -> Schema {
        Schema::func("tripwire", |_, _, _| panic!("schema must not be invoked"))
    }

    #[test]
    fn test_optional() {
        assert_eq!(cast_absent(optional(tripwire())), Ok(None));
        assert_eq!(cast(&json!("x"), optional("string")), Ok(Some(json!("x"))));
        assert_eq!(cast(&json!(1), optional("string")), type_error_at([]));
        assert_eq!(cast(&json!(null), optional("string")), type_error_at([]));
    }

    #[test]
    fn test_fallback() {
        assert_eq!(cast(&json!(5), fallback("number", Some(json!(0)))), Ok(Some(json!(5))));
        assert_eq!(cast(&json!("5"), fallback("number", Some(json!(0)))), Ok(Some(json!(0))));
        assert_eq!(cast_absent(fallback("string", Some(json!("USD")))), Ok(Some(json!("USD"))));
        assert_eq!(cast(&json!(true), fallback("string", None)), Ok(None));
    }

    #[test]
    fn test_fallback_does_not_hide_invalid_schema() {
        let err = cast(&json!(1), fallback("strng", Some(json!(0)))).unwrap_err();
        assert!(err.is_invalid_schema());
    }

    #[test]
    fn test_default() {
        assert_eq!(cast_absent(default(json!(0))), Ok(Some(json!(0))));
        assert_eq!(cast(&json!(null), default(json!(0))), Ok(Some(json!(null))));
        assert_eq!(cast(&json!("x"), default(json!(0))), Ok(Some(json!("x"))));
    }

    #[test]
    fn test_to_finite_number() {
        let schema = to_finite_number(Some(json!(0)));
        assert_eq!(cast(&json!("12.5abc"), schema.clone()), Ok(Some(json!(12.5))));
        assert_eq!(cast(&json!(""), schema.clone()), Ok(Some(json!(0))));
        assert_eq!(cast(&json!("abc"), schema.clone()), Ok(Some(json!(0))));
        assert_eq!(cast(&json!("Infinity"), schema.clone()), Ok(Some(json!(0))));
        assert_eq!(cast(&json!(3), schema.clone()), Ok(Some(json!(3))));
        assert_eq!(cast(&json!("  7"), schema.clone()), Ok(Some(json!(7))));
        assert_eq!(cast(&json!({}), schema.clone()), Ok(Some(json!(0))));
        assert_eq!(cast_absent(schema), Ok(Some(json!(0))));
        assert_eq!(cast(&json!("x"), to_finite_number(None)), Ok(None));
    }

    #[test]
    fn test_empty_string_is_not_zero() {
        assert_eq!(
            cast(&json!(""), to_finite_number(Some(json!(-1)))),
            Ok(Some(json!(-1)))
        );
    }

    #[test]
    fn test_to_array() {
        assert_eq!(cast_absent(to_array(None)), Ok(Some(json!([]))));
        assert_eq!(cast(&json!(null), to_array(None)), Ok(Some(json!([]))));
        assert_eq!(cast(&json!(5), to_array(None)), Ok(Some(json!([5]))));
        assert_eq!(cast(&json!([1, 2]), to_array(None)), Ok(Some(json!([1, 2]))));
    }

    #[test]
    fn test_to_array_with_element_schema() {
        let schema = to_array(Some("string".into()));
        assert_eq!(cast(&json!("a"), schema.clone()), Ok(Some(json!(["a"]))));
        assert_eq!(
            cast(&json!(["a", 1]), schema.clone()),
            Err(CastError::invalid_type(Path::root().child(1usize)))
        );
        // Empty arrays never reach the element schema.
        assert_eq!(cast_absent(to_array(Some(tripwire()))), Ok(Some(json!([]))));
    }

    #[test]
    fn test_to_plain_object() {
        assert_eq!(cast(&json!({"a": 1}), to_plain_object(None)), Ok(Some(json!({"a": 1}))));
        assert_eq!(cast(&json!(null), to_plain_object(None)), Ok(Some(json!({}))));
        assert_eq!(cast(&json!([1]), to_plain_object(None)), Ok(Some(json!({}))));
        assert_eq!(
            cast(&json!("x"), to_plain_object(Some(json!({"d": true})))),
            Ok(Some(json!({"d": true})))
        );
    }

    #[test]
    fn test_to_object_defaults_fields() {
        let schema = to_object(
            Mapping::new()
                .field("amount", to_finite_number(Some(json!(0))))
                .field("currency", fallback("string", Some(json!("USD")))),
        );
        let expected = Ok(Some(json!({"amount": 0, "currency": "USD"})));
        assert_eq!(cast_absent(schema.clone()), expected);
        assert_eq!(cast(&json!(null), schema.clone()), expected);
        assert_eq!(
            cast(&json!({"amount": "9.99", "currency": "EUR"}), schema),
            Ok(Some(json!({"amount": 9.99, "currency": "EUR"})))
        );
    }

    #[test]
    fn test_to_object_requires_mapping() {
        let err = cast(&json!({}), to_object("string")).unwrap_err();
        assert!(err.is_invalid_schema());
        let err = cast(&json!({}), to_object(Schema::sequence("string"))).unwrap_err();
        assert!(err.is_invalid_schema());
    }

    // Membership is checked as "value is one of the list".
    #[test]
    fn test_enums_value_must_be_member() {
        let schema = enums(vec![json!("kg"), json!("g")]);
        assert_eq!(cast(&json!("kg"), schema.clone()), Ok(Some(json!("kg"))));
        assert_eq!(cast(&json!("lb"), schema.clone()), type_error_at([]));
        assert_eq!(cast(&json!(["kg", "g"]), schema.clone()), type_error_at([]));
        assert_eq!(cast_absent(schema), type_error_at([]));
    }

    #[test]
    fn test_enums_empty_list() {
        let err = cast(&json!("kg"), enums(Vec::new())).unwrap_err();
        assert!(err.is_invalid_schema());
    }

    #[test]
    fn test_one_of() {
        let schema = one_of(vec!["string".into(), "number".into()]);
        assert_eq!(cast(&json!(5), schema.clone()), Ok(Some(json!(5))));
        assert_eq!(cast(&json!("5"), schema.clone()), Ok(Some(json!("5"))));
        assert_eq!(cast(&json!(true), schema), type_error_at([]));
    }

    #[test]
    fn test_one_of_returns_first_success() {
        let schema = either(vec![
            to_finite_number(None).into(),
            Schema::func("never", |_, _, _| Ok(Some(json!("second")))),
        ]);
        assert_eq!(cast(&json!("42"), schema.clone()), Ok(Some(json!(42))));
        // toFiniteNumber without default yields absent, which is still a success.
        assert_eq!(cast(&json!("x"), schema), Ok(None));
    }

    #[test]
    fn test_one_of_error_location() {
        let schema = Mapping::new().field("id", one_of(vec!["string".into(), "number".into()]));
        assert_eq!(cast(&json!({"id": null}), schema), type_error_at(["id"]));
    }

    #[test]
    fn test_one_of_invalid_schema() {
        assert!(cast(&json!(1), one_of(Vec::new())).unwrap_err().is_invalid_schema());
        let err = cast(&json!(true), one_of(vec!["strng".into(), "boolean".into()])).unwrap_err();
        assert!(err.is_invalid_schema());
    }

    #[test]
    fn test_array_one_of() {
        let schema = array_one_of(vec!["string".into(), "number".into()]);
        assert_eq!(cast(&json!(["a", 1]), schema.clone()), Ok(Some(json!(["a", 1]))));
        assert_eq!(
            cast(&json!(["a", true]), schema.clone()),
            Err(CastError::invalid_type(Path::root().child(1usize)))
        );
        assert_eq!(cast(&json!("a"), schema), type_error_at([]));
        assert!(cast(&json!([]), array_one_of(Vec::new())).unwrap_err().is_invalid_schema());
    }

    #[test]
    fn test_array_ordered_cycles_schemas() {
        let schema = array_ordered(vec!["string".into(), "number".into()]);
        assert_eq!(cast(&json!(["a", 1, "b"]), schema.clone()), Ok(Some(json!(["a", 1, "b"]))));
        assert_eq!(
            cast(&json!(["a", 1, 2]), schema.clone()),
            Err(CastError::invalid_type(Path::root().child(2usize)))
        );
        assert_eq!(cast(&json!({}), schema), type_error_at([]));
        assert!(cast(&json!([1]), array_ordered(Vec::new())).unwrap_err().is_invalid_schema());
    }

    #[test]
    fn test_pipe() {
        let schema = pipe(vec![
            to_finite_number(None).into(),
            default(json!(0)).into(),
            "number".into(),
        ]);
        assert_eq!(cast(&json!("3.5kg"), schema.clone()), Ok(Some(json!(3.5))));
        assert_eq!(cast(&json!("heavy"), schema), Ok(Some(json!(0))));
    }

    #[test]
    fn test_pipe_stops_at_first_error() {
        let schema = pipe(vec!["number".into(), tripwire()]);
        assert_eq!(cast(&json!("x"), schema), type_error_at([]));
        assert!(cast(&json!(1), pipe(Vec::new())).unwrap_err().is_invalid_schema());
    }
}
