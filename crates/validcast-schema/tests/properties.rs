//! Property tests for the engine and the built-in primitives.

use proptest::prelude::*;
use serde_json::Value;
use validcast_schema::primitives::{
    default, fallback, optional, to_array, to_finite_number, to_object, to_plain_object,
};
use validcast_schema::{validate_and_cast, CastError, CastResult, Mapping, Path, Schema};

/// Cast `value`, then cast the result again with the same schema.
fn cast_twice(value: Option<&Value>, schema: &Schema) -> (CastResult, Option<CastResult>) {
    let once = validate_and_cast(value, schema);
    let twice = match &once {
        Ok(cast) => Some(validate_and_cast(cast.as_ref(), schema)),
        Err(_) => None,
    };
    (once, twice)
}

/// Arbitrary float-free JSON values.
fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| serde_json::json!(n)),
        "[a-zA-Z0-9_. -]{0,20}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,8}", inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    /// The string tag accepts exactly strings and returns them unchanged.
    #[test]
    fn string_tag_accepts_only_strings(value in json_value()) {
        let out = validate_and_cast(Some(&value), &Schema::from("string"));
        if value.is_string() {
            prop_assert_eq!(out, Ok(Some(value)));
        } else {
            prop_assert_eq!(out, Err(CastError::invalid_type(Path::root())));
        }
    }

    /// Wildcard sequences return arrays unchanged.
    #[test]
    fn wildcard_sequence_is_identity(items in prop::collection::vec(json_value(), 0..6)) {
        let value = Value::Array(items);
        prop_assert_eq!(
            validate_and_cast(Some(&value), &Schema::any_array()),
            Ok(Some(value.clone()))
        );
    }

    /// An open mapping with no declared keys passes records through.
    #[test]
    fn open_empty_mapping_is_identity(value in json_value()) {
        let out = validate_and_cast(Some(&value), &Mapping::new().into());
        if value.is_object() {
            prop_assert_eq!(out, Ok(Some(value)));
        } else {
            prop_assert!(out.is_err());
        }
    }

    /// `optional` never turns an absent value into a present one.
    #[test]
    fn optional_keeps_absent(tag in "(string|number|boolean)") {
        let schema = Schema::from(optional(Schema::Tag(tag)));
        prop_assert_eq!(validate_and_cast(None, &schema), Ok(None));
    }

    /// `fallback` over a tag always succeeds with either the value or the default.
    #[test]
    fn fallback_never_fails(value in json_value(), default in json_value()) {
        let schema = Schema::from(fallback("number", Some(default.clone())));
        let out = validate_and_cast(Some(&value), &schema);
        if value.is_number() {
            prop_assert_eq!(out, Ok(Some(value)));
        } else {
            prop_assert_eq!(out, Ok(Some(default)));
        }
    }

    /// `toArray` without an element schema always yields an array.
    #[test]
    fn to_array_yields_array(value in json_value()) {
        let out = validate_and_cast(Some(&value), &to_array(None).into());
        let out = out.ok().flatten();
        prop_assert!(matches!(out, Some(Value::Array(_))));
    }

    /// Casting an already cast number again changes nothing.
    #[test]
    fn to_finite_number_is_idempotent(value in json_value()) {
        let schema = Schema::from(to_finite_number(Some(serde_json::json!(0))));
        let once = validate_and_cast(Some(&value), &schema).ok().flatten();
        prop_assert!(once.is_some());
        let twice = validate_and_cast(once.as_ref(), &schema).ok().flatten();
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn to_array_is_idempotent(value in json_value()) {
        let schema = Schema::from(to_array(None));
        let (once, twice) = cast_twice(Some(&value), &schema);
        prop_assert!(once.is_ok());
        prop_assert_eq!(twice, Some(once));
    }

    #[test]
    fn to_array_with_element_is_idempotent(value in json_value()) {
        let element = Schema::from(fallback("string", Some(Value::from(""))));
        let schema = Schema::from(to_array(Some(element)));
        let (once, twice) = cast_twice(Some(&value), &schema);
        prop_assert!(once.is_ok());
        prop_assert_eq!(twice, Some(once));
    }

    #[test]
    fn to_plain_object_is_idempotent(value in prop::option::of(json_value())) {
        let schema = Schema::from(to_plain_object(None));
        let (once, twice) = cast_twice(value.as_ref(), &schema);
        prop_assert!(matches!(once, Ok(Some(Value::Object(_)))));
        prop_assert_eq!(twice, Some(once));
    }

    #[test]
    fn to_object_is_idempotent(value in prop::option::of(json_value())) {
        let schema = Schema::from(to_object(
            Mapping::new()
                .field("n", to_finite_number(Some(Value::from(0))))
                .field("s", fallback("string", Some(Value::from("none"))))
                .field("tags", to_array(None)),
        ));
        let (once, twice) = cast_twice(value.as_ref(), &schema);
        prop_assert!(matches!(once, Ok(Some(Value::Object(_)))));
        prop_assert_eq!(twice, Some(once));
    }

    #[test]
    fn fallback_is_idempotent(value in json_value(), default_value in json_value()) {
        let schema = Schema::from(fallback("boolean", Some(default_value)));
        let (once, twice) = cast_twice(Some(&value), &schema);
        prop_assert!(once.is_ok());
        prop_assert_eq!(twice, Some(once));
    }

    #[test]
    fn default_is_idempotent(value in prop::option::of(json_value()), default_value in json_value()) {
        let schema = Schema::from(default(default_value));
        let (once, twice) = cast_twice(value.as_ref(), &schema);
        prop_assert!(matches!(once, Ok(Some(_))));
        prop_assert_eq!(twice, Some(once));
    }
}
