//! Integration test: replacing a built-in operator reaches every way of
//! building that operator.
//!
//! Registrations are process-wide, so this file runs as its own test binary
//! and each test replaces a different built-in.

use serde_json::{json, Value};
use validcast_schema::{
    chain, register_chain_operator, validate_and_cast, Arg, Args, CastError, Chain, ChainError,
    Path, Schema,
};

fn cast(value: &Value, schema: impl Into<Schema>) -> Result<Option<Value>, CastError> {
    validate_and_cast(Some(value), &schema.into())
}

#[test]
fn test_replaced_builtin_reaches_typed_methods() {
    register_chain_operator("toArray", |_args: &[Arg]| {
        Ok(Schema::func("replaced", |_, _, _| Ok(Some(json!("replaced")))))
    });

    let typed = Chain::new().to_array(None);
    let by_name = chain("toArray", &[]).unwrap();
    let by_op = Chain::new().op("toArray", &[]).unwrap();
    let from_doc = Schema::from_document(&json!({"$op": "toArray"})).unwrap();

    for schema in [
        Schema::from(typed),
        Schema::from(by_name),
        Schema::from(by_op),
        from_doc,
    ] {
        assert_eq!(cast(&json!(1), schema), Ok(Some(json!("replaced"))));
    }
}

#[test]
fn test_replacement_rejecting_typed_arguments() {
    register_chain_operator("enums", |args: &[Arg]| {
        let args = Args::new("enums", args);
        if args.len() != 2 {
            return Err(ChainError::MissingArgument {
                operator: "enums".to_string(),
                index: 1,
            });
        }
        Ok(Schema::from("string"))
    });

    let schema = Schema::from(Chain::new().enums(vec![json!("kg")]));
    let err = cast(&json!("kg"), schema).unwrap_err();
    assert!(err.is_invalid_schema());
    assert_eq!(err.path(), &Path::root());
}

#[test]
fn test_replacement_used_inside_existing_pipeline() {
    let prefix = Chain::new().to_finite_number(None);
    register_chain_operator("default", |_args: &[Arg]| {
        Ok(Schema::func("default", |value, _, _| {
            Ok(Some(value.cloned().unwrap_or(json!(-1))))
        }))
    });

    // Stages appended after the replacement use it.
    let schema = Schema::from(prefix.default(json!(0)));
    assert_eq!(cast(&json!("n/a"), schema), Ok(Some(json!(-1))));
}
