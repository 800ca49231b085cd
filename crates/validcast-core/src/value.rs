//! # Value Helpers
//!
//! Helpers over `serde_json::Value` used by the engine and the coercion
//! primitives. "Absent" is modelled as `None`; JSON `null` is
//! `Some(Value::Null)`.

use serde_json::{Number, Value};

/// Largest integer magnitude that an `f64` represents exactly (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Returns true if `value` is present and is a structural record.
pub fn is_plain_object(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Object(_)))
}

/// Short name of the runtime kind of `value`, for diagnostics.
pub fn kind_name(value: Option<&Value>) -> &'static str {
    match value {
        None => "undefined",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}

/// Build a JSON number from `f`.
///
/// Integral values within ±2^53 are stored as integers so that `1.0` and `1`
/// compare and print the same. Returns `None` for non-finite input.
pub fn number_from_f64(f: f64) -> Option<Value> {
    if !f.is_finite() {
        return None;
    }
    if f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER {
        return Some(Value::from(f as i64));
    }
    Number::from_f64(f).map(Value::Number)
}

/// Lenient float parsing with leading-numeric-prefix semantics.
///
/// The value is first projected to its string form (see [`loose_string`]),
/// then the longest numeric prefix after leading whitespace is parsed.
/// `"12.5abc"` gives `12.5`; `""` and `"abc"` give `None`. `"Infinity"` is
/// recognized and yields an infinite result, which callers reject as
/// non-finite.
pub fn parse_float(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        other => parse_float_prefix(&loose_string(other)),
    }
}

/// String projection used for numeric coercion.
///
/// Strings are themselves, numbers and booleans use their literal form,
/// sequences join their elements with `,` (null elements contribute an
/// empty string). Records project to `[object Object]`, which has no
/// numeric prefix.
pub fn loose_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => loose_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => OBJECT_STRING.to_string(),
    }
}

const OBJECT_STRING: &str = "[object Object]";

/// Whitespace skipped before a numeric prefix: the `WhiteSpace` and
/// `LineTerminator` code points, which excludes U+0085.
fn is_leading_whitespace(c: char) -> bool {
    matches!(
        c,
        '\u{9}'
            | '\u{a}'
            | '\u{b}'
            | '\u{c}'
            | '\u{d}'
            | ' '
            | '\u{a0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200a}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202f}'
            | '\u{205f}'
            | '\u{3000}'
            | '\u{feff}'
    )
}

/// Parse the longest decimal prefix of `s`, after leading whitespace.
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start_matches(is_leading_whitespace);
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    if s[end..].starts_with("Infinity") {
        return Some(if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    // Exponent counts only when at least one digit follows it.
    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}
