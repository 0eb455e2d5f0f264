//! PySpark-style comparison coercion over JSON record values.
//!
//! Comparison semantics:
//!
//! - Integer–integer comparisons stay exact; mixed numeric comparisons go
//!   through double.
//! - String values that parse as numbers (e.g. `"123"`, `" 45.6 "`) compare
//!   numerically against numeric operands; non-numeric strings behave as
//!   null under numeric comparison.
//! - String–string comparisons are lexicographic, boolean–boolean order
//!   false < true.
//! - Incompatible operand types (e.g. boolean vs number) are an error, with
//!   a hint rather than a silent mismatch.

use serde_json::Value as JsonValue;
use std::cmp::Ordering;

/// Parse a string as a double the way numeric filters do: surrounding
/// whitespace ignored, anything else unparsable yields `None`.
pub(crate) fn try_to_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok()
}

fn type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "struct",
    }
}

fn compare_f64(left: f64, right: f64) -> Option<Ordering> {
    // NaN (e.g. from parsing "NaN") behaves as null, like a failed coercion.
    left.partial_cmp(&right)
}

fn compare_numbers(left: &serde_json::Number, right: &serde_json::Number) -> Option<Ordering> {
    if let (Some(l), Some(r)) = (left.as_i64(), right.as_i64()) {
        return Some(l.cmp(&r));
    }
    match (left.as_f64(), right.as_f64()) {
        (Some(l), Some(r)) => compare_f64(l, r),
        _ => None,
    }
}

/// Compare two record values under coercion.
///
/// `Ok(None)` means the comparison result is null (an operand was null, or a
/// string failed numeric coercion); `Err` means the operand types are
/// incompatible.
pub(crate) fn compare_values(
    left: &JsonValue,
    right: &JsonValue,
) -> Result<Option<Ordering>, String> {
    match (left, right) {
        (JsonValue::Null, _) | (_, JsonValue::Null) => Ok(None),
        (JsonValue::Number(l), JsonValue::Number(r)) => Ok(compare_numbers(l, r)),
        (JsonValue::String(l), JsonValue::String(r)) => Ok(Some(l.as_str().cmp(r.as_str()))),
        (JsonValue::String(l), JsonValue::Number(r)) => {
            Ok(match (try_to_number(l), r.as_f64()) {
                (Some(lv), Some(rv)) => compare_f64(lv, rv),
                _ => None,
            })
        }
        (JsonValue::Number(l), JsonValue::String(r)) => {
            Ok(match (l.as_f64(), try_to_number(r)) {
                (Some(lv), Some(rv)) => compare_f64(lv, rv),
                _ => None,
            })
        }
        (JsonValue::Bool(l), JsonValue::Bool(r)) => Ok(Some(l.cmp(r))),
        (l, r) => Err(format!(
            "cannot compare {} and {}; hint: align operand types or compare like with like",
            type_name(l),
            type_name(r)
        )),
    }
}

/// Equality under the same coercion rules as [`compare_values`], extended to
/// deep equality for arrays and structs (which have no ordering).
///
/// `Ok(None)` means the result is null.
pub(crate) fn equal_values(left: &JsonValue, right: &JsonValue) -> Result<Option<bool>, String> {
    match (left, right) {
        (JsonValue::Null, _) | (_, JsonValue::Null) => Ok(None),
        (JsonValue::Array(_), JsonValue::Array(_))
        | (JsonValue::Object(_), JsonValue::Object(_)) => Ok(Some(left == right)),
        _ => Ok(compare_values(left, right)?.map(|ord| ord == Ordering::Equal)),
    }
}
