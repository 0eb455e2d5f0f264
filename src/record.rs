//! Record type consumed by expectation evaluation (engine-agnostic).

use crate::error::QualityError;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// A single tabular record: column name -> JSON value. This is the same
/// rows-as-maps shape bindings and collectors exchange, so records move in
/// and out of the evaluator without an engine-specific row type.
pub type Record = HashMap<String, JsonValue>;

/// Build a [`Record`] from a JSON object value.
pub fn record_from_json(value: JsonValue) -> Result<Record, QualityError> {
    match value {
        JsonValue::Object(map) => Ok(map.into_iter().collect()),
        other => Err(QualityError::Parse(format!(
            "expected a JSON object for a record, got: {other}"
        ))),
    }
}

/// Build a batch of records from a JSON array of objects.
pub fn records_from_json(text: &str) -> Result<Vec<Record>, QualityError> {
    let value: JsonValue = serde_json::from_str(text)?;
    match value {
        JsonValue::Array(items) => items.into_iter().map(record_from_json).collect(),
        other => Err(QualityError::Parse(format!(
            "expected a JSON array of records, got: {other}"
        ))),
    }
}

/// Resolve a field on a record, optionally ignoring name case.
///
/// Case-insensitive resolution scans keys; ties go to the exact-case match.
pub(crate) fn lookup_field<'a>(
    record: &'a Record,
    name: &str,
    case_sensitive: bool,
) -> Option<&'a JsonValue> {
    if let Some(value) = record.get(name) {
        return Some(value);
    }
    if case_sensitive {
        return None;
    }
    record
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value)
}

/// Compact single-line rendering with deterministic (sorted) key order,
/// used in error payloads and violation logs.
pub(crate) fn render_record(record: &Record) -> String {
    let map: serde_json::Map<String, JsonValue> = record
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    JsonValue::Object(map).to_string()
}
