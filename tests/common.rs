//! Shared helpers for integration tests (suite and record setup).

use rowguard::{record_from_json, ExpectationSuite, Record};
use serde_json::{json, Value};

/// Create a suite with a descriptive app name for tests.
pub fn suite() -> ExpectationSuite {
    ExpectationSuite::builder()
        .app_name("rowguard_tests")
        .build()
}

/// Build one record from a JSON object literal.
pub fn rec(value: Value) -> Record {
    record_from_json(value).expect("test record must be a JSON object")
}

/// Convenience helper for a batch of single-column `qty` records.
pub fn qty_records(values: &[i64]) -> Vec<Record> {
    values.iter().map(|v| rec(json!({ "qty": v }))).collect()
}
