//! Record sources, schema snapshots, and report rendering.

mod common;

use common::{qty_records, suite};
use rowguard::{
    col, to_date, DataType, Expectation, QualityError, RecordSource, Rows, StructField, StructType,
};
use serde_json::json;

#[test]
fn test_rows_from_json_end_to_end() {
    let mut guard = suite();
    guard
        .register(Expectation::drop("positive_qty", col("qty").gt(0)))
        .unwrap();
    guard
        .register(Expectation::warn("qty_under_100", col("qty").lt(100)))
        .unwrap();

    let rows = Rows::from_json(r#"[{"qty": 1}, {"qty": -1}, {"qty": 150}]"#).unwrap();
    let report = guard.run_source(&rows).unwrap();

    assert_eq!(report.records.len(), 2);
    assert_eq!(report.counts.get("positive_qty"), 1);
    assert_eq!(report.counts.get("qty_under_100"), 1);
}

#[test]
fn test_rows_parse_errors() {
    assert!(matches!(
        Rows::from_json("not json").unwrap_err(),
        QualityError::Parse(_)
    ));
    assert!(matches!(
        Rows::from_json(r#"[[1, 2]]"#).unwrap_err(),
        QualityError::Parse(_)
    ));
}

#[test]
fn test_source_schema_reaches_evaluation() {
    let mut guard = suite();
    guard
        .register(Expectation::warn("has_amount", col("amount").is_not_null()))
        .unwrap();

    let rows = Rows::new(qty_records(&[1])).with_schema(StructType::new(vec![StructField::new(
        "qty",
        DataType::Long,
        true,
    )]));

    // Missing column is a predicate error; under the default policy the
    // record survives and the violation is counted.
    let mut evaluated = guard.evaluate_source(&rows);
    assert!(evaluated.next().unwrap().is_ok());
    assert_eq!(evaluated.counts().get("has_amount"), 1);
}

#[test]
fn test_report_json_rendering() {
    let mut guard = suite();
    guard
        .register(Expectation::drop("positive_qty", col("qty").gt(0)))
        .unwrap();
    guard
        .register(Expectation::warn("qty_under_100", col("qty").lt(100)))
        .unwrap();

    let report = guard.run(qty_records(&[1, -2])).unwrap();
    let rendered = report.to_json();

    assert_eq!(rendered["records"], json!([{"qty": 1}]));
    assert_eq!(
        rendered["counts"],
        json!([
            {"expectation": "positive_qty", "violations": 1},
            {"expectation": "qty_under_100", "violations": 0},
        ])
    );
}

#[test]
fn test_date_predicates_over_sources() {
    let mut guard = suite();
    guard
        .register(Expectation::drop(
            "shipped_after_ordered",
            to_date(&col("shipped")).ge(to_date(&col("ordered"))),
        ))
        .unwrap();

    let rows = Rows::from_json(
        r#"[
            {"ordered": "2024-01-10", "shipped": "2024-01-12"},
            {"ordered": "2024-01-10", "shipped": "2024-01-02"}
        ]"#,
    )
    .unwrap();

    let report = guard.run_source(&rows).unwrap();
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0]["shipped"], json!("2024-01-12"));
    assert_eq!(report.counts.get("shipped_after_ordered"), 1);
}

#[test]
fn test_custom_source_implementation() {
    struct Countdown(u8);

    impl RecordSource for Countdown {
        fn records(&self) -> Box<dyn Iterator<Item = rowguard::Record> + '_> {
            let n = self.0;
            Box::new((0..n).rev().map(|i| {
                let mut record = rowguard::Record::new();
                record.insert("qty".to_string(), json!(i64::from(i)));
                record
            }))
        }
    }

    let mut guard = suite();
    guard
        .register(Expectation::drop("positive_qty", col("qty").gt(0)))
        .unwrap();

    let report = guard.run_source(&Countdown(3)).unwrap();
    // 2, 1 survive; 0 violates.
    assert_eq!(report.records.len(), 2);
    assert_eq!(report.counts.get("positive_qty"), 1);
}
