//! Registration-order semantics: short-circuits and tie-breaks when several
//! expectations fail on the same record.

mod common;

use common::{qty_records, rec, suite};
use rowguard::{col, Expectation, QualityError};
use serde_json::json;

#[test]
fn test_fail_registered_first_wins_over_drop() {
    let mut suite = suite();
    suite
        .register(Expectation::fail("qty_not_negative", col("qty").ge(0)))
        .unwrap();
    suite
        .register(Expectation::drop("qty_positive", col("qty").gt(0)))
        .unwrap();

    let err = suite.run(qty_records(&[-1])).unwrap_err();
    match err {
        QualityError::Failure(failure) => {
            assert_eq!(failure.expectation, "qty_not_negative");
            // The drop rule never ran for this record.
            assert_eq!(failure.counts.get("qty_positive"), 0);
        }
        other => panic!("expected a failure abort, got: {other:?}"),
    }
}

#[test]
fn test_drop_registered_first_shields_fail() {
    let mut suite = suite();
    suite
        .register(Expectation::drop("qty_positive", col("qty").gt(0)))
        .unwrap();
    suite
        .register(Expectation::fail("qty_not_negative", col("qty").ge(0)))
        .unwrap();

    // The drop short-circuits the record before the fail rule sees it, so
    // the run completes.
    let report = suite.run(qty_records(&[-1, 5])).unwrap();
    assert_eq!(report.records, qty_records(&[5]));
    assert_eq!(report.counts.get("qty_positive"), 1);
    assert_eq!(report.counts.get("qty_not_negative"), 0);
}

#[test]
fn test_warn_before_drop_both_count() {
    let mut suite = suite();
    suite
        .register(Expectation::warn("qty_under_100", col("qty").lt(100)))
        .unwrap();
    suite
        .register(Expectation::drop("qty_positive", col("qty").gt(0)))
        .unwrap();

    // -500 violates both: the warn counts first, then the drop excludes.
    let report = suite.run(qty_records(&[-500, 1])).unwrap();
    assert_eq!(report.records, qty_records(&[1]));
    assert_eq!(report.counts.get("qty_under_100"), 1);
    assert_eq!(report.counts.get("qty_positive"), 1);
}

#[test]
fn test_abort_reports_counts_accumulated_so_far() {
    let mut suite = suite();
    suite
        .register(Expectation::warn("qty_under_100", col("qty").lt(100)))
        .unwrap();
    suite
        .register(Expectation::fail("qty_positive", col("qty").gt(0)))
        .unwrap();

    // Record 0 warns; record 1 warns and then fails.
    let err = suite.run(qty_records(&[150, -200])).unwrap_err();
    match err {
        QualityError::Failure(failure) => {
            assert_eq!(failure.position, 1);
            assert_eq!(failure.record, rec(json!({"qty": -200})));
            assert_eq!(failure.counts.get("qty_under_100"), 1);
            assert_eq!(failure.counts.get("qty_positive"), 1);
        }
        other => panic!("expected a failure abort, got: {other:?}"),
    }
}

#[test]
fn test_evaluated_iterator_fuses_after_abort() {
    let mut suite = suite();
    suite
        .register(Expectation::fail("qty_positive", col("qty").gt(0)))
        .unwrap();

    let mut evaluated = suite.evaluate(qty_records(&[1, -1, 2]));
    assert!(evaluated.next().unwrap().is_ok());
    assert!(evaluated.next().unwrap().is_err());
    // Nothing is pulled past the abort, even though input remains.
    assert!(evaluated.next().is_none());
    assert_eq!(evaluated.position(), 2);
    assert_eq!(evaluated.into_counts().get("qty_positive"), 1);
}

#[test]
fn test_counts_observable_mid_stream() {
    let mut suite = suite();
    suite
        .register(Expectation::warn("qty_positive", col("qty").gt(0)))
        .unwrap();

    let mut evaluated = suite.evaluate(qty_records(&[-1, -2, 3]));
    let first = evaluated.next().unwrap().unwrap();
    assert_eq!(first["qty"], json!(-1));
    assert_eq!(evaluated.counts().get("qty_positive"), 1);

    evaluated.next().unwrap().unwrap();
    assert_eq!(evaluated.counts().get("qty_positive"), 2);

    evaluated.next().unwrap().unwrap();
    assert!(evaluated.next().is_none());
    assert_eq!(evaluated.into_counts().get("qty_positive"), 2);
}
