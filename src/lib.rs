//! rowguard - row-level data-quality expectations for tabular pipelines.
//!
//! Declare named boolean predicates bound to a severity action (warn, drop,
//! fail), register them on an [`ExpectationSuite`], and evaluate an ordered
//! stream of records: warn-only violations are counted and logged, drop
//! violations exclude the record, and a fail violation aborts the run with
//! the offending record and the counts accumulated so far.
//!
//! ```
//! use rowguard::{col, Expectation, ExpectationSuite, Rows};
//!
//! let mut suite = ExpectationSuite::builder().app_name("orders").build();
//! suite.register(Expectation::drop("positive_qty", col("qty").gt(0)))?;
//! suite.register(Expectation::warn("qty_under_100", col("qty").lt(100)))?;
//!
//! let rows = Rows::from_json(r#"[{"qty": 1}, {"qty": -1}, {"qty": 2}]"#)?;
//! let report = suite.run_source(&rows)?;
//! assert_eq!(report.records.len(), 2);
//! assert_eq!(report.counts.get("positive_qty"), 1);
//! # Ok::<(), rowguard::QualityError>(())
//! ```

pub mod column;
pub mod config;
pub mod error;
pub mod expectation;
pub mod expr;
pub mod functions;
pub mod prelude;
pub mod record;
pub mod report;
pub mod schema;
pub mod source;
pub mod suite;

mod date_utils;
mod type_coercion;

pub use column::Column;
pub use config::{PredicateErrorPolicy, QualityConfig};
pub use error::{QualityError, QualityFailure};
pub use expectation::{Action, Expectation, RowPredicate};
pub use expr::{Expr, Literal};
pub use functions::{col, to_date};
pub use record::{record_from_json, records_from_json, Record};
pub use report::{RunReport, ViolationCounts};
pub use schema::{DataType, StructField, StructType};
pub use source::{RecordSource, Rows};
pub use suite::{Evaluated, ExpectationSuite, ExpectationSuiteBuilder};
