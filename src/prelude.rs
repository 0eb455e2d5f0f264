//! One-stop prelude for application code.
//!
//! Use `use rowguard::prelude::*` to get the most common types and
//! functions. For the full API, see the crate root and [`crate::functions`].

pub use crate::column::Column;
pub use crate::config::{PredicateErrorPolicy, QualityConfig};
pub use crate::error::{QualityError, QualityFailure};
pub use crate::expectation::{Action, Expectation, RowPredicate};
pub use crate::expr::{Expr, Literal};
pub use crate::functions::{
    abs, col, length, lit_bool, lit_f64, lit_i32, lit_i64, lit_null, lit_str, lower, to_date,
    to_timestamp, trim, upper,
};
pub use crate::record::{record_from_json, records_from_json, Record};
pub use crate::report::{RunReport, ViolationCounts};
pub use crate::schema::{DataType, StructField, StructType};
pub use crate::source::{RecordSource, Rows};
pub use crate::suite::{Evaluated, ExpectationSuite, ExpectationSuiteBuilder};
