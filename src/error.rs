//! Error types for expectation registration and evaluation.
//!
//! Use [`QualityError`] when you want to map registration and evaluation
//! failures to a single type (e.g. for FFI or a CLI) without depending on
//! the surrounding pipeline's error types.

use crate::record::{render_record, Record};
use crate::report::ViolationCounts;
use std::fmt;

/// Payload of a FAIL-action abort.
///
/// Carries the expectation that fired, the offending record and its
/// zero-based position in iteration order, and the violation counts
/// accumulated up to and including this violation.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityFailure {
    pub expectation: String,
    pub position: usize,
    pub record: Record,
    pub counts: ViolationCounts,
}

impl fmt::Display for QualityFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expectation '{}' failed at record {}: {}",
            self.expectation,
            self.position,
            render_record(&self.record)
        )
    }
}

/// Unified error type for rowguard operations.
#[derive(Debug, Clone, PartialEq)]
pub enum QualityError {
    /// An expectation with this name is already registered.
    DuplicateName { name: String },
    /// A FAIL-action expectation fired and aborted the run.
    Failure(QualityFailure),
    /// A predicate's own evaluation failed (missing field, incompatible
    /// types, unparsable value). Whether this aborts depends on the
    /// configured [`PredicateErrorPolicy`](crate::config::PredicateErrorPolicy).
    Predicate {
        expectation: String,
        position: usize,
        message: String,
    },
    /// Malformed input rows (e.g. a JSON array whose elements are not objects).
    Parse(String),
}

impl fmt::Display for QualityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityError::DuplicateName { name } => {
                write!(f, "expectation '{name}' is already registered")
            }
            QualityError::Failure(failure) => write!(f, "{failure}"),
            QualityError::Predicate {
                expectation,
                position,
                message,
            } => write!(
                f,
                "predicate of expectation '{expectation}' errored at record {position}: {message}"
            ),
            QualityError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for QualityError {}

impl From<serde_json::Error> for QualityError {
    fn from(e: serde_json::Error) -> Self {
        QualityError::Parse(e.to_string())
    }
}

impl From<QualityFailure> for QualityError {
    fn from(failure: QualityFailure) -> Self {
        QualityError::Failure(failure)
    }
}
