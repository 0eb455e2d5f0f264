//! Expectations: named predicates bound to a severity action.

use crate::column::Column;
use crate::error::QualityError;
use crate::expr::{EvalContext, Expr};
use crate::record::Record;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// What happens when a record violates an expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Count and log the violation; keep the record.
    Warn,
    /// Count the violation; exclude the record from the output.
    Drop,
    /// Count the violation; abort the whole evaluation.
    Fail,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Warn => write!(f, "warn"),
            Action::Drop => write!(f, "drop"),
            Action::Fail => write!(f, "fail"),
        }
    }
}

/// Native predicate over a record. Implemented for you when registering a
/// closure via [`Expectation::warn_fn`] and friends.
pub trait RowPredicate: Send + Sync {
    fn test(&self, record: &Record) -> Result<bool, QualityError>;
}

struct FnPredicate<F>
where
    F: Fn(&Record) -> Result<bool, QualityError> + Send + Sync,
{
    f: F,
}

impl<F> RowPredicate for FnPredicate<F>
where
    F: Fn(&Record) -> Result<bool, QualityError> + Send + Sync,
{
    fn test(&self, record: &Record) -> Result<bool, QualityError> {
        (self.f)(record)
    }
}

#[derive(Clone)]
pub(crate) enum PredicateKind {
    Expr(Expr),
    Native(Arc<dyn RowPredicate>),
}

impl fmt::Debug for PredicateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredicateKind::Expr(expr) => f.debug_tuple("Expr").field(expr).finish(),
            PredicateKind::Native(_) => f.write_str("Native(..)"),
        }
    }
}

/// Per-record outcome of one expectation's predicate.
pub(crate) enum Check {
    Pass,
    Violation,
    Error(String),
}

/// A named data-quality rule: predicate plus action.
///
/// Predicates must be pure functions of the record; the evaluator may call
/// them once per record per run in registration order.
#[derive(Debug, Clone)]
pub struct Expectation {
    name: String,
    description: String,
    predicate: PredicateKind,
    action: Action,
}

impl Expectation {
    /// Declare an expectation from a column predicate.
    pub fn new(name: impl Into<String>, predicate: Column, action: Action) -> Self {
        Expectation {
            name: name.into(),
            description: predicate.name().to_string(),
            predicate: PredicateKind::Expr(predicate.into_expr()),
            action,
        }
    }

    pub fn warn(name: impl Into<String>, predicate: Column) -> Self {
        Self::new(name, predicate, Action::Warn)
    }

    pub fn drop(name: impl Into<String>, predicate: Column) -> Self {
        Self::new(name, predicate, Action::Drop)
    }

    pub fn fail(name: impl Into<String>, predicate: Column) -> Self {
        Self::new(name, predicate, Action::Fail)
    }

    /// Declare an expectation from a native closure. The closure sees the
    /// whole record and reports its own evaluation failures as `Err`.
    pub fn from_fn<F>(name: impl Into<String>, action: Action, f: F) -> Self
    where
        F: Fn(&Record) -> Result<bool, QualityError> + Send + Sync + 'static,
    {
        let name = name.into();
        Expectation {
            description: format!("<native {name}>"),
            name,
            predicate: PredicateKind::Native(Arc::new(FnPredicate { f })),
            action,
        }
    }

    pub fn warn_fn<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Record) -> Result<bool, QualityError> + Send + Sync + 'static,
    {
        Self::from_fn(name, Action::Warn, f)
    }

    pub fn drop_fn<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Record) -> Result<bool, QualityError> + Send + Sync + 'static,
    {
        Self::from_fn(name, Action::Drop, f)
    }

    pub fn fail_fn<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Record) -> Result<bool, QualityError> + Send + Sync + 'static,
    {
        Self::from_fn(name, Action::Fail, f)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable form of the predicate, e.g. `(qty > 0)`.
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn action(&self) -> Action {
        self.action
    }

    /// Run the predicate against one record. A null result is a violation
    /// (only true passes); the predicate's own failures surface as
    /// [`Check::Error`].
    pub(crate) fn check(&self, record: &Record, ctx: &EvalContext) -> Check {
        match &self.predicate {
            PredicateKind::Expr(expr) => match expr.eval_predicate(record, ctx) {
                Ok(Some(true)) => Check::Pass,
                Ok(Some(false)) | Ok(None) => Check::Violation,
                Err(e) => Check::Error(e.0),
            },
            PredicateKind::Native(predicate) => match predicate.test(record) {
                Ok(true) => Check::Pass,
                Ok(false) => Check::Violation,
                Err(e) => Check::Error(e.to_string()),
            },
        }
    }
}
