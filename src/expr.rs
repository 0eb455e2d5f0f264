//! Engine-agnostic predicate expression IR and its row interpreter.
//!
//! [`Expr`] is a single serializable tree; evaluation interprets it directly
//! over a [`Record`] with SQL three-valued logic. Only `true` satisfies a
//! predicate; a null result counts against the expectation.

use crate::date_utils::{parse_date, parse_timestamp};
use crate::record::{lookup_field, Record};
use crate::type_coercion::{compare_values, equal_values, try_to_number};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::cmp::Ordering;
use std::fmt;

/// Literal value in an expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Null,
}

impl Literal {
    pub(crate) fn to_value(&self) -> JsonValue {
        match self {
            Literal::Int(n) => JsonValue::from(*n),
            Literal::Float(n) => JsonValue::from(*n),
            Literal::Str(s) => JsonValue::from(s.clone()),
            Literal::Bool(b) => JsonValue::from(*b),
            Literal::Null => JsonValue::Null,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(n) => write!(f, "{n}"),
            Literal::Float(n) => write!(f, "{n}"),
            Literal::Str(s) => write!(f, "'{s}'"),
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Null => write!(f, "NULL"),
        }
    }
}

impl From<i32> for Literal {
    fn from(n: i32) -> Self {
        Literal::Int(i64::from(n))
    }
}

impl From<i64> for Literal {
    fn from(n: i64) -> Self {
        Literal::Int(n)
    }
}

impl From<f64> for Literal {
    fn from(n: f64) -> Self {
        Literal::Float(n)
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Bool(b)
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::Str(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::Str(s)
    }
}

/// Predicate expression tree. Build through [`Column`](crate::column::Column)
/// and [`functions`](crate::functions) rather than by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Column reference, resolved against the record at evaluation time.
    Column(String),
    Lit(Literal),

    // --- Comparison ---
    Eq(Box<Expr>, Box<Expr>),
    Ne(Box<Expr>, Box<Expr>),
    Gt(Box<Expr>, Box<Expr>),
    Ge(Box<Expr>, Box<Expr>),
    Lt(Box<Expr>, Box<Expr>),
    Le(Box<Expr>, Box<Expr>),

    // --- Logical (three-valued) ---
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),

    // --- Arithmetic ---
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),

    Between {
        expr: Box<Expr>,
        lower: Box<Expr>,
        upper: Box<Expr>,
    },
    IsIn {
        expr: Box<Expr>,
        values: Vec<Literal>,
    },
    IsNull(Box<Expr>),
    IsNotNull(Box<Expr>),

    /// Built-in scalar function call (length, lower, upper, trim, abs,
    /// to_date, to_timestamp).
    Call {
        name: String,
        args: Vec<Expr>,
    },
}

/// Evaluation-time settings threaded down from the suite config.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EvalContext {
    pub case_sensitive: bool,
}

/// Failure of an expression's own evaluation (missing column, bad types).
/// The suite wraps this with the expectation name and record position.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EvalError(pub String);

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn value_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "struct",
    }
}

/// Numeric operand after coercion; integers stay exact until mixed with
/// doubles.
enum NumOperand {
    Int(i64),
    Float(f64),
}

fn to_numeric(value: &JsonValue, op: &str) -> Result<Option<NumOperand>, EvalError> {
    match value {
        JsonValue::Null => Ok(None),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Some(NumOperand::Int(i)))
            } else {
                n.as_f64()
                    .map(|f| Some(NumOperand::Float(f)))
                    .ok_or_else(|| EvalError(format!("non-finite number in {op}")))
            }
        }
        // Strings coerce through double; unparsable strings behave as null.
        JsonValue::String(s) => Ok(try_to_number(s).map(NumOperand::Float)),
        other => Err(EvalError(format!(
            "cannot apply {op} to {}",
            value_type_name(other)
        ))),
    }
}

fn kleene_and(a: Option<bool>, b: Option<bool>) -> Option<bool> {
    match (a, b) {
        (Some(false), _) | (_, Some(false)) => Some(false),
        (Some(true), Some(true)) => Some(true),
        _ => None,
    }
}

fn kleene_or(a: Option<bool>, b: Option<bool>) -> Option<bool> {
    match (a, b) {
        (Some(true), _) | (_, Some(true)) => Some(true),
        (Some(false), Some(false)) => Some(false),
        _ => None,
    }
}

fn tristate(value: &JsonValue, op: &str) -> Result<Option<bool>, EvalError> {
    match value {
        JsonValue::Null => Ok(None),
        JsonValue::Bool(b) => Ok(Some(*b)),
        other => Err(EvalError(format!(
            "{op} operand must be boolean, got {}",
            value_type_name(other)
        ))),
    }
}

fn bool_value(tri: Option<bool>) -> JsonValue {
    match tri {
        Some(b) => JsonValue::Bool(b),
        None => JsonValue::Null,
    }
}

impl Expr {
    /// Evaluate the expression against one record.
    pub(crate) fn eval(
        &self,
        record: &Record,
        ctx: &EvalContext,
    ) -> Result<JsonValue, EvalError> {
        match self {
            Expr::Column(name) => lookup_field(record, name, ctx.case_sensitive)
                .cloned()
                .ok_or_else(|| EvalError(format!("column '{name}' not found in record"))),
            Expr::Lit(lit) => Ok(lit.to_value()),

            Expr::Eq(l, r) => {
                let (lv, rv) = (l.eval(record, ctx)?, r.eval(record, ctx)?);
                Ok(bool_value(equal_values(&lv, &rv).map_err(EvalError)?))
            }
            Expr::Ne(l, r) => {
                let (lv, rv) = (l.eval(record, ctx)?, r.eval(record, ctx)?);
                Ok(bool_value(
                    equal_values(&lv, &rv).map_err(EvalError)?.map(|b| !b),
                ))
            }
            Expr::Gt(l, r) => Self::eval_ordering(l, r, record, ctx, |ord| ord == Ordering::Greater),
            Expr::Ge(l, r) => Self::eval_ordering(l, r, record, ctx, |ord| ord != Ordering::Less),
            Expr::Lt(l, r) => Self::eval_ordering(l, r, record, ctx, |ord| ord == Ordering::Less),
            Expr::Le(l, r) => Self::eval_ordering(l, r, record, ctx, |ord| ord != Ordering::Greater),

            Expr::And(l, r) => {
                let lv = tristate(&l.eval(record, ctx)?, "AND")?;
                let rv = tristate(&r.eval(record, ctx)?, "AND")?;
                Ok(bool_value(kleene_and(lv, rv)))
            }
            Expr::Or(l, r) => {
                let lv = tristate(&l.eval(record, ctx)?, "OR")?;
                let rv = tristate(&r.eval(record, ctx)?, "OR")?;
                Ok(bool_value(kleene_or(lv, rv)))
            }
            Expr::Not(inner) => {
                let v = tristate(&inner.eval(record, ctx)?, "NOT")?;
                Ok(bool_value(v.map(|b| !b)))
            }

            Expr::Add(l, r) => Self::eval_arith(l, r, record, ctx, "+"),
            Expr::Sub(l, r) => Self::eval_arith(l, r, record, ctx, "-"),
            Expr::Mul(l, r) => Self::eval_arith(l, r, record, ctx, "*"),
            Expr::Div(l, r) => {
                let lv = to_numeric(&l.eval(record, ctx)?, "/")?;
                let rv = to_numeric(&r.eval(record, ctx)?, "/")?;
                match (lv, rv) {
                    (Some(lv), Some(rv)) => {
                        let (lf, rf) = (operand_f64(lv), operand_f64(rv));
                        // Division always goes through double; a zero divisor
                        // yields null rather than a crash.
                        if rf == 0.0 {
                            Ok(JsonValue::Null)
                        } else {
                            Ok(JsonValue::from(lf / rf))
                        }
                    }
                    _ => Ok(JsonValue::Null),
                }
            }

            Expr::Between { expr, lower, upper } => {
                let v = expr.eval(record, ctx)?;
                let lo = lower.eval(record, ctx)?;
                let hi = upper.eval(record, ctx)?;
                let above = compare_values(&v, &lo)
                    .map_err(EvalError)?
                    .map(|ord| ord != Ordering::Less);
                let below = compare_values(&v, &hi)
                    .map_err(EvalError)?
                    .map(|ord| ord != Ordering::Greater);
                Ok(bool_value(kleene_and(above, below)))
            }
            Expr::IsIn { expr, values } => {
                let v = expr.eval(record, ctx)?;
                if v.is_null() {
                    return Ok(JsonValue::Null);
                }
                let mut saw_null = false;
                for candidate in values {
                    match equal_values(&v, &candidate.to_value()).map_err(EvalError)? {
                        Some(true) => return Ok(JsonValue::Bool(true)),
                        Some(false) => {}
                        None => saw_null = true,
                    }
                }
                if saw_null {
                    Ok(JsonValue::Null)
                } else {
                    Ok(JsonValue::Bool(false))
                }
            }
            Expr::IsNull(inner) => Ok(JsonValue::Bool(inner.eval(record, ctx)?.is_null())),
            Expr::IsNotNull(inner) => Ok(JsonValue::Bool(!inner.eval(record, ctx)?.is_null())),

            Expr::Call { name, args } => Self::eval_call(name, args, record, ctx),
        }
    }

    /// Evaluate as a predicate: `Some(true)` passes, `Some(false)` and
    /// `None` (null) are violations, a non-boolean result is an error.
    pub(crate) fn eval_predicate(
        &self,
        record: &Record,
        ctx: &EvalContext,
    ) -> Result<Option<bool>, EvalError> {
        match self.eval(record, ctx)? {
            JsonValue::Bool(b) => Ok(Some(b)),
            JsonValue::Null => Ok(None),
            other => Err(EvalError(format!(
                "predicate must evaluate to a boolean, got {}",
                value_type_name(&other)
            ))),
        }
    }

    fn eval_ordering(
        left: &Expr,
        right: &Expr,
        record: &Record,
        ctx: &EvalContext,
        satisfied: impl Fn(Ordering) -> bool,
    ) -> Result<JsonValue, EvalError> {
        let lv = left.eval(record, ctx)?;
        let rv = right.eval(record, ctx)?;
        Ok(bool_value(
            compare_values(&lv, &rv).map_err(EvalError)?.map(satisfied),
        ))
    }

    fn eval_arith(
        left: &Expr,
        right: &Expr,
        record: &Record,
        ctx: &EvalContext,
        op: &str,
    ) -> Result<JsonValue, EvalError> {
        let lv = to_numeric(&left.eval(record, ctx)?, op)?;
        let rv = to_numeric(&right.eval(record, ctx)?, op)?;
        let (lv, rv) = match (lv, rv) {
            (Some(l), Some(r)) => (l, r),
            _ => return Ok(JsonValue::Null),
        };
        match (lv, rv) {
            (NumOperand::Int(l), NumOperand::Int(r)) => {
                let out = match op {
                    "+" => l.checked_add(r),
                    "-" => l.checked_sub(r),
                    _ => l.checked_mul(r),
                };
                out.map(JsonValue::from)
                    .ok_or_else(|| EvalError(format!("integer overflow in {l} {op} {r}")))
            }
            (l, r) => {
                let (lf, rf) = (operand_f64(l), operand_f64(r));
                let out = match op {
                    "+" => lf + rf,
                    "-" => lf - rf,
                    _ => lf * rf,
                };
                Ok(JsonValue::from(out))
            }
        }
    }

    fn eval_call(
        name: &str,
        args: &[Expr],
        record: &Record,
        ctx: &EvalContext,
    ) -> Result<JsonValue, EvalError> {
        let arg = |i: usize| -> Result<JsonValue, EvalError> {
            args.get(i)
                .ok_or_else(|| EvalError(format!("{name} expects {} argument(s)", i + 1)))?
                .eval(record, ctx)
        };
        match name {
            "length" => match arg(0)? {
                JsonValue::Null => Ok(JsonValue::Null),
                JsonValue::String(s) => Ok(JsonValue::from(s.chars().count() as i64)),
                JsonValue::Array(items) => Ok(JsonValue::from(items.len() as i64)),
                other => Err(EvalError(format!(
                    "length expects a string or array, got {}",
                    value_type_name(&other)
                ))),
            },
            "lower" | "upper" | "trim" => match arg(0)? {
                JsonValue::Null => Ok(JsonValue::Null),
                JsonValue::String(s) => Ok(JsonValue::from(match name {
                    "lower" => s.to_lowercase(),
                    "upper" => s.to_uppercase(),
                    _ => s.trim().to_string(),
                })),
                other => Err(EvalError(format!(
                    "{name} expects a string, got {}",
                    value_type_name(&other)
                ))),
            },
            "abs" => match arg(0)? {
                JsonValue::Null => Ok(JsonValue::Null),
                JsonValue::Number(n) => {
                    if let Some(i) = n.as_i64() {
                        i.checked_abs()
                            .map(JsonValue::from)
                            .ok_or_else(|| EvalError("integer overflow in abs".to_string()))
                    } else {
                        n.as_f64()
                            .map(|f| JsonValue::from(f.abs()))
                            .ok_or_else(|| EvalError("non-finite number in abs".to_string()))
                    }
                }
                other => Err(EvalError(format!(
                    "abs expects a number, got {}",
                    value_type_name(&other)
                ))),
            },
            // Parse-or-null like the host engines' non-strict casts; output
            // is the canonical ISO form so date ordering matches string
            // ordering.
            "to_date" => match arg(0)? {
                JsonValue::Null => Ok(JsonValue::Null),
                JsonValue::String(s) => Ok(parse_date(&s)
                    .map(|d| JsonValue::from(d.format("%Y-%m-%d").to_string()))
                    .unwrap_or(JsonValue::Null)),
                other => Err(EvalError(format!(
                    "to_date expects a string, got {}",
                    value_type_name(&other)
                ))),
            },
            "to_timestamp" => match arg(0)? {
                JsonValue::Null => Ok(JsonValue::Null),
                JsonValue::String(s) => Ok(parse_timestamp(&s)
                    .map(|t| JsonValue::from(t.format("%Y-%m-%d %H:%M:%S%.f").to_string()))
                    .unwrap_or(JsonValue::Null)),
                other => Err(EvalError(format!(
                    "to_timestamp expects a string, got {}",
                    value_type_name(&other)
                ))),
            },
            other => Err(EvalError(format!("unknown function '{other}'"))),
        }
    }
}

fn operand_f64(operand: NumOperand) -> f64 {
    match operand {
        NumOperand::Int(i) => i as f64,
        NumOperand::Float(f) => f,
    }
}
