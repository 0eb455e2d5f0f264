//! Free-function surface for building predicate expressions.

use crate::column::Column;
use crate::expr::{Expr, Literal};

/// Get a column by name.
pub fn col(name: &str) -> Column {
    Column::new(name)
}

/// Create a literal column from a value.
pub fn lit_i32(value: i32) -> Column {
    Column::from(Literal::from(value))
}

pub fn lit_i64(value: i64) -> Column {
    Column::from(Literal::from(value))
}

pub fn lit_f64(value: f64) -> Column {
    Column::from(Literal::from(value))
}

pub fn lit_bool(value: bool) -> Column {
    Column::from(Literal::from(value))
}

pub fn lit_str(value: &str) -> Column {
    Column::from(Literal::from(value))
}

pub fn lit_null() -> Column {
    Column::from(Literal::Null)
}

fn call1(name: &str, arg: &Column) -> Column {
    Column::from_expr(
        Expr::Call {
            name: name.to_string(),
            args: vec![arg.expr().clone()],
        },
        format!("{}({})", name, arg.name()),
    )
}

/// String or array length.
pub fn length(col: &Column) -> Column {
    call1("length", col)
}

pub fn lower(col: &Column) -> Column {
    call1("lower", col)
}

pub fn upper(col: &Column) -> Column {
    call1("upper", col)
}

pub fn trim(col: &Column) -> Column {
    call1("trim", col)
}

/// Absolute numeric value.
pub fn abs(col: &Column) -> Column {
    call1("abs", col)
}

/// Parse an ISO date string; unparsable values become null.
pub fn to_date(col: &Column) -> Column {
    call1("to_date", col)
}

/// Parse an ISO timestamp string; unparsable values become null.
pub fn to_timestamp(col: &Column) -> Column {
    call1("to_timestamp", col)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_names() {
        assert_eq!(length(&col("name")).name(), "length(name)");
        assert_eq!(to_date(&col("day")).name(), "to_date(day)");
        assert_eq!(lower(&lit_str("ABC")).name(), "lower('ABC')");
    }

    #[test]
    fn test_functions_compose_with_comparisons() {
        let predicate = length(&col("name")).le(64);
        assert_eq!(predicate.name(), "(length(name) <= 64)");
    }
}
