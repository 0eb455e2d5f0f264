//! Column expression builder, used to declare expectation predicates.
//!
//! A [`Column`] wraps a predicate [`Expr`] together with a display name that
//! tracks the operations applied to it, so a violated expectation can report
//! `(qty > 0)` instead of an opaque tree.

use crate::expr::{Expr, Literal};

#[derive(Debug, Clone)]
pub struct Column {
    name: String,
    expr: Expr,
}

impl Column {
    /// Reference a column of the record by name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Column {
            expr: Expr::Column(name.clone()),
            name,
        }
    }

    pub(crate) fn from_expr(expr: Expr, name: impl Into<String>) -> Self {
        Column {
            name: name.into(),
            expr,
        }
    }

    /// Display name of the expression, e.g. `(qty > 0)`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn into_expr(self) -> Expr {
        self.expr
    }

    /// Rename the expression for reporting.
    pub fn alias(&self, name: &str) -> Column {
        Column {
            name: name.to_string(),
            expr: self.expr.clone(),
        }
    }

    fn binary(
        &self,
        other: impl Into<Column>,
        symbol: &str,
        build: impl Fn(Box<Expr>, Box<Expr>) -> Expr,
    ) -> Column {
        let other = other.into();
        Column {
            name: format!("({} {} {})", self.name, symbol, other.name),
            expr: build(Box::new(self.expr.clone()), Box::new(other.expr)),
        }
    }

    pub fn eq(&self, other: impl Into<Column>) -> Column {
        self.binary(other, "=", Expr::Eq)
    }

    pub fn ne(&self, other: impl Into<Column>) -> Column {
        self.binary(other, "!=", Expr::Ne)
    }

    pub fn gt(&self, other: impl Into<Column>) -> Column {
        self.binary(other, ">", Expr::Gt)
    }

    pub fn ge(&self, other: impl Into<Column>) -> Column {
        self.binary(other, ">=", Expr::Ge)
    }

    pub fn lt(&self, other: impl Into<Column>) -> Column {
        self.binary(other, "<", Expr::Lt)
    }

    pub fn le(&self, other: impl Into<Column>) -> Column {
        self.binary(other, "<=", Expr::Le)
    }

    pub fn and(&self, other: impl Into<Column>) -> Column {
        self.binary(other, "AND", Expr::And)
    }

    pub fn or(&self, other: impl Into<Column>) -> Column {
        self.binary(other, "OR", Expr::Or)
    }

    pub fn not(&self) -> Column {
        Column {
            name: format!("(NOT {})", self.name),
            expr: Expr::Not(Box::new(self.expr.clone())),
        }
    }

    pub fn is_null(&self) -> Column {
        Column {
            name: format!("({} IS NULL)", self.name),
            expr: Expr::IsNull(Box::new(self.expr.clone())),
        }
    }

    pub fn is_not_null(&self) -> Column {
        Column {
            name: format!("({} IS NOT NULL)", self.name),
            expr: Expr::IsNotNull(Box::new(self.expr.clone())),
        }
    }

    /// Inclusive range check, `lower <= self <= upper`.
    pub fn between(&self, lower: impl Into<Column>, upper: impl Into<Column>) -> Column {
        let lower = lower.into();
        let upper = upper.into();
        Column {
            name: format!("({} BETWEEN {} AND {})", self.name, lower.name, upper.name),
            expr: Expr::Between {
                expr: Box::new(self.expr.clone()),
                lower: Box::new(lower.expr),
                upper: Box::new(upper.expr),
            },
        }
    }

    /// Membership check against a list of literal values.
    pub fn is_in<L: Into<Literal>>(&self, values: impl IntoIterator<Item = L>) -> Column {
        let values: Vec<Literal> = values.into_iter().map(Into::into).collect();
        let rendered = values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        Column {
            name: format!("({} IN ({}))", self.name, rendered),
            expr: Expr::IsIn {
                expr: Box::new(self.expr.clone()),
                values,
            },
        }
    }
}

impl From<Literal> for Column {
    fn from(lit: Literal) -> Self {
        Column {
            name: lit.to_string(),
            expr: Expr::Lit(lit),
        }
    }
}

impl From<i32> for Column {
    fn from(n: i32) -> Self {
        Literal::from(n).into()
    }
}

impl From<i64> for Column {
    fn from(n: i64) -> Self {
        Literal::from(n).into()
    }
}

impl From<f64> for Column {
    fn from(n: f64) -> Self {
        Literal::from(n).into()
    }
}

impl From<bool> for Column {
    fn from(b: bool) -> Self {
        Literal::from(b).into()
    }
}

impl From<&str> for Column {
    fn from(s: &str) -> Self {
        Literal::from(s).into()
    }
}

impl<T: Into<Column>> std::ops::Add<T> for Column {
    type Output = Column;

    fn add(self, rhs: T) -> Column {
        self.binary(rhs, "+", Expr::Add)
    }
}

impl<T: Into<Column>> std::ops::Sub<T> for Column {
    type Output = Column;

    fn sub(self, rhs: T) -> Column {
        self.binary(rhs, "-", Expr::Sub)
    }
}

impl<T: Into<Column>> std::ops::Mul<T> for Column {
    type Output = Column;

    fn mul(self, rhs: T) -> Column {
        self.binary(rhs, "*", Expr::Mul)
    }
}

impl<T: Into<Column>> std::ops::Div<T> for Column {
    type Output = Column;

    fn div(self, rhs: T) -> Column {
        self.binary(rhs, "/", Expr::Div)
    }
}

impl std::ops::Not for Column {
    type Output = Column;

    fn not(self) -> Column {
        Column::not(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_tracks_operations() {
        let predicate = Column::new("qty").gt(0);
        assert_eq!(predicate.name(), "(qty > 0)");

        let combined = Column::new("qty").gt(0).and(Column::new("name").is_not_null());
        assert_eq!(combined.name(), "((qty > 0) AND (name IS NOT NULL))");
    }

    #[test]
    fn test_literal_rendering_in_names() {
        assert_eq!(Column::new("state").eq("CA").name(), "(state = 'CA')");
        assert_eq!(
            Column::new("qty").between(1, 10).name(),
            "(qty BETWEEN 1 AND 10)"
        );
        assert_eq!(
            Column::new("state").is_in(["CA", "OR"]).name(),
            "(state IN ('CA', 'OR'))"
        );
    }

    #[test]
    fn test_arithmetic_operators_build_exprs() {
        let total = Column::new("price") * Column::new("qty");
        assert_eq!(total.name(), "(price * qty)");
        assert!(matches!(total.expr(), Expr::Mul(_, _)));

        let ratio = Column::new("a") / 2;
        assert!(matches!(ratio.expr(), Expr::Div(_, _)));
    }

    #[test]
    fn test_alias_keeps_expr() {
        let predicate = Column::new("qty").gt(0).alias("qty_positive");
        assert_eq!(predicate.name(), "qty_positive");
        assert!(matches!(predicate.expr(), Expr::Gt(_, _)));
    }
}
