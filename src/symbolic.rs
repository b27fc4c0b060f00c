//! A small symbolic-expression tree.
//!
//! Quantities such as angles can be carried through the toolbox unevaluated
//! and evaluated later against concrete symbol bindings. Any `Expr` counts as
//! "symbolic" for the predicate library.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops;

/// An unevaluated arithmetic expression over named symbols.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Symbol(String),
    Number(f64),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Neg(Box<Expr>),
}

impl Expr {
    pub fn symbol(name: impl Into<String>) -> Self {
        Expr::Symbol(name.into())
    }

    pub fn number(value: f64) -> Self {
        Expr::Number(value)
    }

    /// Evaluates the expression, substituting every symbol from `bindings`.
    ///
    /// Returns `None` when a symbol has no binding.
    pub fn eval(&self, bindings: &BTreeMap<String, f64>) -> Option<f64> {
        match self {
            Expr::Symbol(name) => bindings.get(name).copied(),
            Expr::Number(v) => Some(*v),
            Expr::Add(a, b) => Some(a.eval(bindings)? + b.eval(bindings)?),
            Expr::Sub(a, b) => Some(a.eval(bindings)? - b.eval(bindings)?),
            Expr::Mul(a, b) => Some(a.eval(bindings)? * b.eval(bindings)?),
            Expr::Div(a, b) => Some(a.eval(bindings)? / b.eval(bindings)?),
            Expr::Neg(a) => Some(-a.eval(bindings)?),
        }
    }

    /// Binding strength used to decide where parentheses go when printing.
    fn precedence(&self) -> u8 {
        match self {
            Expr::Add(..) | Expr::Sub(..) => 1,
            Expr::Mul(..) | Expr::Div(..) => 2,
            Expr::Neg(_) => 3,
            Expr::Number(v) if v.is_sign_negative() => 3,
            Expr::Symbol(_) | Expr::Number(_) => 4,
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, parent: u8, strict: bool) -> fmt::Result {
        let prec = self.precedence();
        if prec < parent || (strict && prec == parent) {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prec = self.precedence();
        match self {
            Expr::Symbol(name) => write!(f, "{}", name),
            Expr::Number(v) => write!(f, "{:?}", v),
            Expr::Neg(a) => {
                write!(f, "-")?;
                a.fmt_operand(f, prec, true)
            }
            Expr::Add(a, b) | Expr::Sub(a, b) | Expr::Mul(a, b) | Expr::Div(a, b) => {
                let sym = match self {
                    Expr::Add(..) => "+",
                    Expr::Sub(..) => "-",
                    Expr::Mul(..) => "*",
                    _ => "/",
                };
                a.fmt_operand(f, prec, false)?;
                match self {
                    Expr::Add(..) | Expr::Sub(..) => write!(f, " {} ", sym)?,
                    _ => write!(f, "{}", sym)?,
                }
                // Right operands of `-` and `/` need parentheses at equal precedence.
                b.fmt_operand(f, prec, matches!(self, Expr::Sub(..) | Expr::Div(..)))
            }
        }
    }
}

impl ops::Add for Expr {
    type Output = Expr;
    fn add(self, rhs: Expr) -> Expr {
        Expr::Add(Box::new(self), Box::new(rhs))
    }
}

impl ops::Sub for Expr {
    type Output = Expr;
    fn sub(self, rhs: Expr) -> Expr {
        Expr::Sub(Box::new(self), Box::new(rhs))
    }
}

impl ops::Mul for Expr {
    type Output = Expr;
    fn mul(self, rhs: Expr) -> Expr {
        Expr::Mul(Box::new(self), Box::new(rhs))
    }
}

impl ops::Div for Expr {
    type Output = Expr;
    fn div(self, rhs: Expr) -> Expr {
        Expr::Div(Box::new(self), Box::new(rhs))
    }
}

impl ops::Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::Neg(Box::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn theta() -> Expr {
        Expr::symbol("theta")
    }

    #[rstest]
    #[case(theta() * Expr::number(2.0), "theta*2.0")]
    #[case((theta() + Expr::number(1.0)) * Expr::number(2.0), "(theta + 1.0)*2.0")]
    #[case(theta() - (theta() - Expr::number(1.0)), "theta - (theta - 1.0)")]
    #[case(Expr::number(180.0) * theta() / Expr::number(4.0), "180.0*theta/4.0")]
    #[case(theta() / (theta() * Expr::number(3.0)), "theta/(theta*3.0)")]
    #[case(-(theta() + Expr::number(1.0)), "-(theta + 1.0)")]
    fn test_display_parenthesizes_by_precedence(#[case] expr: Expr, #[case] expected: &str) {
        assert_eq!(expr.to_string(), expected);
    }

    #[test]
    fn test_eval_with_bindings() {
        let expr = (theta() + Expr::number(1.0)) / Expr::number(2.0);
        let bindings = BTreeMap::from([("theta".to_string(), 3.0)]);
        assert_eq!(expr.eval(&bindings), Some(2.0));
    }

    #[test]
    fn test_eval_unbound_symbol() {
        let expr = theta() * Expr::symbol("phi");
        let bindings = BTreeMap::from([("theta".to_string(), 3.0)]);
        assert_eq!(expr.eval(&bindings), None);
    }
}
