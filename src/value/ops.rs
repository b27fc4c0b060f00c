//! Arithmetic on dynamic values.
//!
//! Numeric promotion: booleans count as integers, integer operands stay
//! integral except under `/`, any float operand makes the result a float and
//! any symbolic operand makes the result a symbolic expression. Arrays
//! combine elementwise with scalars and with arrays of the same shape.
use super::ndarray::format_shape;
use super::{NdArray, Value};
use crate::symbolic::Expr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OperationError {
    #[error("unsupported operand type(s) for {op}: '{left}' and '{right}'")]
    UnsupportedOperand { op: &'static str, left: &'static str, right: &'static str },
    #[error("bad operand type for unary {op}: '{operand}'")]
    UnsupportedUnary { op: &'static str, operand: &'static str },
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow in {op}")]
    Overflow { op: &'static str },
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    Shape { expected: String, actual: String },
    #[error("could not convert {type_name} to float")]
    NotNumeric { type_name: &'static str },
    #[error("expected {expected}, got {actual}")]
    WrongType { expected: &'static str, actual: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }

    fn on_ints(self, a: i64, b: i64) -> Result<Value, OperationError> {
        let overflow = OperationError::Overflow { op: self.symbol() };
        match self {
            BinaryOp::Add => a.checked_add(b).map(Value::Int).ok_or(overflow),
            BinaryOp::Sub => a.checked_sub(b).map(Value::Int).ok_or(overflow),
            BinaryOp::Mul => a.checked_mul(b).map(Value::Int).ok_or(overflow),
            BinaryOp::Div if b == 0 => Err(OperationError::DivisionByZero),
            BinaryOp::Div => Ok(Value::Float(a as f64 / b as f64)),
        }
    }

    fn on_floats(self, a: f64, b: f64) -> Result<Value, OperationError> {
        Ok(Value::Float(match self {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div if b == 0.0 => return Err(OperationError::DivisionByZero),
            BinaryOp::Div => a / b,
        }))
    }

    /// IEEE semantics: division by zero gives an infinity or NaN.
    fn on_elements(self, a: f64, b: f64) -> f64 {
        match self {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div => a / b,
        }
    }

    /// `None` when neither side is an array, or when the other side is not
    /// a number.
    fn on_arrays(self, lhs: &Value, rhs: &Value) -> Option<Result<Value, OperationError>> {
        let scalar = |v: &Value| numeric_operand(v).map(|n| n.to_f64());
        let result = match (lhs, rhs) {
            (Value::Array(a), Value::Array(b)) if a.shape() == b.shape() => {
                let data = a.data().iter().zip(b.data()).map(|(&x, &y)| self.on_elements(x, y)).collect();
                NdArray::new(a.shape(), data)
            }
            (Value::Array(a), Value::Array(b)) => Err(OperationError::Shape {
                expected: format_shape(a.shape()),
                actual: format_shape(b.shape()),
            }),
            (Value::Array(a), other) => {
                let y = scalar(other)?;
                NdArray::new(a.shape(), a.data().iter().map(|&x| self.on_elements(x, y)).collect())
            }
            (other, Value::Array(b)) => {
                let x = scalar(other)?;
                NdArray::new(b.shape(), b.data().iter().map(|&y| self.on_elements(x, y)).collect())
            }
            _ => return None,
        };
        Some(result.map(Value::Array))
    }

    fn on_exprs(self, a: Expr, b: Expr) -> Value {
        Value::Symbolic(match self {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div => a / b,
        })
    }
}

enum Num {
    Int(i64),
    Float(f64),
}

fn numeric_operand(v: &Value) -> Option<Num> {
    match v {
        Value::Bool(b) => Some(Num::Int(i64::from(*b))),
        Value::Int(i) => Some(Num::Int(*i)),
        Value::Float(f) => Some(Num::Float(*f)),
        _ => None,
    }
}

fn symbolic_operand(v: &Value) -> Option<Expr> {
    match (v, numeric_operand(v)) {
        (Value::Symbolic(e), _) => Some(e.clone()),
        (_, Some(Num::Int(i))) => Some(Expr::Number(i as f64)),
        (_, Some(Num::Float(f))) => Some(Expr::Number(f)),
        _ => None,
    }
}

impl Value {
    /// `self + rhs`. Strings and sequences of the same kind concatenate.
    pub fn try_add(&self, rhs: &Value) -> Result<Value, OperationError> {
        match (self, rhs) {
            (Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{a}{b}"))),
            (Value::List(a), Value::List(b)) => Ok(Value::List([a.as_slice(), b.as_slice()].concat())),
            (Value::Tuple(a), Value::Tuple(b)) => Ok(Value::Tuple([a.as_slice(), b.as_slice()].concat())),
            _ => self.binary(rhs, BinaryOp::Add),
        }
    }

    pub fn try_sub(&self, rhs: &Value) -> Result<Value, OperationError> {
        self.binary(rhs, BinaryOp::Sub)
    }

    pub fn try_mul(&self, rhs: &Value) -> Result<Value, OperationError> {
        self.binary(rhs, BinaryOp::Mul)
    }

    /// True division: integer operands produce a float.
    pub fn try_div(&self, rhs: &Value) -> Result<Value, OperationError> {
        self.binary(rhs, BinaryOp::Div)
    }

    pub fn try_neg(&self) -> Result<Value, OperationError> {
        match self {
            Value::Bool(b) => Ok(Value::Int(-i64::from(*b))),
            Value::Int(i) => i.checked_neg().map(Value::Int).ok_or(OperationError::Overflow { op: "-" }),
            Value::Float(f) => Ok(Value::Float(-f)),
            Value::Symbolic(e) => Ok(Value::Symbolic(-e.clone())),
            other => Err(OperationError::UnsupportedUnary { op: "-", operand: other.type_name() }),
        }
    }

    fn binary(&self, rhs: &Value, op: BinaryOp) -> Result<Value, OperationError> {
        if let Some(result) = op.on_arrays(self, rhs) {
            return result;
        }
        match (numeric_operand(self), numeric_operand(rhs)) {
            (Some(Num::Int(a)), Some(Num::Int(b))) => op.on_ints(a, b),
            (Some(a), Some(b)) => op.on_floats(a.to_f64(), b.to_f64()),
            // At least one side is not a plain number here, so a symbolic
            // pair means at least one real expression.
            _ => match (symbolic_operand(self), symbolic_operand(rhs)) {
                (Some(a), Some(b)) => Ok(op.on_exprs(a, b)),
                _ => Err(OperationError::UnsupportedOperand {
                    op: op.symbol(),
                    left: self.type_name(),
                    right: rhs.type_name(),
                }),
            },
        }
    }
}

impl Num {
    fn to_f64(&self) -> f64 {
        match self {
            Num::Int(i) => *i as f64,
            Num::Float(f) => *f,
        }
    }
}
