//! Numeric and symbolic predicates.
use crate::type_system::checker::Predicate;
use crate::value::Value;

pub const NUMERIC: Predicate = Predicate::new("numeric", is_numeric);
pub const FINITE: Predicate = Predicate::new("finite", is_finite);
pub const SYMBOLIC: Predicate = Predicate::new("symbolic", is_symbolic);

/// True when the value converts to a float: booleans, integers, floats
/// (NaN and infinities included), numeric strings and single-element arrays.
pub fn is_numeric(x: &Value) -> bool {
    x.as_f64().is_some()
}

/// True for finite scalars only.
///
/// Containers are always rejected, even when every element is finite, and so
/// are strings: a numeric string converts to a float but is not a number.
pub fn is_finite(x: &Value) -> bool {
    match x {
        Value::Bool(_) | Value::Int(_) => true,
        Value::Float(v) => v.is_finite(),
        Value::Array(a) if a.ndim() == 0 => a.data().iter().all(|v| v.is_finite()),
        _ => false,
    }
}

/// True for numbers and for symbolic expressions.
pub fn is_symbolic(x: &Value) -> bool {
    is_numeric(x) || matches!(x, Value::Symbolic(_))
}
