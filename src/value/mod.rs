//! The dynamic value model that contracts and predicates operate on.
//!
//! Functions wrapped by the type system take and return [`Value`]s, so that a
//! single checker table can describe arguments of any shape: scalars,
//! strings, sequences, keyed mappings, n-d arrays and symbolic expressions.
mod convert;
mod ndarray;
mod ops;

pub use self::ndarray::NdArray;
pub use self::ops::OperationError;

use crate::symbolic::Expr;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A dynamically typed value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// The "no value" sentinel.
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    /// Fixed-size sequence; bound pairs must be tuples, not lists.
    Tuple(Vec<Value>),
    /// Keyed mapping, iterated in key order.
    Map(BTreeMap<String, Value>),
    Array(NdArray),
    Symbolic(Expr),
}

impl Value {
    /// Builds a tuple from anything convertible to values.
    pub fn tuple<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Value::Tuple(items.into_iter().map(Into::into).collect())
    }

    pub fn list<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    pub fn map<K: Into<String>, V: Into<Value>>(entries: impl IntoIterator<Item = (K, V)>) -> Self {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// A `(lo, hi)` bound pair.
    pub fn pair(lo: impl Into<Value>, hi: impl Into<Value>) -> Self {
        Value::Tuple(vec![lo.into(), hi.into()])
    }

    /// The runtime type description used in contract messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Map(_) => "dict",
            Value::Array(_) => "ndarray",
            Value::Symbolic(_) => "Expr",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Float conversion: booleans, integers, floats, numeric strings and
    /// single-element arrays convert; everything else does not.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Str(s) => s.trim().parse::<f64>().ok(),
            Value::Array(a) if a.size() == 1 => a.data().first().copied(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&NdArray> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// The elements produced by iterating the value, or `None` when the
    /// value is not iterable.
    ///
    /// Strings yield one-character strings, mappings yield their keys and
    /// arrays yield sub-arrays along the first axis.
    pub fn items(&self) -> Option<Vec<Value>> {
        match self {
            Value::Str(s) => Some(s.chars().map(|c| Value::Str(c.to_string())).collect()),
            Value::List(items) | Value::Tuple(items) => Some(items.clone()),
            Value::Map(m) => Some(m.keys().cloned().map(Value::Str).collect()),
            Value::Array(a) if a.ndim() >= 1 => Some(a.rows().into_iter().map(Value::Array).collect()),
            _ => None,
        }
    }

    /// Number of elements for iterable values.
    pub fn item_count(&self) -> Option<usize> {
        match self {
            Value::Str(s) => Some(s.chars().count()),
            Value::List(items) | Value::Tuple(items) => Some(items.len()),
            Value::Map(m) => Some(m.len()),
            Value::Array(a) => a.shape().first().copied(),
            _ => None,
        }
    }
}

/// Formats a float the way a repr would: always with a decimal point or exponent.
pub(crate) fn format_float(v: f64) -> String {
    if v.is_nan() {
        "nan".to_string()
    } else {
        format!("{:?}", v)
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

/// Single-quoted with backslashes and quotes escaped, so distinct strings
/// never render alike.
fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    write!(f, "'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// `repr`-style rendering of the value.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", format_float(*v)),
            Value::Str(s) => write_quoted(f, s),
            Value::List(items) => {
                write!(f, "[")?;
                write_seq(f, items)?;
                write!(f, "]")
            }
            Value::Tuple(items) => {
                write!(f, "(")?;
                write_seq(f, items)?;
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            Value::Map(m) => {
                write!(f, "{{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write_quoted(f, k)?;
                    write!(f, ": {}", v)?;
                }
                write!(f, "}}")
            }
            Value::Array(a) => write!(f, "array({})", a),
            Value::Symbolic(e) => write!(f, "{}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Value::None, "None")]
    #[case(Value::Bool(true), "True")]
    #[case(Value::Int(-3), "-3")]
    #[case(Value::Float(1.0), "1.0")]
    #[case(Value::Float(f64::NAN), "nan")]
    #[case(Value::Float(f64::NEG_INFINITY), "-inf")]
    #[case(Value::from("it's"), "'it\\'s'")]
    #[case(Value::list([1, 2]), "[1, 2]")]
    #[case(Value::tuple([1]), "(1,)")]
    #[case(Value::pair(0.0, 1.0), "(0.0, 1.0)")]
    #[case(Value::map([("b", 2), ("a", 1)]), "{'a': 1, 'b': 2}")]
    #[case(Value::map([("it's", 1)]), "{'it\\'s': 1}")]
    fn test_repr(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(value.to_string(), expected);
    }

    #[rstest]
    #[case(Value::Bool(true), Some(1.0))]
    #[case(Value::Int(7), Some(7.0))]
    #[case(Value::from(" 2.5 "), Some(2.5))]
    #[case(Value::from("abc"), None)]
    #[case(Value::None, None)]
    #[case(Value::list([1.0]), None)]
    #[case(Value::Array(NdArray::vector(vec![4.0])), Some(4.0))]
    fn test_float_conversion(#[case] value: Value, #[case] expected: Option<f64>) {
        assert_eq!(value.as_f64(), expected);
    }

    #[test]
    fn test_string_iterates_characters() {
        let items = Value::from("ab").items().unwrap();
        assert_eq!(items, vec![Value::from("a"), Value::from("b")]);
    }

    #[test]
    fn test_scalars_are_not_iterable() {
        assert!(Value::Int(3).items().is_none());
        assert!(Value::None.item_count().is_none());
        assert!(Value::Array(NdArray::scalar(1.0)).items().is_none());
    }

    #[test]
    fn test_matrix_iterates_rows() {
        let m = NdArray::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let rows = Value::Array(m).items().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], Value::Array(NdArray::vector(vec![3.0, 4.0])));
    }
}
