//! Bounds and specifications predicates.
//!
//! A bound is a `(lo, hi)` tuple of numbers with `lo <= hi`. Bounds come as
//! a single pair, a non-empty mapping of pairs, or a two-column array whose
//! rows are pairs. Specifications are keyed bounds with finite endpoints.
use super::numeric::is_finite;
use crate::type_system::checker::Predicate;
use crate::value::Value;

pub const BOUNDS: Predicate = Predicate::new("bounds", is_bounds);
pub const SPECIFICATIONS: Predicate = Predicate::new("specifications", is_specifications);

/// A two-element tuple of numbers in ascending order. Endpoints are compared
/// as floats, so any NaN fails.
fn is_bound_pair(x: &Value) -> bool {
    match x {
        Value::Tuple(items) => match items.as_slice() {
            [lo, hi] => matches!((lo.as_f64(), hi.as_f64()), (Some(lo), Some(hi)) if lo <= hi),
            _ => false,
        },
        _ => false,
    }
}

pub fn is_bounds(x: &Value) -> bool {
    match x {
        Value::Tuple(_) => is_bound_pair(x),
        Value::Map(m) => !m.is_empty() && m.values().all(is_bound_pair),
        // An empty (0, 2) array has no bad row and passes.
        Value::Array(a) => {
            a.ndim() == 2 && a.shape()[1] == 2 && a.data().chunks_exact(2).all(|row| row[0] <= row[1])
        }
        _ => false,
    }
}

pub fn is_specifications(x: &Value) -> bool {
    let Value::Map(m) = x else {
        return false;
    };
    is_bounds(x)
        && m.values().all(|bound| match bound {
            Value::Tuple(items) => items.iter().all(is_finite),
            _ => false,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::NdArray;
    use rstest::rstest;

    #[rstest]
    #[case(Value::pair(0.0, 1.0), true)]
    #[case(Value::pair(1, 1), true)]
    #[case(Value::pair(-1.0, f64::INFINITY), true)]
    #[case(Value::pair("0.5", 2), true)]
    #[case(Value::pair(1.0, 0.0), false)]
    #[case(Value::pair(f64::NAN, 1.0), false)]
    #[case(Value::pair(0.0, "high"), false)]
    #[case(Value::tuple([0.0, 1.0, 2.0]), false)]
    #[case(Value::tuple(Vec::<Value>::new()), false)]
    #[case(Value::list([0.0, 1.0]), false)]
    #[case(Value::Float(1.0), false)]
    #[case(Value::None, false)]
    fn test_bounds_shapes(#[case] x: Value, #[case] expected: bool) {
        assert_eq!(is_bounds(&x), expected);
    }

    #[test]
    fn test_ordered_pairs_for_many_values() {
        for i in -20i32..20 {
            let lo = f64::from(i) * 0.75;
            let hi = lo + f64::from(i.abs()) + 0.5;
            assert!(is_bounds(&Value::pair(lo, hi)));
            assert!(!is_bounds(&Value::pair(hi, lo)));
        }
    }

    #[test]
    fn test_bounds_mapping() {
        let valid = Value::map([("x", Value::pair(0.0, 1.0)), ("y", Value::pair(-1.0, 1.0))]);
        assert!(is_bounds(&valid));

        let one_bad = Value::map([("x", Value::pair(0.0, 1.0)), ("y", Value::pair(2.0, 1.0))]);
        assert!(!is_bounds(&one_bad));

        assert!(!is_bounds(&Value::map(Vec::<(String, Value)>::new())));
    }

    #[test]
    fn test_bounds_array() {
        let rows = NdArray::from_rows(&[vec![0.0, 1.0], vec![-5.0, 5.0]]).unwrap();
        assert!(is_bounds(&Value::Array(rows)));

        let reversed = NdArray::from_rows(&[vec![0.0, 1.0], vec![5.0, -5.0]]).unwrap();
        assert!(!is_bounds(&Value::Array(reversed)));

        let three_cols = NdArray::from_rows(&[vec![0.0, 1.0, 2.0]]).unwrap();
        assert!(!is_bounds(&Value::Array(three_cols)));

        let flat = NdArray::vector(vec![0.0, 1.0]);
        assert!(!is_bounds(&Value::Array(flat)));

        let empty = NdArray::new(&[0, 2], Vec::new()).unwrap();
        assert!(is_bounds(&Value::Array(empty)));
    }

    #[test]
    fn test_specifications() {
        let specs = Value::map([("x", Value::pair(0.0, 1.0)), ("y", Value::pair(-1.0, 1.0))]);
        assert!(is_specifications(&specs));

        let reversed = Value::map([("x", Value::pair(1.0, 0.0))]);
        assert!(!is_specifications(&reversed));

        let unbounded = Value::map([("x", Value::pair(0.0, f64::INFINITY))]);
        assert!(is_bounds(&unbounded));
        assert!(!is_specifications(&unbounded));

        let textual = Value::map([("x", Value::pair("0", "1"))]);
        assert!(!is_specifications(&textual));

        assert!(!is_specifications(&Value::pair(0.0, 1.0)));
    }
}
