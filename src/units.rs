//! Angle unit conversions.
//!
//! Both conversions accept plain numbers, single-element arrays and symbolic
//! expressions, and are checked against the contract
//! `angle: symbolic -> symbolic`.
use crate::type_system::predicates::SYMBOLIC;
use crate::type_system::{typecheck, Contract, NativeFn, TypecheckError, Typechecked};
use crate::value::Value;
use std::f64::consts::PI;
use std::sync::OnceLock;

fn angle_contract(name: &str) -> Contract {
    Contract::new(name).param("angle", SYMBOLIC).returns(SYMBOLIC)
}

fn radian_to_degree(args: &[Value]) -> Result<Value, TypecheckError> {
    Ok(Value::Float(180.0).try_mul(&args[0])?.try_div(&Value::Float(PI))?)
}

fn degree_to_radian(args: &[Value]) -> Result<Value, TypecheckError> {
    Ok(Value::Float(PI).try_mul(&args[0])?.try_div(&Value::Float(180.0))?)
}

/// Converts an angle in radians to degrees.
pub fn convert_radian_to_degree(angle: impl Into<Value>) -> Result<Value, TypecheckError> {
    static WRAPPED: OnceLock<Typechecked<NativeFn>> = OnceLock::new();
    WRAPPED
        .get_or_init(|| typecheck(angle_contract("convert_radian_to_degree"), radian_to_degree as NativeFn))
        .call(&[angle.into()])
}

/// Converts an angle in degrees to radians.
pub fn convert_degree_to_radian(angle: impl Into<Value>) -> Result<Value, TypecheckError> {
    static WRAPPED: OnceLock<Typechecked<NativeFn>> = OnceLock::new();
    WRAPPED
        .get_or_init(|| typecheck(angle_contract("convert_degree_to_radian"), degree_to_radian as NativeFn))
        .call(&[angle.into()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::Expr;
    use crate::value::{NdArray, OperationError};
    use rstest::rstest;
    use std::collections::BTreeMap;

    fn float(v: Value) -> f64 {
        match v {
            Value::Float(f) => f,
            other => panic!("expected a float, got {}", other),
        }
    }

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(PI, 180.0)]
    #[case(-PI / 2.0, -90.0)]
    #[case(2.0 * PI, 360.0)]
    fn test_conversions(#[case] radians: f64, #[case] degrees: f64) {
        let to_degrees = float(convert_radian_to_degree(radians).unwrap());
        let to_radians = float(convert_degree_to_radian(degrees).unwrap());
        assert!((to_degrees - degrees).abs() < 1e-9);
        assert!((to_radians - radians).abs() < 1e-12);
    }

    #[test]
    fn test_integer_input_gives_float() {
        assert_eq!(convert_degree_to_radian(0).unwrap(), Value::Float(0.0));
        let quarter = float(convert_degree_to_radian(90).unwrap());
        assert!((quarter - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_symbolic_angle() {
        let theta = Expr::symbol("theta");
        let expr = match convert_radian_to_degree(theta).unwrap() {
            Value::Symbolic(expr) => expr,
            other => panic!("expected an expression, got {}", other),
        };
        let bindings = BTreeMap::from([("theta".to_string(), PI / 4.0)]);
        let evaluated = expr.eval(&bindings).unwrap();
        assert!((evaluated - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_element_array_angle() {
        let result = convert_radian_to_degree(NdArray::vector(vec![PI])).unwrap();
        assert_eq!(result.as_array().map(NdArray::shape), Some(&[1][..]));
        assert!((result.as_f64().unwrap() - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_numeric_angle_fails_in_body() {
        let err = convert_radian_to_degree("right angle").unwrap_err();
        assert!(matches!(err, TypecheckError::Operation(OperationError::UnsupportedOperand { .. })));
    }
}
