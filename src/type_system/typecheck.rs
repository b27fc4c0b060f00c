//! The contract wrapper.
//!
//! [`Typechecked`] owns a function and its [`Contract`]. A call binds the
//! arguments to the declared parameters, runs the function, and only then
//! verifies every argument and the result. Verification is advisory in the
//! sense that the body always runs first; its side effects have happened by
//! the time a violation is reported.
use super::contract::{Contract, Param};
use super::error::{ContractViolation, TypecheckError};
use crate::value::Value;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Normalized argument list: one value per declared parameter, in
/// declaration order, followed by any variadic extras.
pub type Args = SmallVec<[Value; 4]>;

/// Signature of plain functions that can be wrapped.
pub type NativeFn = fn(&[Value]) -> Result<Value, TypecheckError>;

/// A function together with the contract it is checked against.
pub struct Typechecked<F> {
    contract: Arc<Contract>,
    func: F,
}

/// Wraps `func` so that every call is verified against `contract`.
pub fn typecheck<F>(contract: Contract, func: F) -> Typechecked<F>
where
    F: Fn(&[Value]) -> Result<Value, TypecheckError>,
{
    Typechecked { contract: Arc::new(contract), func }
}

impl<F> Typechecked<F>
where
    F: Fn(&[Value]) -> Result<Value, TypecheckError>,
{
    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    pub fn name(&self) -> &str {
        self.contract.name()
    }

    /// Calls with positional arguments only.
    pub fn call(&self, args: &[Value]) -> Result<Value, TypecheckError> {
        self.call_with(args, &[])
    }

    /// Calls with positional and keyword arguments.
    pub fn call_with(&self, args: &[Value], kwargs: &[(&str, Value)]) -> Result<Value, TypecheckError> {
        let bound = self.bind(args, kwargs)?;
        let result = (self.func)(&bound)?;
        self.verify(&bound, &result)?;
        Ok(result)
    }

    /// Aligns the call's arguments to the declared parameters: positionally
    /// first, then by keyword, then from defaults.
    pub fn bind(&self, args: &[Value], kwargs: &[(&str, Value)]) -> Result<Args, TypecheckError> {
        bind(&self.contract, args, kwargs).map_err(|err| {
            debug!(function = self.name(), error = %err, "argument binding failed");
            err
        })
    }

    fn verify(&self, args: &[Value], result: &Value) -> Result<(), ContractViolation> {
        let contract = &*self.contract;
        let fname = contract.name();
        let params = contract.params();

        for (param, value) in params.iter().zip(args) {
            check_param(fname, param, value)?;
        }
        if let Some(variadic) = contract.variadic_param() {
            for value in args.iter().skip(params.len()) {
                check_param(fname, variadic, value)?;
            }
        }

        if let Some(checker) = contract.return_checker() {
            if !checker.check(result) {
                let violation = ContractViolation::output(fname, checker, result);
                debug!(function = fname, %violation, "return contract violated");
                return Err(violation);
            }
        }

        Ok(())
    }
}

fn check_param(fname: &str, param: &Param, value: &Value) -> Result<(), ContractViolation> {
    match param.checker() {
        Some(checker) if !checker.check(value) => {
            let violation = ContractViolation::input(fname, param.name(), checker, value);
            debug!(function = fname, param = param.name(), %violation, "argument contract violated");
            Err(violation)
        }
        _ => Ok(()),
    }
}

fn bind(contract: &Contract, args: &[Value], kwargs: &[(&str, Value)]) -> Result<Args, TypecheckError> {
    let fname = contract.name();
    let params = contract.params();

    if args.len() > params.len() && contract.variadic_param().is_none() {
        return Err(TypecheckError::ArgumentCount {
            fname: fname.to_string(),
            expected: params.len(),
            actual: args.len(),
        });
    }

    let mut slots: SmallVec<[Option<Value>; 4]> = params.iter().map(|_| None).collect();
    for (slot, arg) in slots.iter_mut().zip(args) {
        *slot = Some(arg.clone());
    }

    for (name, value) in kwargs {
        let index = contract.position(name).ok_or_else(|| TypecheckError::UnexpectedKeyword {
            fname: fname.to_string(),
            name: name.to_string(),
        })?;
        if slots[index].is_some() {
            return Err(TypecheckError::DuplicateArgument {
                fname: fname.to_string(),
                name: name.to_string(),
            });
        }
        slots[index] = Some(value.clone());
    }

    let mut bound = Args::with_capacity(params.len().max(args.len()));
    for (param, slot) in params.iter().zip(slots) {
        match slot.or_else(|| param.default().cloned()) {
            Some(value) => bound.push(value),
            None => {
                return Err(TypecheckError::MissingArgument {
                    fname: fname.to_string(),
                    name: param.name().to_string(),
                })
            }
        }
    }
    bound.extend(args.iter().skip(params.len()).cloned());

    Ok(bound)
}

impl<F> fmt::Debug for Typechecked<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Typechecked").field("contract", &self.contract).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_system::checker::TypeTag;
    use crate::type_system::error::Side;
    use crate::type_system::predicates::{ITERABLE, NUMERIC};
    use crate::value::OperationError;
    use rstest::rstest;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn average_body(args: &[Value]) -> Result<Value, TypecheckError> {
        let total = args[0].try_add(&args[1])?.try_add(&args[2])?;
        Ok(total.try_div(&Value::Int(3))?)
    }

    fn average() -> Typechecked<NativeFn> {
        let contract = Contract::new("average")
            .param("x", NUMERIC)
            .param("y", NUMERIC)
            .param("z", NUMERIC)
            .returns(NUMERIC);
        typecheck(contract, average_body as NativeFn)
    }

    #[test]
    fn test_valid_call_returns_result() {
        let result = average().call(&[Value::Int(5), Value::Int(10), Value::Int(15)]).unwrap();
        assert_eq!(result, Value::Float(10.0));
    }

    #[test]
    fn test_body_error_propagates_before_checks() {
        let err = average().call(&[Value::Int(5), Value::from("a"), Value::Int(15)]).unwrap_err();
        assert!(matches!(err, TypecheckError::Operation(OperationError::UnsupportedOperand { .. })));
    }

    #[test]
    fn test_violation_after_successful_body_cites_parameter() {
        let contract = Contract::new("first").param("x", NUMERIC).param("y", NUMERIC);
        let first = typecheck(contract, |args: &[Value]| Ok(args[0].clone()));
        let err = first.call(&[Value::Int(5), Value::from("a")]).unwrap_err();
        let violation = err.violation().unwrap();
        assert_eq!(violation.side, Side::Input);
        assert_eq!(err.to_string(), "'first' accepts (y:numeric), but was given y=str");
    }

    #[test]
    fn test_body_runs_even_when_arguments_violate() {
        let calls = AtomicUsize::new(0);
        let contract = Contract::new("touch").param("x", TypeTag::Int);
        let touch = typecheck(contract, |_: &[Value]| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Value::None)
        });
        assert!(touch.call(&[Value::from("nope")]).is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_return_violation() {
        let contract = Contract::new("halve").param("x", TypeTag::Int).returns(TypeTag::Int);
        let halve = typecheck(contract, |args: &[Value]| Ok(args[0].try_div(&Value::Int(2))?));
        let err = halve.call(&[Value::Int(4)]).unwrap_err();
        assert_eq!(err.violation().map(|v| v.side), Some(Side::Output));
        assert_eq!(err.to_string(), "'halve' returns int, but result is float");
    }

    #[rstest]
    #[case(Value::Int(1))]
    #[case(Value::from("text"))]
    #[case(Value::list([1, 2, 3]))]
    #[case(Value::None)]
    fn test_unannotated_function_is_transparent(#[case] input: Value) {
        let contract = Contract::new("identity").unchecked("x");
        let identity = typecheck(contract, |args: &[Value]| Ok(args[0].clone()));
        assert_eq!(identity.call(&[input.clone()]).unwrap(), input);
    }

    #[test]
    fn test_keywords_and_defaults_are_bound_and_checked() {
        let contract = Contract::new("scale")
            .param("x", NUMERIC)
            .param_with_default("factor", NUMERIC, 2);
        let scale = typecheck(contract, |args: &[Value]| Ok(args[0].try_mul(&args[1])?));

        assert_eq!(scale.call(&[Value::Int(3)]).unwrap(), Value::Int(6));
        assert_eq!(scale.call_with(&[], &[("x", Value::Int(3)), ("factor", Value::Int(4))]).unwrap(), Value::Int(12));

        let bound = scale.bind(&[Value::Int(3)], &[]).unwrap();
        assert_eq!(bound.as_slice(), &[Value::Int(3), Value::Int(2)]);
    }

    #[test]
    fn test_default_values_are_checked_too() {
        let contract = Contract::new("f").param_with_default("x", TypeTag::Int, Value::None);
        let f = typecheck(contract, |_: &[Value]| Ok(Value::None));
        let err = f.call(&[]).unwrap_err();
        assert_eq!(err.to_string(), "'f' accepts (x:int), but was given x=NoneType");
    }

    #[test]
    fn test_binding_errors() {
        let contract = Contract::new("pair").param("a", TypeTag::Int).param("b", TypeTag::Int);
        let pair = typecheck(contract, |_: &[Value]| Ok(Value::None));

        let too_many = pair.call(&[Value::Int(1), Value::Int(2), Value::Int(3)]).unwrap_err();
        assert_eq!(too_many.to_string(), "pair() takes exactly 2 positional argument (3 given)");

        let unknown = pair.call_with(&[Value::Int(1), Value::Int(2)], &[("c", Value::Int(3))]).unwrap_err();
        assert!(matches!(unknown, TypecheckError::UnexpectedKeyword { ref name, .. } if name == "c"));

        let twice = pair.call_with(&[Value::Int(1), Value::Int(2)], &[("a", Value::Int(3))]).unwrap_err();
        assert!(matches!(twice, TypecheckError::DuplicateArgument { ref name, .. } if name == "a"));

        let missing = pair.call(&[Value::Int(1)]).unwrap_err();
        assert_eq!(missing.to_string(), "pair() missing required argument 'b'");
    }

    #[test]
    fn test_variadic_extras_are_checked() {
        let contract = Contract::new("total").variadic("values", NUMERIC).returns(NUMERIC);
        let total = typecheck(contract, |args: &[Value]| {
            args.iter().try_fold(Value::Int(0), |acc, v| acc.try_add(v)).map_err(TypecheckError::from)
        });
        assert_eq!(total.call(&[Value::Int(1), Value::Float(2.5)]).unwrap(), Value::Float(3.5));

        let contract = Contract::new("count").variadic("items", ITERABLE);
        let count = typecheck(contract, |args: &[Value]| Ok(Value::from(args.len())));
        let err = count.call(&[Value::list([1]), Value::Int(2)]).unwrap_err();
        assert_eq!(err.to_string(), "'count' accepts (items:iterable), but was given items=int");
    }

    #[test]
    fn test_shared_across_threads() {
        let avg = average();
        std::thread::scope(|s| {
            for i in 0..4 {
                let avg = &avg;
                s.spawn(move || {
                    let args = [Value::Int(i), Value::Int(i), Value::Int(i)];
                    assert_eq!(avg.call(&args).unwrap(), Value::Float(i as f64));
                });
            }
        });
    }
}
