//! Defines the error types for the type system module.
use super::checker::Checker;
use crate::value::{OperationError, Value};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which side of the call failed its contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// An argument did not satisfy its parameter's checker.
    Input,
    /// The result did not satisfy the return checker.
    Output,
}

/// Formats the message for a failed contract position.
///
/// This is a pure formatter; what happens with the message is up to the caller.
pub fn format_type_error(fname: &str, expected: &str, actual: &str, side: Side) -> String {
    match side {
        Side::Input => format!("'{}' accepts ({}), but was given {}", fname, expected, actual),
        Side::Output => format!("'{}' returns {}, but result is {}", fname, expected, actual),
    }
}

/// Formats the message for a call with too many positional arguments.
pub fn format_arg_count_error(fname: &str, expected: usize, actual: usize) -> String {
    format!("{}() takes exactly {} positional argument ({} given)", fname, expected, actual)
}

/// A value that failed the checker declared for its position.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{}", format_type_error(&self.fname, &self.expected, &self.actual, self.side))]
pub struct ContractViolation {
    /// Name of the wrapped function.
    pub fname: String,
    /// The declared checker, prefixed with the parameter name on the input side.
    pub expected: String,
    /// The runtime type that was seen, prefixed the same way.
    pub actual: String,
    pub side: Side,
}

impl ContractViolation {
    pub fn input(fname: &str, param: &str, checker: &Checker, value: &Value) -> Self {
        Self {
            fname: fname.to_string(),
            expected: format!("{}:{}", param, checker),
            actual: format!("{}={}", param, value.type_name()),
            side: Side::Input,
        }
    }

    pub fn output(fname: &str, checker: &Checker, result: &Value) -> Self {
        Self {
            fname: fname.to_string(),
            expected: checker.to_string(),
            actual: result.type_name().to_string(),
            side: Side::Output,
        }
    }
}

/// Every way a call through a contract wrapper can fail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TypecheckError {
    #[error(transparent)]
    Violation(#[from] ContractViolation),
    #[error("{fname}() takes exactly {expected} positional argument ({actual} given)")]
    ArgumentCount { fname: String, expected: usize, actual: usize },
    #[error("{fname}() got an unexpected keyword argument '{name}'")]
    UnexpectedKeyword { fname: String, name: String },
    #[error("{fname}() got multiple values for argument '{name}'")]
    DuplicateArgument { fname: String, name: String },
    #[error("{fname}() missing required argument '{name}'")]
    MissingArgument { fname: String, name: String },
    /// Raised by the wrapped function's own body.
    #[error(transparent)]
    Operation(#[from] OperationError),
}

impl TypecheckError {
    pub fn violation(&self) -> Option<&ContractViolation> {
        match self {
            TypecheckError::Violation(v) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_system::checker::TypeTag;

    #[test]
    fn test_input_message() {
        let v = ContractViolation::input("average", "y", &TypeTag::Int.into(), &Value::from("a"));
        assert_eq!(v.to_string(), "'average' accepts (y:int), but was given y=str");
    }

    #[test]
    fn test_output_message() {
        let v = ContractViolation::output("average", &TypeTag::Float.into(), &Value::Int(15));
        assert_eq!(v.to_string(), "'average' returns float, but result is int");
    }

    #[test]
    fn test_arg_count_message_matches_error() {
        let err = TypecheckError::ArgumentCount { fname: "f".into(), expected: 1, actual: 2 };
        assert_eq!(err.to_string(), format_arg_count_error("f", 1, 2));
        assert_eq!(err.to_string(), "f() takes exactly 1 positional argument (2 given)");
    }

    #[test]
    fn test_violation_is_transparent() {
        let v = ContractViolation::output("f", &TypeTag::Str.into(), &Value::None);
        let err = TypecheckError::from(v.clone());
        assert_eq!(err.to_string(), v.to_string());
        assert_eq!(err.violation(), Some(&v));
    }
}
