//! Practical helpers for numeric scripting code.
//!
//! The core of the crate is [`type_system`]: runtime contracts that check a
//! function's arguments and result against declared types or predicates.
//! Around it sit a dynamic [`Value`] model, a memoization wrapper, angle
//! conversions and array reshaping helpers, all built on those contracts.

pub mod arrays;
pub mod memory;
pub mod symbolic;
pub mod type_system;
pub mod units;
pub mod value;

pub use memory::{memoize, Memoized};
pub use symbolic::Expr;
pub use type_system::predicates;
pub use type_system::{
    check, format_arg_count_error, format_type_error, typecheck, Args, Checker, Contract, ContractViolation,
    NativeFn, Param, Predicate, Side, TypeTag, TypecheckError, Typechecked,
};
pub use value::{NdArray, OperationError, Value};
