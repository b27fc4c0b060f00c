//! Runtime contracts for dynamically typed functions.
//!
//! This module provides [`Typechecked`], a wrapper that checks a function's
//! arguments and result against a declared [`Contract`]. Checking happens
//! *after* the wrapped function has run, so it serves as a diagnostic aid
//! during development rather than a gate in front of side effects.

// Publicly export the primary components for use by other modules.
pub use self::checker::{check, Checker, Predicate, TypeTag};
pub use self::contract::{Contract, Param};
pub use self::error::{format_arg_count_error, format_type_error, ContractViolation, Side, TypecheckError};
pub use self::typecheck::{typecheck, Args, NativeFn, Typechecked};

// --- MODULE DECLARATIONS ---
mod checker;
mod contract;
mod error;
pub mod predicates;
mod typecheck;
