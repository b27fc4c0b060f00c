//! Checkers: the unit a contract is built from.
//!
//! A checker is either a concrete type tag (isinstance semantics) or a named
//! predicate. The choice is explicit in the [`Checker`] variant, so checking
//! a value is a single branch.
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Concrete runtime types a checker can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeTag {
    NoneType,
    Bool,
    /// Accepts booleans too, as `bool` is a subtype of `int`.
    Int,
    Float,
    Str,
    List,
    Tuple,
    Dict,
    NdArray,
    Expr,
}

impl TypeTag {
    pub fn name(&self) -> &'static str {
        match self {
            TypeTag::NoneType => "NoneType",
            TypeTag::Bool => "bool",
            TypeTag::Int => "int",
            TypeTag::Float => "float",
            TypeTag::Str => "str",
            TypeTag::List => "list",
            TypeTag::Tuple => "tuple",
            TypeTag::Dict => "dict",
            TypeTag::NdArray => "ndarray",
            TypeTag::Expr => "Expr",
        }
    }

    pub fn is_instance(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (TypeTag::NoneType, Value::None)
                | (TypeTag::Bool, Value::Bool(_))
                | (TypeTag::Int, Value::Int(_) | Value::Bool(_))
                | (TypeTag::Float, Value::Float(_))
                | (TypeTag::Str, Value::Str(_))
                | (TypeTag::List, Value::List(_))
                | (TypeTag::Tuple, Value::Tuple(_))
                | (TypeTag::Dict, Value::Map(_))
                | (TypeTag::NdArray, Value::Array(_))
                | (TypeTag::Expr, Value::Symbolic(_))
        )
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

type SharedTest = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

#[derive(Clone)]
enum Test {
    Static(fn(&Value) -> bool),
    Shared(SharedTest),
}

/// A named, total classification function.
#[derive(Clone)]
pub struct Predicate {
    name: Cow<'static, str>,
    test: Test,
}

impl Predicate {
    /// Wraps a plain function. Usable in `const` items.
    pub const fn new(name: &'static str, test: fn(&Value) -> bool) -> Self {
        Self { name: Cow::Borrowed(name), test: Test::Static(test) }
    }

    /// Wraps a capturing closure, e.g. a combinator over other checkers.
    pub fn from_fn<F>(name: impl Into<String>, test: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self { name: Cow::Owned(name.into()), test: Test::Shared(Arc::new(test)) }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn test(&self, value: &Value) -> bool {
        match &self.test {
            Test::Static(f) => f(value),
            Test::Shared(f) => f(value),
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Predicate").field(&self.name).finish()
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// What a contract position requires of its value.
#[derive(Debug, Clone)]
pub enum Checker {
    Type(TypeTag),
    Predicate(Predicate),
    /// Declared but imposing no constraint.
    Unconstrained,
}

impl Checker {
    pub fn check(&self, value: &Value) -> bool {
        match self {
            Checker::Type(tag) => tag.is_instance(value),
            Checker::Predicate(p) => p.test(value),
            Checker::Unconstrained => true,
        }
    }
}

impl fmt::Display for Checker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Checker::Type(tag) => write!(f, "{}", tag),
            Checker::Predicate(p) => write!(f, "{}", p),
            Checker::Unconstrained => f.write_str("any"),
        }
    }
}

impl From<TypeTag> for Checker {
    fn from(tag: TypeTag) -> Self {
        Checker::Type(tag)
    }
}

impl From<Predicate> for Checker {
    fn from(p: Predicate) -> Self {
        Checker::Predicate(p)
    }
}

/// Checks `value` against `checker`.
pub fn check(value: &Value, checker: &Checker) -> bool {
    checker.check(value)
}
