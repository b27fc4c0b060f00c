//! The annotation table of a function: one checker per named parameter plus
//! an optional return checker, declared once and read on every call.
use super::checker::Checker;
use crate::value::Value;

/// A named parameter with its optional checker and default value.
#[derive(Debug, Clone)]
pub struct Param {
    name: String,
    checker: Option<Checker>,
    default: Option<Value>,
}

impl Param {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn checker(&self) -> Option<&Checker> {
        self.checker.as_ref()
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// Declared input/output contract of one function.
///
/// Built with the chained methods below; redeclaring a parameter name
/// replaces the earlier declaration in place.
///
/// ```
/// use practical::{Contract, TypeTag, predicates::NUMERIC};
///
/// let contract = Contract::new("average")
///     .param("x", NUMERIC)
///     .param("y", NUMERIC)
///     .returns(TypeTag::Float);
/// assert_eq!(contract.params().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Contract {
    name: String,
    params: Vec<Param>,
    variadic: Option<Param>,
    returns: Option<Checker>,
}

impl Contract {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            variadic: None,
            returns: None,
        }
    }

    /// Adds a checked parameter.
    pub fn param(self, name: impl Into<String>, checker: impl Into<Checker>) -> Self {
        self.push(Param { name: name.into(), checker: Some(checker.into()), default: None })
    }

    /// Adds a parameter without annotation.
    pub fn unchecked(self, name: impl Into<String>) -> Self {
        self.push(Param { name: name.into(), checker: None, default: None })
    }

    /// Adds a checked parameter that may be omitted by the caller.
    pub fn param_with_default(
        self,
        name: impl Into<String>,
        checker: impl Into<Checker>,
        default: impl Into<Value>,
    ) -> Self {
        self.push(Param {
            name: name.into(),
            checker: Some(checker.into()),
            default: Some(default.into()),
        })
    }

    /// Accepts any number of extra positional arguments, each checked
    /// against `checker`.
    pub fn variadic(mut self, name: impl Into<String>, checker: impl Into<Checker>) -> Self {
        self.variadic = Some(Param { name: name.into(), checker: Some(checker.into()), default: None });
        self
    }

    pub fn returns(mut self, checker: impl Into<Checker>) -> Self {
        self.returns = Some(checker.into());
        self
    }

    fn push(mut self, param: Param) -> Self {
        match self.params.iter_mut().find(|p| p.name == param.name) {
            Some(existing) => *existing = param,
            None => self.params.push(param),
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn variadic_param(&self) -> Option<&Param> {
        self.variadic.as_ref()
    }

    pub fn return_checker(&self) -> Option<&Checker> {
        self.returns.as_ref()
    }

    /// Whether any position carries a checker at all.
    pub fn is_annotated(&self) -> bool {
        self.returns.is_some()
            || self.params.iter().chain(self.variadic.iter()).any(|p| p.checker.is_some())
    }

    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|p| p.name == name)
    }
}
