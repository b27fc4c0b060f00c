//! Predicates that apply to any kind of value.
use crate::type_system::checker::{Checker, Predicate};
use crate::value::Value;

pub const ANYTHING: Predicate = Predicate::new("anything", anything);
pub const NOTHING: Predicate = Predicate::new("nothing", is_none);
pub const ITERABLE: Predicate = Predicate::new("iterable", is_iterable);

/// Accepts every value.
pub fn anything(_x: &Value) -> bool {
    true
}

/// True for the "no value" sentinel.
pub fn is_none(x: &Value) -> bool {
    x.is_none()
}

/// True when the value can be iterated: strings, sequences, mappings and
/// arrays with at least one dimension.
pub fn is_iterable(x: &Value) -> bool {
    x.item_count().is_some()
}

/// Combines checkers: the result accepts a value when any of them does,
/// stopping at the first match.
pub fn one_of<I>(checkers: I) -> Predicate
where
    I: IntoIterator,
    I::Item: Into<Checker>,
{
    let checkers: Vec<Checker> = checkers.into_iter().map(Into::into).collect();
    let names: Vec<String> = checkers.iter().map(ToString::to_string).collect();
    Predicate::from_fn(format!("one_of({})", names.join(", ")), move |x| {
        checkers.iter().any(|c| c.check(x))
    })
}
