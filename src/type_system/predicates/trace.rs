//! Plot trace payloads.
use super::numeric::is_finite;
use crate::type_system::checker::Predicate;
use crate::value::Value;

pub const TRACE_DATA: Predicate = Predicate::new("trace_data", is_trace_data);

/// A mapping with a `"name"` entry and non-empty, equal-length sequences of
/// finite numbers under `"x"` and `"y"`.
pub fn is_trace_data(x: &Value) -> bool {
    let Value::Map(m) = x else {
        return false;
    };
    if !m.contains_key("name") {
        return false;
    }
    let series = |key: &str| -> Option<Vec<Value>> {
        let items = m.get(key)?.items()?;
        (!items.is_empty() && items.iter().all(is_finite)).then_some(items)
    };
    match (series("x"), series("y")) {
        (Some(xs), Some(ys)) => xs.len() == ys.len(),
        _ => false,
    }
}
