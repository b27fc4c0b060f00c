//! Filesystem predicates over path strings.
use crate::type_system::checker::Predicate;
use crate::value::Value;
use std::path::Path;

pub const IS_FILE: Predicate = Predicate::new("is_file", is_file);
pub const IS_DIR: Predicate = Predicate::new("is_dir", is_dir);

/// True when `x` is a string naming an existing regular file.
pub fn is_file(x: &Value) -> bool {
    x.as_str().is_some_and(|p| Path::new(p).is_file())
}

/// True when `x` is a string naming an existing directory.
pub fn is_dir(x: &Value) -> bool {
    x.as_str().is_some_and(|p| Path::new(p).is_dir())
}
