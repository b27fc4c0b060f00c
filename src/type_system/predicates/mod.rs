//! The predicate library.
//!
//! Every predicate is a total `fn(&Value) -> bool`: ill-typed input yields
//! `false`, never a panic or an error. Each one also has a named
//! [`Predicate`](super::checker::Predicate) constant so it can be used
//! directly as a contract checker.
mod bounds;
mod generic;
mod numeric;
mod paths;
mod trace;

pub use self::bounds::{is_bounds, is_specifications, BOUNDS, SPECIFICATIONS};
pub use self::generic::{anything, is_iterable, is_none, one_of, ANYTHING, ITERABLE, NOTHING};
pub use self::numeric::{is_finite, is_numeric, is_symbolic, FINITE, NUMERIC, SYMBOLIC};
pub use self::paths::{is_dir, is_file, IS_DIR, IS_FILE};
pub use self::trace::{is_trace_data, TRACE_DATA};
