//! Memoization of pure functions over [`Value`] arguments.
//!
//! The cache is unbounded and lives as long as the wrapper. Keys are the
//! repr of the argument tuple, so two calls share an entry exactly when
//! their arguments print the same way.
use crate::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::trace;

/// A function together with the cache of its past results.
pub struct Memoized<F> {
    func: F,
    cache: Mutex<HashMap<String, Value>>,
}

/// Wraps `func` with an empty cache.
pub fn memoize<F>(func: F) -> Memoized<F> {
    Memoized { func, cache: Mutex::new(HashMap::new()) }
}

/// The cache key of an argument list.
pub fn cache_key(args: &[Value]) -> String {
    Value::Tuple(args.to_vec()).to_string()
}

impl<F> Memoized<F> {
    /// Returns the cached result for `args`, computing and storing it on a
    /// miss. Failed calls are not stored.
    pub fn call<E>(&self, args: &[Value]) -> Result<Value, E>
    where
        F: Fn(&[Value]) -> Result<Value, E>,
    {
        let key = cache_key(args);
        if let Some(hit) = self.lock().get(&key) {
            trace!(%key, "memo hit");
            return Ok(hit.clone());
        }

        trace!(%key, "memo miss");
        // The lock is released while the function runs.
        let result = (self.func)(args)?;
        self.lock().insert(key, result.clone());
        Ok(result)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Value>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<F> fmt::Debug for Memoized<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoized").field("entries", &self.len()).finish_non_exhaustive()
    }
}
