//! Per-function-node memoization of pure applications.

use crate::{reg::ArgValues, value::DVal};
use std::{cell::RefCell, collections::HashMap};

/// The content-addressed cache owned by each function node.
///
/// Keys are the canonical serialization of the resolved argument map (see
/// [`Memo::key`]). Entries are never evicted during the owning node's
/// lifetime; the cache is dropped with the node and cleared when the
/// node's function changes. Writes are monotonic: once a key is written
/// its value never changes, which is what makes interior mutability safe
/// under the engine's single-threaded recursion.
#[derive(Debug, Default)]
pub struct Memo(RefCell<HashMap<String, DVal>>);

impl Memo {
    /// The canonical, order-stable key for a resolved argument map.
    ///
    /// `None` when the arguments contain a closure or an opaque handle,
    /// neither of which has a canonical form; such applications bypass
    /// the cache entirely.
    pub fn key(args: &ArgValues) -> Option<String> {
        serde_json::to_string(args).ok()
    }

    /// The cached value under `key`, if any.
    pub fn get(&self, key: &str) -> Option<DVal> {
        self.0.borrow().get(key).cloned()
    }

    /// Record the value computed for `key`.
    pub fn insert(&self, key: String, val: DVal) {
        self.0.borrow_mut().insert(key, val);
    }

    /// Drop every entry. Used when the owning node changes function.
    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// The number of cached applications.
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Whether nothing has been cached.
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}
