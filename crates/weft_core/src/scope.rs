//! The lexical scope threaded through an evaluation.

use crate::{node, value::DVal};
use std::{collections::HashMap, rc::Rc};

/// An immutable mapping from node [`Id`][node::Id] to a resolved value.
///
/// A binding for a node's id short-circuits its evaluation entirely; this
/// is the mechanism by which block arguments are delivered to a block's
/// body. Scopes are immutable per evaluation frame: entering a block
/// closure produces a *new* scope via [`Scope::extend`] rather than
/// mutating the outer one. The `Rc` makes the empty-extension case and
/// capture by closures cheap.
#[derive(Clone, Debug, Default)]
pub struct Scope(Rc<HashMap<node::Id, DVal>>);

impl Scope {
    /// The empty scope, under which no node is short-circuited.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The value bound for the given node id, if any.
    pub fn get(&self, id: node::Id) -> Option<&DVal> {
        self.0.get(&id)
    }

    /// Whether the given node id is bound in this scope.
    pub fn contains(&self, id: node::Id) -> bool {
        self.0.contains_key(&id)
    }

    /// A new scope with the given binding added over `self`.
    pub fn bind(&self, id: node::Id, val: DVal) -> Self {
        self.extend([(id, val)])
    }

    /// A new scope layering the given bindings over `self`, left-biased:
    /// on conflict the new bindings win.
    pub fn extend(&self, bindings: impl IntoIterator<Item = (node::Id, DVal)>) -> Self {
        let mut map = (*self.0).clone();
        map.extend(bindings);
        Self(Rc::new(map))
    }

    /// The number of bindings in this scope.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether this scope has no bindings.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[test]
fn test_extend_is_left_biased() {
    let id = node::Id(7);
    let outer = Scope::empty().bind(id, DVal::Int(1));
    let inner = outer.extend([(id, DVal::Int(2))]);
    assert_eq!(inner.get(id), Some(&DVal::Int(2)));
    // The outer scope is untouched.
    assert_eq!(outer.get(id), Some(&DVal::Int(1)));
}
