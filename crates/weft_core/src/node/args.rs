//! Parameters and per-node argument bindings.

use crate::{node, value::DVal};
use std::collections::BTreeMap;

/// A parameter of a standard-library function.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Param {
    /// The parameter name, unique within its function.
    pub name: String,
    /// The expected type of the argument.
    pub ty: ParamTy,
}

impl Param {
    /// Construct a parameter with the given name and type tag.
    pub fn new(name: impl Into<String>, ty: ParamTy) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// The type tag carried by a [`Param`].
///
/// Only [`ParamTy::Block`] is semantically meaningful to the engine: it
/// marks parameters whose argument edges point at anonymous blocks owned
/// by the call site (see [`Node::dependents`][node::Node::dependents]).
/// The remaining tags are documentary.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParamTy {
    Any,
    Bool,
    Int,
    Float,
    Str,
    List,
    Obj,
    Opaque,
    /// A block-valued parameter.
    Block,
}

/// A single argument slot: either a constant value or an edge referring to
/// another node's result.
#[derive(Clone, Debug, PartialEq)]
pub enum Arg {
    Const(DVal),
    Edge(node::Id),
}

impl Arg {
    /// The blank argument filling every slot at construction.
    pub fn blank() -> Self {
        Self::Const(DVal::Incomplete)
    }

    /// The target node id, if this argument is an edge.
    pub fn edge_id(&self) -> Option<node::Id> {
        match self {
            Self::Edge(id) => Some(*id),
            Self::Const(_) => None,
        }
    }
}

/// A node's argument bindings, keyed by parameter name.
///
/// The key set is always exactly the owning function's parameter names: no
/// gaps, no extras. Construction fills every slot with [`Arg::blank`] and
/// [`ArgMap::set`] refuses names outside the parameter list, so the
/// invariant holds by construction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ArgMap(BTreeMap<String, Arg>);

impl ArgMap {
    /// An argument map for the given parameters, every slot blank.
    pub fn blank(params: &[Param]) -> Self {
        Self(
            params
                .iter()
                .map(|p| (p.name.clone(), Arg::blank()))
                .collect(),
        )
    }

    /// The argument bound for the given parameter name.
    pub fn get(&self, name: &str) -> Option<&Arg> {
        self.0.get(name)
    }

    /// Bind an argument to an existing parameter slot.
    ///
    /// Returns the replaced argument, or `None` if no parameter with the
    /// given name exists (in which case the map is unchanged).
    pub fn set(&mut self, name: &str, arg: Arg) -> Option<Arg> {
        let slot = self.0.get_mut(name)?;
        Some(std::mem::replace(slot, arg))
    }

    /// Iterate over `(parameter name, argument)` pairs.
    ///
    /// Order is the `BTreeMap` key order; callers must not rely on it
    /// matching parameter declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arg)> {
        self.0.iter().map(|(name, arg)| (name.as_str(), arg))
    }

    /// The number of argument slots.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map has no slots.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The ids of all edge-valued arguments.
    pub fn edges(&self) -> impl Iterator<Item = node::Id> + '_ {
        self.0.values().filter_map(Arg::edge_id)
    }
}

#[test]
fn test_blank_matches_params() {
    let params = [
        Param::new("a", ParamTy::Int),
        Param::new("b", ParamTy::Int),
    ];
    let mut args = ArgMap::blank(&params);
    assert_eq!(args.len(), 2);
    assert_eq!(args.get("a"), Some(&Arg::blank()));

    // Only existing slots may be bound.
    assert!(args.set("a", Arg::Edge(node::Id(3))).is_some());
    assert!(args.set("missing", Arg::blank()).is_none());
    assert_eq!(args.len(), 2);
}
