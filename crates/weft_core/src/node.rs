//! The node taxonomy: the five vertex variants of a weft graph and their
//! construction-time invariants.

pub use args::{Arg, ArgMap, Param, ParamTy};
pub use frontend::{ArgRepr, Live, Record};
use serde::{Deserialize, Serialize};

pub mod args;
pub mod frontend;

use crate::{
    graph::GraphRead,
    memo::Memo,
    reg::{self, FunctionSpec, Registry},
    value::{self, DVal, LiteralError},
};
use std::{fmt, rc::Rc};
use thiserror::Error;

/// Type used to uniquely identify a node within a graph.
///
/// Ids are assigned by the surrounding graph store and are stable for the
/// lifetime of the node.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct Id(pub u64);

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Id {
    fn from(u: u64) -> Self {
        Self(u)
    }
}

/// A node's position on the editor canvas. Opaque to the engine.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A vertex in the dataflow graph.
///
/// The editor-facing preamble (`id`, `pos`, `cursor`) is shared across all
/// variants; everything with per-variant semantics hangs off [`Kind`].
#[derive(Debug)]
pub struct Node {
    id: Id,
    pos: Pos,
    /// Editor-side index selector, consumed only by preview hooks.
    cursor: usize,
    kind: Kind,
}

/// The per-variant data of a [`Node`].
#[derive(Debug)]
pub enum Kind {
    /// A literal, parsed once from its source string at construction.
    Value { src: String, value: DVal },
    /// A call to a named standard-library function.
    Function {
        name: String,
        /// Resolved from the registry at construction.
        spec: Rc<FunctionSpec>,
        args: ArgMap,
        memo: Memo,
    },
    /// A reference to a datastore table.
    Datastore { table: String },
    /// An anonymous sub-graph behaving as a first-class callable.
    ///
    /// Holds only the ids of its positional argument nodes; the body is
    /// discovered dynamically as the shallowest of the deepest
    /// descendants reachable from them.
    Block { arg_ids: Vec<Id> },
    /// A placeholder for one positional parameter of an enclosing block.
    Arg {
        block_id: Id,
        index: usize,
        arg_ids: Vec<Id>,
    },
}

/// An error occurred while constructing or editing a node.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error(transparent)]
    Literal(#[from] LiteralError),
    #[error(transparent)]
    UnknownFunction(#[from] reg::UnknownFunction),
    /// The node carries no parameter with the given name.
    #[error("node `{node}` has no parameter named `{param}`")]
    UnknownParameter { node: Id, param: String },
    /// A function-only operation was applied to some other variant.
    #[error("node `{0}` is not a function node")]
    NotAFunction(Id),
}

impl Node {
    /// A value node, its literal source parsed eagerly.
    pub fn value(id: Id, pos: Pos, src: impl Into<String>) -> Result<Self, NodeError> {
        let src = src.into();
        let value = value::parse(&src)?;
        Ok(Self::new(id, pos, Kind::Value { src, value }))
    }

    /// A function node calling the named standard-library function.
    ///
    /// The name is resolved against the registry here, so an unresolved
    /// function is an error at construction time rather than at
    /// evaluation. Every argument slot starts blank.
    pub fn function(
        id: Id,
        pos: Pos,
        name: impl Into<String>,
        registry: &Registry,
    ) -> Result<Self, NodeError> {
        let name = name.into();
        let spec = registry.lookup(&name)?.clone();
        let args = ArgMap::blank(&spec.params);
        let kind = Kind::Function {
            name,
            spec,
            args,
            memo: Memo::default(),
        };
        Ok(Self::new(id, pos, kind))
    }

    /// A datastore node for the given table.
    pub fn datastore(id: Id, pos: Pos, table: impl Into<String>) -> Self {
        Self::new(
            id,
            pos,
            Kind::Datastore {
                table: table.into(),
            },
        )
    }

    /// A block node with the given positional argument nodes.
    pub fn block(id: Id, pos: Pos, arg_ids: Vec<Id>) -> Self {
        Self::new(id, pos, Kind::Block { arg_ids })
    }

    /// An arg node standing for parameter `index` of the block `block_id`.
    pub fn arg(id: Id, pos: Pos, block_id: Id, index: usize, arg_ids: Vec<Id>) -> Self {
        Self::new(
            id,
            pos,
            Kind::Arg {
                block_id,
                index,
                arg_ids,
            },
        )
    }

    fn new(id: Id, pos: Pos, kind: Kind) -> Self {
        Self {
            id,
            pos,
            cursor: 0,
            kind,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn set_pos(&mut self, pos: Pos) {
        self.pos = pos;
    }

    /// The editor's index selector for this node.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Editor-driven; never called during an in-flight evaluation.
    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor;
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// The node's display name as reported to the front-end.
    pub fn name(&self) -> &str {
        match &self.kind {
            Kind::Value { .. } => "value",
            Kind::Function { name, .. } => name,
            Kind::Datastore { table } => table,
            Kind::Block { .. } => "block",
            Kind::Arg { .. } => "arg",
        }
    }

    /// The variant name as reported to the front-end.
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            Kind::Value { .. } => "value",
            Kind::Function { .. } => "function",
            Kind::Datastore { .. } => "datastore",
            Kind::Block { .. } => "block",
            Kind::Arg { .. } => "arg",
        }
    }

    /// The literal source string, for value nodes.
    pub fn src(&self) -> Option<&str> {
        match &self.kind {
            Kind::Value { src, .. } => Some(src),
            _ => None,
        }
    }

    /// The node's argument bindings. Only function nodes carry any.
    pub fn args(&self) -> Option<&ArgMap> {
        match &self.kind {
            Kind::Function { args, .. } => Some(args),
            _ => None,
        }
    }

    /// The resolved function spec, for function nodes.
    pub fn spec(&self) -> Option<&Rc<FunctionSpec>> {
        match &self.kind {
            Kind::Function { spec, .. } => Some(spec),
            _ => None,
        }
    }

    /// The node's memo cache, for function nodes.
    pub fn memo(&self) -> Option<&Memo> {
        match &self.kind {
            Kind::Function { memo, .. } => Some(memo),
            _ => None,
        }
    }

    /// Bind an argument to one of this function node's parameter slots.
    pub fn set_arg(&mut self, param: &str, arg: Arg) -> Result<(), NodeError> {
        let id = self.id;
        let Kind::Function { args, .. } = &mut self.kind else {
            return Err(NodeError::NotAFunction(id));
        };
        match args.set(param, arg) {
            Some(_) => Ok(()),
            None => Err(NodeError::UnknownParameter {
                node: id,
                param: param.to_string(),
            }),
        }
    }

    /// Repoint a function node at a different standard-library function.
    ///
    /// Re-resolves the spec, reinitializes every argument slot to blank
    /// and clears the memo cache, which is keyed per function.
    pub fn set_function(
        &mut self,
        name: impl Into<String>,
        registry: &Registry,
    ) -> Result<(), NodeError> {
        let id = self.id;
        let Kind::Function {
            name: cur_name,
            spec,
            args,
            memo,
        } = &mut self.kind
        else {
            return Err(NodeError::NotAFunction(id));
        };
        let name = name.into();
        let new_spec = registry.lookup(&name)?.clone();
        *cur_name = name;
        *args = ArgMap::blank(&new_spec.params);
        *spec = new_spec;
        memo.clear();
        Ok(())
    }

    /// The owning block's id, for arg nodes.
    pub fn block_id(&self) -> Option<Id> {
        match &self.kind {
            Kind::Arg { block_id, .. } => Some(*block_id),
            _ => None,
        }
    }

    /// The positional argument node ids, for block and arg nodes.
    pub fn arg_ids(&self) -> &[Id] {
        match &self.kind {
            Kind::Block { arg_ids } | Kind::Arg { arg_ids, .. } => arg_ids,
            _ => &[],
        }
    }

    /// The nodes whose lifetime hangs off this one, for graph maintenance.
    ///
    /// For function nodes these are the anonymous blocks owned by the call
    /// site: every edge-valued argument whose parameter is block-typed.
    /// For block nodes, the argument nodes plus every caller; for arg
    /// nodes, the owning block.
    pub fn dependents(&self, graph: &dyn GraphRead) -> Vec<Id> {
        match &self.kind {
            Kind::Value { .. } | Kind::Datastore { .. } => vec![],
            Kind::Function { spec, args, .. } => spec
                .params
                .iter()
                .filter(|p| p.ty == ParamTy::Block)
                .filter_map(|p| args.get(&p.name).and_then(Arg::edge_id))
                .collect(),
            Kind::Block { arg_ids } => {
                let mut deps = arg_ids.clone();
                deps.extend(graph.children(self.id).iter().map(|n| n.id()));
                deps
            }
            Kind::Arg { block_id, .. } => vec![*block_id],
        }
    }
}
