//! Projection of nodes into the stable records consumed by the front-end.
//!
//! Field names here are fixed for wire compatibility; renaming one is a
//! breaking protocol change.

use crate::{
    eval::EvalError,
    node::{Arg, Id, Node, Pos},
    value::DVal,
};
use serde::Serialize;

/// A node's most recently observed evaluation result.
///
/// The engine does not store observed values; the caller that ran the
/// evaluation supplies this quadruple alongside the node.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Live {
    /// Display representation of the value.
    pub value: String,
    /// The value's type name.
    #[serde(rename = "type")]
    pub ty: String,
    /// Lossy JSON projection of the value.
    pub json: serde_json::Value,
    /// The failure attached to this node, if evaluation raised one.
    pub exc: Option<String>,
}

impl Live {
    /// The quadruple observed from a successful evaluation.
    pub fn from_value(val: &DVal) -> Self {
        Self {
            value: val.to_string(),
            ty: val.type_name().to_string(),
            json: val.to_json(),
            exc: None,
        }
    }

    /// The quadruple for a node whose evaluation failed.
    pub fn from_error(err: &EvalError) -> Self {
        Self {
            value: DVal::Incomplete.to_string(),
            ty: DVal::Incomplete.type_name().to_string(),
            json: serde_json::Value::Null,
            exc: Some(err.to_string()),
        }
    }
}

/// Wire representation of a bound argument.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum ArgRepr {
    /// An edge, by target node id: `{"AEdge": id}`.
    AEdge(u64),
    /// A constant, by display representation: `{"AConst": repr}`.
    AConst(String),
}

impl From<&Arg> for ArgRepr {
    fn from(arg: &Arg) -> Self {
        match arg {
            Arg::Edge(id) => Self::AEdge(id.0),
            Arg::Const(val) => Self::AConst(val.to_string()),
        }
    }
}

/// The record serialized for the front-end.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Record {
    pub name: String,
    pub id: Id,
    #[serde(rename = "type")]
    pub ty: String,
    pub pos: Pos,
    pub live: Live,
    pub cursor: usize,
    /// One `[parameter, representation]` pair per argument slot.
    pub arguments: Vec<(String, ArgRepr)>,
    /// The owning block, for arg nodes; `null` otherwise.
    pub block_id: Option<Id>,
    pub arg_ids: Vec<Id>,
}

impl Record {
    /// Project the given node together with its observed value.
    pub fn new(node: &Node, live: Live) -> Self {
        let arguments = node
            .args()
            .map(|args| {
                args.iter()
                    .map(|(name, arg)| (name.to_string(), ArgRepr::from(arg)))
                    .collect()
            })
            .unwrap_or_default();
        Self {
            name: node.name().to_string(),
            id: node.id(),
            ty: node.type_name().to_string(),
            pos: node.pos(),
            live,
            cursor: node.cursor(),
            arguments,
            block_id: node.block_id(),
            arg_ids: node.arg_ids().to_vec(),
        }
    }
}
