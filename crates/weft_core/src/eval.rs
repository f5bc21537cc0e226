//! The recursive demand-driven evaluator: [`execute`] and [`preview`].

use crate::{
    graph::GraphHandle,
    memo::Memo,
    node::{self, Arg, Kind, Node},
    reg::{ArgValues, FunctionSpec},
    scope::Scope,
    value::{BlockFn, DVal},
};
use log::{debug, trace};
use std::rc::Rc;
use thiserror::Error;

/// An error occurred during evaluation.
///
/// Every variant except [`EvalError::Function`] is an invariant
/// violation: the graph handed to the engine was not well-formed, and the
/// whole evaluation unwinds. Missing *values* are never errors; they
/// propagate in-band as [`DVal::Incomplete`].
#[derive(Debug, Error)]
pub enum EvalError {
    /// A node id with no node behind it.
    #[error("no node found for id `{0}`")]
    UnknownNode(node::Id),
    /// A resolved argument map with no value for a declared parameter.
    #[error("no argument bound for parameter `{param}`")]
    MissingArgument { param: String },
    /// A block closure invoked with the wrong number of arguments.
    #[error("block `{block}` expects {expected} argument(s), received {received}")]
    BlockArity {
        block: node::Id,
        expected: usize,
        received: usize,
    },
    /// An arg node whose owning block does not have exactly one caller.
    #[error("block `{block}` has {count} caller(s), expected exactly one")]
    CallerCount { block: node::Id, count: usize },
    /// A block whose argument nodes reach no descendant has no body.
    #[error("block `{0}` has no return node")]
    EmptyBlock(node::Id),
    /// Preview requested on a variant that does not support it.
    #[error("preview is not supported for {0} nodes")]
    Preview(&'static str),
    /// A standard-library function failed.
    ///
    /// The surrounding request handler catches this and attaches it to
    /// the offending node's `live.exc` field.
    #[error("function `{name}` failed: {message}")]
    Function { name: String, message: String },
}

impl EvalError {
    /// A standard-library function failure, for use by `invoke` bodies.
    pub fn function(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Function {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Resolve a node to a runtime value.
///
/// If `scope` binds the node's id, that value is returned without
/// visiting the node's arguments; this is how block arguments are
/// delivered. Otherwise every argument is resolved (edges recurse under
/// the same scope) and the variant-specific execution runs. Recursion is
/// bounded by graph depth; the graph layer guarantees acyclicity.
pub fn execute(graph: &GraphHandle, node: &Node, scope: &Scope) -> Result<DVal, EvalError> {
    if let Some(val) = scope.get(node.id()) {
        trace!("scope short-circuit for node {}", node.id());
        return Ok(val.clone());
    }
    let vals = resolve_args(graph, node, scope)?;
    match node.kind() {
        Kind::Value { value, .. } => Ok(value.clone()),
        Kind::Datastore { table } => Ok(DVal::Opaque(table.clone())),
        Kind::Function {
            name, spec, memo, ..
        } => exec_function(name, spec, memo, &vals),
        Kind::Block { arg_ids } => {
            let closure = block_closure(graph, node.id(), arg_ids, scope)?;
            Ok(DVal::Block(node.id(), closure))
        }
        Kind::Arg {
            block_id, index, ..
        } => exec_arg(graph, *block_id, *index),
    }
}

/// Resolve every argument of `node` to a value: constants clone, edges
/// recurse under the same scope.
fn resolve_args(graph: &GraphHandle, node: &Node, scope: &Scope) -> Result<ArgValues, EvalError> {
    let mut vals = ArgValues::new();
    if let Some(args) = node.args() {
        for (name, arg) in args.iter() {
            let val = match arg {
                Arg::Const(v) => v.clone(),
                Arg::Edge(id) => execute(graph, graph.node(*id)?, scope)?,
            };
            vals.insert(name.to_string(), val);
        }
    }
    Ok(vals)
}

fn exec_function(
    name: &str,
    spec: &FunctionSpec,
    memo: &Memo,
    vals: &ArgValues,
) -> Result<DVal, EvalError> {
    if !spec.pure {
        trace!("`{name}` is impure, re-invoking");
        return (spec.invoke)(vals);
    }
    // Incomplete inputs bypass the cache in both directions: the result
    // of a partially-wired call must not shadow the eventual real one.
    if vals.values().any(|v| *v == DVal::Incomplete) {
        trace!("`{name}` has incomplete inputs, invoking uncached");
        return (spec.invoke)(vals);
    }
    match Memo::key(vals) {
        // Closures and datastore handles have no canonical form.
        None => {
            trace!("`{name}` arguments are not cacheable, invoking uncached");
            (spec.invoke)(vals)
        }
        Some(key) => {
            if let Some(hit) = memo.get(&key) {
                trace!("memo hit for `{name}`");
                return Ok(hit);
            }
            trace!("memo miss for `{name}`");
            let out = (spec.invoke)(vals)?;
            memo.insert(key, out.clone());
            Ok(out)
        }
    }
}

/// The id of a block's return node: the shallowest of the deepest
/// descendants reachable from its argument nodes.
///
/// This is the whole of the body-resolution policy, kept in one place.
/// Depth ties break on node id so resolution is deterministic.
pub fn return_node(
    graph: &GraphHandle,
    block_id: node::Id,
    arg_ids: &[node::Id],
) -> Result<node::Id, EvalError> {
    let mut descendants: Vec<(usize, node::Id)> = arg_ids
        .iter()
        .flat_map(|&a| graph.deepest(a))
        .map(|(depth, n)| (depth, n.id()))
        .collect();
    descendants.sort_by_key(|&(depth, id)| (depth, id));
    match descendants.first() {
        Some(&(_, ret_id)) => Ok(ret_id),
        None => Err(EvalError::EmptyBlock(block_id)),
    }
}

/// Construct the invocable closure for a block node.
///
/// The block's interior is *not* evaluated here. The closure captures the
/// graph handle, the outer scope frozen at construction, the block's
/// argument node ids and its resolved [`return_node`].
fn block_closure(
    graph: &GraphHandle,
    block_id: node::Id,
    arg_ids: &[node::Id],
    scope: &Scope,
) -> Result<BlockFn, EvalError> {
    let ret_id = return_node(graph, block_id, arg_ids)?;
    let graph = Rc::clone(graph);
    let outer = scope.clone();
    let arg_ids = arg_ids.to_vec();
    Ok(BlockFn::new(move |args: &[DVal]| {
        if args.len() != arg_ids.len() {
            return Err(EvalError::BlockArity {
                block: block_id,
                expected: arg_ids.len(),
                received: args.len(),
            });
        }
        debug!("invoking block {block_id} with {} argument(s)", args.len());
        // A fresh frame per invocation, merged left-biased over the
        // captured outer scope.
        let bindings = arg_ids.iter().copied().zip(args.iter().cloned());
        let scope = outer.extend(bindings);
        execute(&graph, graph.node(ret_id)?, &scope)
    }))
}

/// An arg node is never reached during normal forward evaluation: a
/// reachable one means its id was not bound in scope, which only happens
/// during preview or on structurally invalid calls. Its value is the
/// corresponding element of a preview of the owning block's one caller.
fn exec_arg(graph: &GraphHandle, block_id: node::Id, index: usize) -> Result<DVal, EvalError> {
    let callers = graph.children(block_id);
    let &[caller] = callers.as_slice() else {
        return Err(EvalError::CallerCount {
            block: block_id,
            count: callers.len(),
        });
    };
    let vals = preview(graph, caller.cursor(), caller)?;
    Ok(vals.get(index).cloned().unwrap_or(DVal::Incomplete))
}

/// Report per-argument live values for the editor.
///
/// Arguments resolve under the empty scope exactly as in [`execute`],
/// then the function's preview hook is applied with the resolved values
/// in parameter order and the given cursor. A function without a hook
/// previews as [`DVal::Incomplete`] per parameter. Only function nodes
/// are previewable; preview may invoke impure functions, so callers
/// treat it as best-effort.
pub fn preview(graph: &GraphHandle, cursor: usize, node: &Node) -> Result<Vec<DVal>, EvalError> {
    let Kind::Function { spec, .. } = node.kind() else {
        return Err(EvalError::Preview(node.type_name()));
    };
    let vals = resolve_args(graph, node, &Scope::empty())?;
    let Some(hook) = &spec.preview else {
        return Ok(vec![DVal::Incomplete; spec.params.len()]);
    };
    let ordered = spec
        .params
        .iter()
        .map(|p| {
            vals.get(&p.name)
                .cloned()
                .ok_or_else(|| EvalError::MissingArgument {
                    param: p.name.clone(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(hook(&ordered, cursor))
}
