//! Read access to the graph, and the in-memory store implementing it.

use crate::{
    eval::EvalError,
    node::{self, Arg, Node, NodeError},
    reg::Registry,
};
use log::debug;
use petgraph::{
    Direction,
    stable_graph::{NodeIndex, StableDiGraph},
    visit::EdgeRef,
};
use std::{
    collections::{HashMap, HashSet},
    rc::Rc,
};
use thiserror::Error;

/// The read-side capabilities the engine requires of a graph store.
///
/// The executor only ever reads: all mutation belongs to the store.
pub trait GraphRead {
    /// Look up a node by id. Absence is an invariant violation.
    fn node(&self, id: node::Id) -> Result<&Node, EvalError>;

    /// The nodes holding an edge pointing at `id` (its consumers).
    fn children(&self, id: node::Id) -> Vec<&Node>;

    /// Every node reachable over consumer edges from `id`, tagged with
    /// its maximum depth from `id`. Used by block evaluation to locate a
    /// block's return node.
    fn deepest(&self, id: node::Id) -> Vec<(usize, &Node)>;
}

/// A shared handle to a graph, as captured by block closures.
pub type GraphHandle = Rc<dyn GraphRead>;

/// An error occurred while editing a [`Graph`].
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("no node found for id `{0}`")]
    UnknownNode(node::Id),
    #[error(transparent)]
    Node(#[from] NodeError),
}

/// An in-memory graph store backed by petgraph.
///
/// The petgraph edges mirror the nodes' argument maps: an `Arg::Edge(d)`
/// bound on consumer `c` appears as a graph edge `d -> c`. Mirrored edges
/// are maintained by [`Graph::insert`], [`Graph::set_arg`] and
/// [`Graph::set_function`], so adjacency queries never rescan argument
/// maps.
#[derive(Debug, Default)]
pub struct Graph {
    g: StableDiGraph<Node, ()>,
    ids: HashMap<node::Id, NodeIndex>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.g.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.g.node_count() == 0
    }

    pub fn contains(&self, id: node::Id) -> bool {
        self.ids.contains_key(&id)
    }

    /// Insert a node, mirroring its argument edges.
    ///
    /// Edges are added in both directions of insertion order: to any
    /// already-present dependency of the new node, and from the new node
    /// to any already-present consumer referencing it.
    pub fn insert(&mut self, node: Node) -> node::Id {
        let id = node.id();
        let deps: Vec<node::Id> = node.args().map(|a| a.edges().collect()).unwrap_or_default();
        let ix = self.g.add_node(node);
        self.ids.insert(id, ix);
        for dep in deps {
            if let Some(&dep_ix) = self.ids.get(&dep) {
                self.g.add_edge(dep_ix, ix, ());
            }
        }
        // One mirrored edge per edge-valued parameter, so a consumer
        // referencing the new node through two parameters gets two.
        let consumers: Vec<(NodeIndex, usize)> = self
            .g
            .node_indices()
            .filter(|&c| c != ix)
            .map(|c| {
                let refs = self.g[c]
                    .args()
                    .map(|a| a.edges().filter(|&e| e == id).count())
                    .unwrap_or(0);
                (c, refs)
            })
            .filter(|&(_, refs)| refs > 0)
            .collect();
        for (c, refs) in consumers {
            for _ in 0..refs {
                self.g.add_edge(ix, c, ());
            }
        }
        id
    }

    /// Remove a node, dropping its mirrored edges (and with them the
    /// node's memo cache).
    pub fn remove(&mut self, id: node::Id) -> Option<Node> {
        let ix = self.ids.remove(&id)?;
        self.g.remove_node(ix)
    }

    /// Mutable access to a node, for editor-driven `cursor`/`pos` edits.
    pub fn node_mut(&mut self, id: node::Id) -> Result<&mut Node, GraphError> {
        let ix = *self.ids.get(&id).ok_or(GraphError::UnknownNode(id))?;
        Ok(&mut self.g[ix])
    }

    /// Bind an argument on a function node, rewiring the mirrored edges.
    pub fn set_arg(&mut self, id: node::Id, param: &str, arg: Arg) -> Result<(), GraphError> {
        let ix = *self.ids.get(&id).ok_or(GraphError::UnknownNode(id))?;
        let old = self.g[ix]
            .args()
            .and_then(|a| a.get(param))
            .and_then(Arg::edge_id);
        let new = arg.edge_id();
        self.g[ix].set_arg(param, arg)?;
        if old != new {
            if let Some(old_ix) = old.and_then(|d| self.ids.get(&d).copied())
                && let Some(e) = self.g.find_edge(old_ix, ix)
            {
                self.g.remove_edge(e);
            }
            if let Some(new_ix) = new.and_then(|d| self.ids.get(&d).copied()) {
                self.g.add_edge(new_ix, ix, ());
            }
            debug!("rewired `{param}` on node {id}: {old:?} -> {new:?}");
        }
        Ok(())
    }

    /// Repoint a function node at a different function.
    ///
    /// Every argument slot resets to blank, so all of the node's incoming
    /// mirrored edges are dropped.
    pub fn set_function(
        &mut self,
        id: node::Id,
        name: impl Into<String>,
        registry: &Registry,
    ) -> Result<(), GraphError> {
        let ix = *self.ids.get(&id).ok_or(GraphError::UnknownNode(id))?;
        self.g[ix].set_function(name, registry)?;
        let incoming: Vec<_> = self
            .g
            .edges_directed(ix, Direction::Incoming)
            .map(|e| e.id())
            .collect();
        for e in incoming {
            self.g.remove_edge(e);
        }
        Ok(())
    }
}

impl GraphRead for Graph {
    fn node(&self, id: node::Id) -> Result<&Node, EvalError> {
        let ix = self.ids.get(&id).ok_or(EvalError::UnknownNode(id))?;
        Ok(&self.g[*ix])
    }

    fn children(&self, id: node::Id) -> Vec<&Node> {
        let Some(&ix) = self.ids.get(&id) else {
            return vec![];
        };
        // Parallel edges (two parameters bound to the same dependency)
        // must not report the consumer twice.
        let mut seen = HashSet::new();
        self.g
            .neighbors_directed(ix, Direction::Outgoing)
            .filter(|&c| seen.insert(c))
            .map(|c| &self.g[c])
            .collect()
    }

    fn deepest(&self, id: node::Id) -> Vec<(usize, &Node)> {
        let Some(&start) = self.ids.get(&id) else {
            return vec![];
        };
        // Relax depths over consumer edges until each reachable node
        // carries its maximum depth. Terminates because the graph layer
        // guarantees acyclicity.
        let mut depths: HashMap<NodeIndex, usize> = HashMap::new();
        let mut stack = vec![(start, 0)];
        while let Some((ix, d)) = stack.pop() {
            for next in self.g.neighbors_directed(ix, Direction::Outgoing) {
                let depth = depths.entry(next).or_default();
                if *depth < d + 1 {
                    *depth = d + 1;
                    stack.push((next, d + 1));
                }
            }
        }
        depths.into_iter().map(|(ix, d)| (d, &self.g[ix])).collect()
    }
}
