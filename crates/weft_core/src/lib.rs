//! The dataflow graph execution engine at the core of weft.
//!
//! Programs are directed graphs of value, function, datastore, block and
//! arg nodes. [`execute`] resolves a node to a runtime [`DVal`] by
//! demand-driven recursion, memoizing pure applications and constructing
//! invocable closures for blocks; [`preview`] reports per-argument live
//! values to the editor.

pub use eval::{EvalError, execute, preview};
pub use graph::{Graph, GraphHandle, GraphRead};
pub use node::Node;
pub use reg::{FunctionSpec, Registry};
pub use scope::Scope;
pub use value::DVal;

pub mod eval;
pub mod graph;
pub mod memo;
pub mod node;
pub mod reg;
pub mod scope;
pub mod value;
