// Tests for the in-memory store: adjacency queries and edge mirroring.

use weft_core::{
    DVal, FunctionSpec, Graph, GraphRead, Node, Registry,
    node::{Arg, Id, Param, ParamTy, Pos},
};

fn test_registry() -> Registry {
    let mut registry = Registry::new();
    registry.insert(FunctionSpec::new(
        "add",
        vec![Param::new("a", ParamTy::Int), Param::new("b", ParamTy::Int)],
        true,
        |_| Ok(DVal::Null),
    ));
    registry.insert(FunctionSpec::new(
        "negate",
        vec![Param::new("a", ParamTy::Int)],
        true,
        |_| Ok(DVal::Null),
    ));
    registry
}

fn value(g: &mut Graph, id: u64, src: &str) -> Id {
    g.insert(Node::value(Id(id), Pos::default(), src).unwrap())
}

fn function(g: &mut Graph, registry: &Registry, id: u64, name: &str, args: &[(&str, Id)]) -> Id {
    let mut node = Node::function(Id(id), Pos::default(), name, registry).unwrap();
    for (param, target) in args {
        node.set_arg(param, Arg::Edge(*target)).unwrap();
    }
    g.insert(node)
}

#[test]
fn test_children_are_consumers() {
    let registry = test_registry();
    let mut g = Graph::new();
    let one = value(&mut g, 1, "1");
    let two = value(&mut g, 2, "2");
    let add = function(&mut g, &registry, 3, "add", &[("a", one), ("b", two)]);

    let children: Vec<Id> = g.children(one).iter().map(|n| n.id()).collect();
    assert_eq!(children, vec![add]);
    assert!(g.children(add).is_empty());
}

#[test]
fn test_children_deduped_across_parallel_edges() {
    let registry = test_registry();
    let mut g = Graph::new();
    let one = value(&mut g, 1, "1");
    // Both parameters bound to the same dependency.
    let add = function(&mut g, &registry, 2, "add", &[("a", one), ("b", one)]);

    let children: Vec<Id> = g.children(one).iter().map(|n| n.id()).collect();
    assert_eq!(children, vec![add]);
}

// A diamond:
//
//    -------
//    | one |
//    -+---+-
//     |   |
//    -+-  -+-
//    |l|  |r|
//    -+-  -+-
//     |   |
//    -+---+-
//    | add |
//    -------
#[test]
fn test_deepest_reports_maximum_depth() {
    let registry = test_registry();
    let mut g = Graph::new();
    let one = value(&mut g, 1, "1");
    let l = function(&mut g, &registry, 2, "negate", &[("a", one)]);
    let r = function(&mut g, &registry, 3, "negate", &[("a", one)]);
    let add = function(&mut g, &registry, 4, "add", &[("a", l), ("b", r)]);

    let mut deepest: Vec<(usize, Id)> = g
        .deepest(one)
        .into_iter()
        .map(|(d, n)| (d, n.id()))
        .collect();
    deepest.sort();
    assert_eq!(deepest, vec![(1, l), (1, r), (2, add)]);
}

#[test]
fn test_insertion_order_does_not_matter() {
    let registry = test_registry();
    let mut g = Graph::new();
    // The consumer arrives before its dependency exists.
    let add = function(&mut g, &registry, 2, "negate", &[("a", Id(1))]);
    let one = value(&mut g, 1, "1");

    let children: Vec<Id> = g.children(one).iter().map(|n| n.id()).collect();
    assert_eq!(children, vec![add]);
}

#[test]
fn test_set_arg_rewires() {
    let registry = test_registry();
    let mut g = Graph::new();
    let one = value(&mut g, 1, "1");
    let two = value(&mut g, 2, "2");
    let neg = function(&mut g, &registry, 3, "negate", &[("a", one)]);

    g.set_arg(neg, "a", Arg::Edge(two)).unwrap();
    assert!(g.children(one).is_empty());
    let children: Vec<Id> = g.children(two).iter().map(|n| n.id()).collect();
    assert_eq!(children, vec![neg]);

    // Back to a constant: no consumers anywhere.
    g.set_arg(neg, "a", Arg::Const(DVal::Int(9))).unwrap();
    assert!(g.children(two).is_empty());

    // Unknown parameters are refused.
    assert!(g.set_arg(neg, "missing", Arg::blank()).is_err());
}

#[test]
fn test_set_function_resets_args_and_memo() {
    let registry = test_registry();
    let mut g = Graph::new();
    let one = value(&mut g, 1, "1");
    let neg = function(&mut g, &registry, 2, "negate", &[("a", one)]);

    g.node(neg)
        .unwrap()
        .memo()
        .unwrap()
        .insert("key".to_string(), DVal::Int(0));
    g.set_function(neg, "add", &registry).unwrap();

    let node = g.node(neg).unwrap();
    assert_eq!(node.name(), "add");
    assert!(node.memo().unwrap().is_empty());
    let names: Vec<_> = node.args().unwrap().iter().map(|(n, _)| n.to_string()).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(node.args().unwrap().get("a"), Some(&Arg::blank()));
    assert!(g.children(one).is_empty());
}

#[test]
fn test_unknown_node_is_fatal() {
    let g = Graph::new();
    assert!(g.node(Id(1)).is_err());
}

#[test]
fn test_remove() {
    let mut g = Graph::new();
    let one = value(&mut g, 1, "1");
    assert!(g.contains(one));
    assert!(g.remove(one).is_some());
    assert!(!g.contains(one));
    assert!(g.node(one).is_err());
}

#[test]
fn test_dependents_by_variant() {
    let mut g = Graph::new();
    let one = value(&mut g, 1, "1");

    // A block with one arg node and one caller.
    let block = Id(20);
    let x = g.insert(Node::arg(Id(10), Pos::default(), block, 0, vec![Id(10)]));
    let block = g.insert(Node::block(block, Pos::default(), vec![x]));
    let mut registry = Registry::new();
    registry.insert(FunctionSpec::new(
        "consume",
        vec![Param::new("f", ParamTy::Block), Param::new("n", ParamTy::Int)],
        true,
        |_| Ok(DVal::Null),
    ));
    let mut consume = Node::function(Id(30), Pos::default(), "consume", &registry).unwrap();
    consume.set_arg("f", Arg::Edge(block)).unwrap();
    consume.set_arg("n", Arg::Edge(one)).unwrap();
    let consume = g.insert(consume);

    // Value and datastore nodes own nothing.
    assert!(g.node(one).unwrap().dependents(&g).is_empty());

    // A function node owns the anonymous blocks behind its block-typed
    // parameters, and nothing else.
    assert_eq!(g.node(consume).unwrap().dependents(&g), vec![block]);

    // A block owns its arg nodes and is tied to its callers.
    let mut deps = g.node(block).unwrap().dependents(&g);
    deps.sort();
    assert_eq!(deps, vec![x, consume]);

    // An arg node hangs off its block.
    assert_eq!(g.node(x).unwrap().dependents(&g), vec![block]);
}
