// Tests for preview evaluation and the arg-node path that rides on it.

use std::rc::Rc;
use weft_core::{
    DVal, FunctionSpec, Graph, GraphHandle, Node, Registry, Scope, execute, preview,
    node::{Arg, Id, Param, ParamTy, Pos},
};

fn test_registry() -> Registry {
    let mut registry = Registry::new();
    // A function whose preview reports its resolved arguments in
    // parameter order, with the cursor appended.
    registry.insert(
        FunctionSpec::new(
            "probe",
            vec![Param::new("a", ParamTy::Any), Param::new("b", ParamTy::Any)],
            true,
            |_| Ok(DVal::Null),
        )
        .with_preview(|params, cursor| {
            let mut out = params.to_vec();
            out.push(DVal::Int(cursor as i64));
            out
        }),
    );
    // A function with no preview hook.
    registry.insert(FunctionSpec::new(
        "mute",
        vec![Param::new("a", ParamTy::Any), Param::new("b", ParamTy::Any)],
        true,
        |_| Ok(DVal::Null),
    ));
    // A block-consuming function whose preview depends only on the cursor.
    registry.insert(
        FunctionSpec::new(
            "consume",
            vec![Param::new("f", ParamTy::Block)],
            true,
            |_| Ok(DVal::Null),
        )
        .with_preview(|_, cursor| vec![DVal::Str(format!("c{cursor}"))]),
    );
    registry
}

#[test]
fn test_preview_applies_hook_in_param_order() {
    let registry = test_registry();
    let mut g = Graph::new();
    let two = g.insert(Node::value(Id(1), Pos::default(), "2").unwrap());
    let mut probe = Node::function(Id(2), Pos::default(), "probe", &registry).unwrap();
    probe.set_arg("a", Arg::Const(DVal::Int(1))).unwrap();
    probe.set_arg("b", Arg::Edge(two)).unwrap();
    let probe = g.insert(probe);
    let g: GraphHandle = Rc::new(g);

    let out = preview(&g, 0, g.node(probe).unwrap()).unwrap();
    assert_eq!(out, vec![DVal::Int(1), DVal::Int(2), DVal::Int(0)]);

    // Preview is the only cursor-sensitive operation.
    let out = preview(&g, 1, g.node(probe).unwrap()).unwrap();
    assert_eq!(out, vec![DVal::Int(1), DVal::Int(2), DVal::Int(1)]);
}

#[test]
fn test_preview_without_hook_is_incomplete_per_param() {
    let registry = test_registry();
    let mut g = Graph::new();
    let mute = g.insert(Node::function(Id(1), Pos::default(), "mute", &registry).unwrap());
    let g: GraphHandle = Rc::new(g);

    let out = preview(&g, 0, g.node(mute).unwrap()).unwrap();
    assert_eq!(out, vec![DVal::Incomplete, DVal::Incomplete]);
}

#[test]
fn test_preview_unsupported_variants() {
    let mut g = Graph::new();
    let val = g.insert(Node::value(Id(1), Pos::default(), "1").unwrap());
    let store = g.insert(Node::datastore(Id(2), Pos::default(), "users"));
    let g: GraphHandle = Rc::new(g);

    assert!(preview(&g, 0, g.node(val).unwrap()).is_err());
    assert!(preview(&g, 0, g.node(store).unwrap()).is_err());
}

// An arg node reached outside any closure scope resolves through a
// preview of its block's single caller:
//
//    ---------           -----------
//    | block | <-Edge(f)-| consume |
//    ---------           -----------
//        |
//    -----------
//    | arg (x) |
//    -----------
fn arg_graph(registry: &Registry) -> (Graph, Id, Id) {
    let mut g = Graph::new();
    let block = Id(20);
    let x = g.insert(Node::arg(Id(10), Pos::default(), block, 0, vec![Id(10)]));
    let block = g.insert(Node::block(block, Pos::default(), vec![x]));
    let mut consume = Node::function(Id(30), Pos::default(), "consume", registry).unwrap();
    consume.set_arg("f", Arg::Edge(block)).unwrap();
    let consume = g.insert(consume);
    (g, x, consume)
}

#[test]
fn test_arg_node_previews_single_caller() {
    let registry = test_registry();
    let (g, x, _) = arg_graph(&registry);
    let g: GraphHandle = Rc::new(g);

    let out = execute(&g, g.node(x).unwrap(), &Scope::empty()).unwrap();
    assert_eq!(out, DVal::Str("c0".to_string()));
}

#[test]
fn test_arg_node_uses_caller_cursor() {
    let registry = test_registry();
    let (mut g, x, consume) = arg_graph(&registry);
    g.node_mut(consume).unwrap().set_cursor(2);
    let g: GraphHandle = Rc::new(g);

    let out = execute(&g, g.node(x).unwrap(), &Scope::empty()).unwrap();
    assert_eq!(out, DVal::Str("c2".to_string()));
}

#[test]
fn test_arg_node_index_out_of_range_is_incomplete() {
    let registry = test_registry();
    let mut g = Graph::new();
    let block = Id(20);
    // Index 5 of a preview that only yields one element.
    let x = g.insert(Node::arg(Id(10), Pos::default(), block, 5, vec![Id(10)]));
    let block = g.insert(Node::block(block, Pos::default(), vec![x]));
    let mut consume = Node::function(Id(30), Pos::default(), "consume", &registry).unwrap();
    consume.set_arg("f", Arg::Edge(block)).unwrap();
    g.insert(consume);
    let g: GraphHandle = Rc::new(g);

    let out = execute(&g, g.node(x).unwrap(), &Scope::empty()).unwrap();
    assert_eq!(out, DVal::Incomplete);
}

#[test]
fn test_arg_node_caller_count_is_fatal() {
    let registry = test_registry();

    // No caller at all.
    let mut g = Graph::new();
    let block = Id(20);
    let x = g.insert(Node::arg(Id(10), Pos::default(), block, 0, vec![Id(10)]));
    g.insert(Node::block(block, Pos::default(), vec![x]));
    let g: GraphHandle = Rc::new(g);
    assert!(execute(&g, g.node(x).unwrap(), &Scope::empty()).is_err());

    // More than one caller.
    let (mut g, x, _) = arg_graph(&registry);
    let mut other = Node::function(Id(31), Pos::default(), "consume", &registry).unwrap();
    other.set_arg("f", Arg::Edge(Id(20))).unwrap();
    g.insert(other);
    let g: GraphHandle = Rc::new(g);
    assert!(execute(&g, g.node(x).unwrap(), &Scope::empty()).is_err());
}
