// Tests for the front-end record: wire field names are fixed, so these
// assert exact JSON shapes.

use serde_json::json;
use weft_core::{
    DVal, EvalError, FunctionSpec, Node, Registry,
    node::{Arg, Id, Live, Param, ParamTy, Pos, Record},
};

fn test_registry() -> Registry {
    let mut registry = Registry::new();
    registry.insert(FunctionSpec::new(
        "add",
        vec![Param::new("a", ParamTy::Int), Param::new("b", ParamTy::Int)],
        true,
        |_| Ok(DVal::Null),
    ));
    registry
}

#[test]
fn test_function_node_record() {
    let registry = test_registry();
    let mut node = Node::function(Id(3), Pos::new(4, 5), "add", &registry).unwrap();
    node.set_arg("a", Arg::Edge(Id(1))).unwrap();

    let live = Live::from_value(&DVal::Int(5));
    let record = Record::new(&node, live);
    assert_eq!(
        serde_json::to_value(&record).unwrap(),
        json!({
            "name": "add",
            "id": 3,
            "type": "function",
            "pos": { "x": 4, "y": 5 },
            "live": { "value": "5", "type": "int", "json": 5, "exc": null },
            "cursor": 0,
            "arguments": [
                ["a", { "AEdge": 1 }],
                ["b", { "AConst": "<incomplete>" }],
            ],
            "block_id": null,
            "arg_ids": [],
        })
    );
}

#[test]
fn test_arg_node_record() {
    let node = Node::arg(Id(10), Pos::default(), Id(20), 0, vec![Id(10)]);
    let record = Record::new(&node, Live::from_value(&DVal::Incomplete));
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["type"], json!("arg"));
    assert_eq!(json["name"], json!("arg"));
    assert_eq!(json["block_id"], json!(20));
    assert_eq!(json["arg_ids"], json!([10]));
    assert_eq!(json["arguments"], json!([]));
}

#[test]
fn test_datastore_node_record() {
    let node = Node::datastore(Id(7), Pos::default(), "users");
    let record = Record::new(&node, Live::from_value(&DVal::Opaque("users".to_string())));
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["name"], json!("users"));
    assert_eq!(json["type"], json!("datastore"));
    assert_eq!(json["live"]["type"], json!("datastore"));
    assert_eq!(json["live"]["json"], json!({ "table": "users" }));
}

#[test]
fn test_live_from_error() {
    let err = EvalError::UnknownNode(Id(9));
    let live = Live::from_error(&err);
    assert_eq!(live.ty, "incomplete");
    assert!(live.exc.as_deref().unwrap().contains("9"));
    assert_eq!(live.json, serde_json::Value::Null);
}

#[test]
fn test_block_value_live() {
    // A block's display repr names the node that produced it; its JSON
    // projection is null.
    let live = Live::from_value(&DVal::Block(
        Id(20),
        weft_core::value::BlockFn::new(|_| Ok(DVal::Null)),
    ));
    assert_eq!(live.value, "<block 20>");
    assert_eq!(live.ty, "block");
    assert_eq!(live.json, serde_json::Value::Null);
}
