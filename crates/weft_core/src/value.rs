//! The universe of runtime values flowing through a weft graph.

use crate::eval::EvalError;
use crate::node;
use serde::ser::Error as _;
use std::{collections::BTreeMap, fmt, rc::Rc};
use thiserror::Error;

/// A runtime value produced by evaluating a node.
///
/// Values are cheaply cloneable and structurally comparable. Two of the
/// variants are special with respect to caching: [`DVal::Opaque`] wraps a
/// reference to external state and [`DVal::Block`] carries a live closure,
/// so neither has a canonical serialization (see the `Serialize` impl).
#[derive(Clone, Debug)]
pub enum DVal {
    /// The absence of a value.
    Null,
    /// Sentinel for an unbound or unresolved input.
    ///
    /// Propagates in-band through computations rather than as an error.
    Incomplete,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<DVal>),
    Obj(BTreeMap<String, DVal>),
    /// A handle to a datastore, identified by table name. The engine never
    /// dereferences these; datastore operations live in the standard
    /// library.
    Opaque(String),
    /// A first-class block closure, tagged with the id of the block node
    /// that produced it.
    Block(node::Id, BlockFn),
}

/// The invocable closure carried by a [`DVal::Block`] value.
///
/// Captures the graph handle, the frozen outer scope, the block's argument
/// node ids and its resolved return node. May be invoked any number of
/// times, including reentrantly; each call binds a fresh scope frame.
#[derive(Clone)]
pub struct BlockFn(Rc<dyn Fn(&[DVal]) -> Result<DVal, EvalError>>);

impl BlockFn {
    /// Wrap the given function as an invocable block closure.
    pub fn new(f: impl Fn(&[DVal]) -> Result<DVal, EvalError> + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invoke the closure with the given positional arguments.
    pub fn call(&self, args: &[DVal]) -> Result<DVal, EvalError> {
        (self.0)(args)
    }
}

impl fmt::Debug for BlockFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BlockFn")
    }
}

impl PartialEq for DVal {
    fn eq(&self, other: &Self) -> bool {
        use DVal::*;
        match (self, other) {
            (Null, Null) | (Incomplete, Incomplete) => true,
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            // Bit equality so that values containing floats stay usable as
            // stable cache keys.
            (Float(a), Float(b)) => a.to_bits() == b.to_bits(),
            (Str(a), Str(b)) => a == b,
            (List(a), List(b)) => a == b,
            (Obj(a), Obj(b)) => a == b,
            (Opaque(a), Opaque(b)) => a == b,
            // Closures are compared by the identity of the block node that
            // produced them.
            (Block(a, _), Block(b, _)) => a == b,
            _ => false,
        }
    }
}

impl DVal {
    /// The name of this value's type, as reported to the front-end.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Incomplete => "incomplete",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::List(_) => "list",
            Self::Obj(_) => "obj",
            Self::Opaque(_) => "datastore",
            Self::Block(..) => "block",
        }
    }

    /// A lossy JSON projection for the front-end.
    ///
    /// Closures serialize as `null` and datastore handles as an object
    /// naming their table; everything else maps structurally.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::{Value, json};
        match self {
            Self::Null | Self::Incomplete => Value::Null,
            Self::Bool(b) => json!(b),
            Self::Int(i) => json!(i),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Self::Str(s) => json!(s),
            Self::List(vs) => Value::Array(vs.iter().map(Self::to_json).collect()),
            Self::Obj(m) => Value::Object(
                m.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Self::Opaque(table) => json!({ "table": table }),
            Self::Block(..) => Value::Null,
        }
    }
}

/// The canonical serialization used for memo keys.
///
/// Total on every variant except [`DVal::Opaque`] and [`DVal::Block`],
/// which have no stable canonical form and fail serialization; callers
/// treat that failure as "not cacheable". Map keys are ordered by the
/// underlying `BTreeMap`, so the output is stable across argument
/// insertion order.
impl serde::Serialize for DVal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Null => serializer.serialize_unit_variant("DVal", 0, "Null"),
            Self::Incomplete => serializer.serialize_unit_variant("DVal", 1, "Incomplete"),
            Self::Bool(b) => serializer.serialize_newtype_variant("DVal", 2, "Bool", b),
            Self::Int(i) => serializer.serialize_newtype_variant("DVal", 3, "Int", i),
            Self::Float(f) => serializer.serialize_newtype_variant("DVal", 4, "Float", f),
            Self::Str(s) => serializer.serialize_newtype_variant("DVal", 5, "Str", s),
            Self::List(vs) => serializer.serialize_newtype_variant("DVal", 6, "List", vs),
            Self::Obj(m) => serializer.serialize_newtype_variant("DVal", 7, "Obj", m),
            Self::Opaque(_) => Err(S::Error::custom("datastore handles have no canonical form")),
            Self::Block(..) => Err(S::Error::custom("block closures have no canonical form")),
        }
    }
}

impl fmt::Display for DVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Incomplete => f.write_str("<incomplete>"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::List(vs) => {
                f.write_str("[")?;
                for (i, v) in vs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
            Self::Obj(m) => {
                f.write_str("{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
            Self::Opaque(table) => write!(f, "<datastore: {table}>"),
            Self::Block(id, _) => write!(f, "<block {id}>"),
        }
    }
}

/// An error occurred while parsing a value node's literal source.
#[derive(Debug, Error)]
pub enum LiteralError {
    /// Failed to parse a valid literal.
    #[error("failed to parse a valid literal: {err}")]
    Invalid {
        #[from]
        err: serde_json::Error,
    },
}

/// Parse a value node's literal source string.
///
/// Called once at value-node construction. A blank source is the
/// [`DVal::Incomplete`] sentinel; anything else must be a valid literal.
pub fn parse(src: &str) -> Result<DVal, LiteralError> {
    if src.trim().is_empty() {
        return Ok(DVal::Incomplete);
    }
    let json: serde_json::Value = serde_json::from_str(src)?;
    Ok(from_json(&json))
}

fn from_json(json: &serde_json::Value) -> DVal {
    use serde_json::Value;
    match json {
        Value::Null => DVal::Null,
        Value::Bool(b) => DVal::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => DVal::Int(i),
            None => DVal::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => DVal::Str(s.clone()),
        Value::Array(vs) => DVal::List(vs.iter().map(from_json).collect()),
        Value::Object(m) => DVal::Obj(
            m.iter()
                .map(|(k, v)| (k.clone(), from_json(v)))
                .collect(),
        ),
    }
}

#[test]
fn test_parse_literals() {
    assert_eq!(parse("42").unwrap(), DVal::Int(42));
    assert_eq!(parse("2.5").unwrap(), DVal::Float(2.5));
    assert_eq!(parse("\"hi\"").unwrap(), DVal::Str("hi".into()));
    assert_eq!(parse("true").unwrap(), DVal::Bool(true));
    assert_eq!(parse("null").unwrap(), DVal::Null);
    assert_eq!(
        parse("[1, 2]").unwrap(),
        DVal::List(vec![DVal::Int(1), DVal::Int(2)])
    );
    assert_eq!(parse("").unwrap(), DVal::Incomplete);
    assert_eq!(parse("  ").unwrap(), DVal::Incomplete);
    assert!(parse("not a literal").is_err());
}

#[test]
fn test_canonical_form() {
    // Distinct variants must not collide.
    let null = serde_json::to_string(&DVal::Null).unwrap();
    let incomplete = serde_json::to_string(&DVal::Incomplete).unwrap();
    assert_ne!(null, incomplete);
    let obj = DVal::Obj([("Bool".to_string(), DVal::Bool(true))].into());
    assert_ne!(
        serde_json::to_string(&obj).unwrap(),
        serde_json::to_string(&DVal::Bool(true)).unwrap()
    );

    // Handles and closures have no canonical form.
    assert!(serde_json::to_string(&DVal::Opaque("users".into())).is_err());
    let block = DVal::Block(node::Id(0), BlockFn::new(|_| Ok(DVal::Null)));
    assert!(serde_json::to_string(&block).is_err());
    assert!(serde_json::to_string(&DVal::List(vec![block])).is_err());
}
