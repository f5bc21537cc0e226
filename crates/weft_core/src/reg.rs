//! The standard-library function registry consumed by the engine.

use crate::{eval::EvalError, node::Param, value::DVal};
use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    rc::Rc,
};
use thiserror::Error;

/// Resolved argument values, keyed by parameter name.
///
/// The `BTreeMap` ordering is what makes the memo key order-stable.
pub type ArgValues = BTreeMap<String, DVal>;

/// The implementation of a standard-library function.
pub type InvokeFn = Box<dyn Fn(&ArgValues) -> Result<DVal, EvalError>>;

/// An editor preview hook: the resolved arguments in parameter order plus
/// the caller's cursor, producing one live value per parameter.
pub type PreviewFn = Box<dyn Fn(&[DVal], usize) -> Vec<DVal>>;

/// A standard-library function as resolved from the [`Registry`].
pub struct FunctionSpec {
    pub name: String,
    pub params: Vec<Param>,
    /// Pure applications are memoized; impure ones re-execute on every
    /// demand.
    pub pure: bool,
    pub invoke: InvokeFn,
    pub preview: Option<PreviewFn>,
}

impl FunctionSpec {
    /// Construct a spec with no preview hook.
    pub fn new(
        name: impl Into<String>,
        params: Vec<Param>,
        pure: bool,
        invoke: impl Fn(&ArgValues) -> Result<DVal, EvalError> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            params,
            pure,
            invoke: Box::new(invoke),
            preview: None,
        }
    }

    /// Attach a preview hook.
    pub fn with_preview(mut self, hook: impl Fn(&[DVal], usize) -> Vec<DVal> + 'static) -> Self {
        self.preview = Some(Box::new(hook));
        self
    }
}

impl fmt::Debug for FunctionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionSpec")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("pure", &self.pure)
            .field("preview", &self.preview.is_some())
            .finish_non_exhaustive()
    }
}

/// Fetch a resolved argument by parameter name.
///
/// The executor supplies a value for every declared parameter, so a
/// missing key is an invariant violation.
pub fn arg<'a>(vals: &'a ArgValues, name: &str) -> Result<&'a DVal, EvalError> {
    vals.get(name).ok_or_else(|| EvalError::MissingArgument {
        param: name.to_string(),
    })
}

/// A function name with no registry entry behind it.
#[derive(Debug, Error)]
#[error("no function named `{0}` in the registry")]
pub struct UnknownFunction(pub String);

/// The set of standard-library functions available to function nodes.
///
/// Nodes resolve their function here exactly once, at construction.
#[derive(Debug, Default)]
pub struct Registry(HashMap<String, Rc<FunctionSpec>>);

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a function, replacing any existing entry with the same name.
    pub fn insert(&mut self, spec: FunctionSpec) {
        self.0.insert(spec.name.clone(), Rc::new(spec));
    }

    /// Resolve a function by name. Missing names are fatal at node
    /// construction time.
    pub fn lookup(&self, name: &str) -> Result<&Rc<FunctionSpec>, UnknownFunction> {
        self.0
            .get(name)
            .ok_or_else(|| UnknownFunction(name.to_string()))
    }

    /// Whether a function with the given name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }
}
