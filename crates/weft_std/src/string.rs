//! String functions.

use weft_core::{
    DVal, EvalError, FunctionSpec,
    node::{Param, ParamTy},
    reg::{self, ArgValues},
};

fn join(vals: &ArgValues) -> Result<DVal, EvalError> {
    let l = reg::arg(vals, "l")?;
    let sep = reg::arg(vals, "sep")?;
    match (l, sep) {
        (DVal::List(items), DVal::Str(sep)) => {
            let mut parts = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    DVal::Str(s) => parts.push(s.as_str()),
                    _ => return Err(EvalError::function("join", "expects a list of strings")),
                }
            }
            Ok(DVal::Str(parts.join(sep)))
        }
        (DVal::Incomplete, _) | (_, DVal::Incomplete) => Ok(DVal::Incomplete),
        _ => Err(EvalError::function("join", "expects a list and a separator")),
    }
}

fn length(vals: &ArgValues) -> Result<DVal, EvalError> {
    Ok(match reg::arg(vals, "s")? {
        DVal::Str(s) => DVal::Int(s.chars().count() as i64),
        _ => DVal::Incomplete,
    })
}

fn uppercase(vals: &ArgValues) -> Result<DVal, EvalError> {
    Ok(match reg::arg(vals, "s")? {
        DVal::Str(s) => DVal::Str(s.to_uppercase()),
        _ => DVal::Incomplete,
    })
}

/// The string function specs.
pub fn specs() -> Vec<FunctionSpec> {
    vec![
        FunctionSpec::new(
            "join",
            vec![
                Param::new("l", ParamTy::List),
                Param::new("sep", ParamTy::Str),
            ],
            true,
            join,
        ),
        // The registry is a flat namespace and `length` is taken by the
        // list function.
        FunctionSpec::new(
            "strlen",
            vec![Param::new("s", ParamTy::Str)],
            true,
            length,
        ),
        FunctionSpec::new(
            "uppercase",
            vec![Param::new("s", ParamTy::Str)],
            true,
            uppercase,
        ),
    ]
}
