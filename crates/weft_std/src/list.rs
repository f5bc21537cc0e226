//! List functions, including the higher-order `map`.

use weft_core::{
    DVal, EvalError, FunctionSpec,
    node::{Param, ParamTy},
    reg::{self, ArgValues},
};

fn map(vals: &ArgValues) -> Result<DVal, EvalError> {
    let l = reg::arg(vals, "l")?;
    let f = reg::arg(vals, "f")?;
    match (l, f) {
        (DVal::List(items), DVal::Block(_, block)) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(block.call(std::slice::from_ref(item))?);
            }
            Ok(DVal::List(out))
        }
        (DVal::Incomplete, _) | (_, DVal::Incomplete) => Ok(DVal::Incomplete),
        _ => Err(EvalError::function("map", "expects a list and a block")),
    }
}

fn head(vals: &ArgValues) -> Result<DVal, EvalError> {
    Ok(match reg::arg(vals, "l")? {
        DVal::List(items) => items.first().cloned().unwrap_or(DVal::Null),
        _ => DVal::Incomplete,
    })
}

fn length(vals: &ArgValues) -> Result<DVal, EvalError> {
    Ok(match reg::arg(vals, "l")? {
        DVal::List(items) => DVal::Int(items.len() as i64),
        _ => DVal::Incomplete,
    })
}

fn repeat(vals: &ArgValues) -> Result<DVal, EvalError> {
    let times = reg::arg(vals, "times")?;
    let v = reg::arg(vals, "v")?;
    match times {
        DVal::Int(n) if *n >= 0 => Ok(DVal::List(vec![v.clone(); *n as usize])),
        DVal::Int(_) => Err(EvalError::function("repeat", "negative count")),
        _ => Ok(DVal::Incomplete),
    }
}

/// The list function specs.
pub fn specs() -> Vec<FunctionSpec> {
    vec![
        FunctionSpec::new("empty", vec![], true, |_| Ok(DVal::List(vec![]))),
        FunctionSpec::new(
            "length",
            vec![Param::new("l", ParamTy::List)],
            true,
            length,
        ),
        FunctionSpec::new("head", vec![Param::new("l", ParamTy::List)], true, head),
        FunctionSpec::new(
            "map",
            vec![
                Param::new("l", ParamTy::List),
                Param::new("f", ParamTy::Block),
            ],
            true,
            map,
        ),
        FunctionSpec::new(
            "repeat",
            vec![
                Param::new("times", ParamTy::Int),
                Param::new("v", ParamTy::Any),
            ],
            true,
            repeat,
        )
        // Per-argument live values: the count as-is, and the element that
        // would land at index `cursor` of the repeated list.
        .with_preview(|params, cursor| {
            let times = params.first().cloned().unwrap_or(DVal::Incomplete);
            let element = match (&times, params.get(1)) {
                (DVal::Int(n), Some(v)) if (cursor as i64) < *n => v.clone(),
                _ => DVal::Incomplete,
            };
            vec![times, element]
        }),
    ]
}
