//! An impure pass-through logging function.

use weft_core::{
    DVal, EvalError, FunctionSpec,
    node::{Param, ParamTy},
    reg::{self, ArgValues},
};

fn log(vals: &ArgValues) -> Result<DVal, EvalError> {
    let v = reg::arg(vals, "v")?;
    log::info!("{v}");
    Ok(v.clone())
}

/// The logging function spec.
///
/// `log` is impure so that every demand re-logs rather than replaying a
/// memoized result.
pub fn specs() -> Vec<FunctionSpec> {
    vec![FunctionSpec::new(
        "log",
        vec![Param::new("v", ParamTy::Any)],
        false,
        log,
    )]
}
