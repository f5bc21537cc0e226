//! Arithmetic functions.

use weft_core::{
    DVal, EvalError, FunctionSpec,
    node::{Param, ParamTy},
    reg::{self, ArgValues},
};

fn params() -> Vec<Param> {
    vec![Param::new("a", ParamTy::Int), Param::new("b", ParamTy::Int)]
}

/// Apply a binary numeric operation, promoting to float when either
/// operand is one. Incomplete or non-numeric operands yield
/// [`DVal::Incomplete`].
fn arith(
    vals: &ArgValues,
    int: fn(i64, i64) -> i64,
    float: fn(f64, f64) -> f64,
) -> Result<DVal, EvalError> {
    let a = reg::arg(vals, "a")?;
    let b = reg::arg(vals, "b")?;
    Ok(match (a, b) {
        (DVal::Int(a), DVal::Int(b)) => DVal::Int(int(*a, *b)),
        (DVal::Int(a), DVal::Float(b)) => DVal::Float(float(*a as f64, *b)),
        (DVal::Float(a), DVal::Int(b)) => DVal::Float(float(*a, *b as f64)),
        (DVal::Float(a), DVal::Float(b)) => DVal::Float(float(*a, *b)),
        _ => DVal::Incomplete,
    })
}

fn divide(vals: &ArgValues) -> Result<DVal, EvalError> {
    if let (DVal::Int(_), DVal::Int(0)) = (reg::arg(vals, "a")?, reg::arg(vals, "b")?) {
        return Err(EvalError::function("divide", "division by zero"));
    }
    arith(vals, |a, b| a / b, |a, b| a / b)
}

/// The arithmetic function specs.
pub fn specs() -> Vec<FunctionSpec> {
    vec![
        FunctionSpec::new("add", params(), true, |vals| {
            arith(vals, |a, b| a + b, |a, b| a + b)
        }),
        FunctionSpec::new("subtract", params(), true, |vals| {
            arith(vals, |a, b| a - b, |a, b| a - b)
        }),
        FunctionSpec::new("multiply", params(), true, |vals| {
            arith(vals, |a, b| a * b, |a, b| a * b)
        }),
        FunctionSpec::new("divide", params(), true, divide),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vals(a: DVal, b: DVal) -> ArgValues {
        [("a".to_string(), a), ("b".to_string(), b)].into()
    }

    #[test]
    fn test_arith_promotion() {
        let out = arith(&vals(DVal::Int(2), DVal::Int(3)), |a, b| a + b, |a, b| a + b);
        assert_eq!(out.unwrap(), DVal::Int(5));
        let out = arith(
            &vals(DVal::Int(2), DVal::Float(0.5)),
            |a, b| a + b,
            |a, b| a + b,
        );
        assert_eq!(out.unwrap(), DVal::Float(2.5));
    }

    #[test]
    fn test_incomplete_operands() {
        let out = arith(
            &vals(DVal::Int(2), DVal::Incomplete),
            |a, b| a + b,
            |a, b| a + b,
        );
        assert_eq!(out.unwrap(), DVal::Incomplete);
    }

    #[test]
    fn test_divide_by_zero() {
        assert!(divide(&vals(DVal::Int(1), DVal::Int(0))).is_err());
        assert_eq!(
            divide(&vals(DVal::Int(7), DVal::Int(2))).unwrap(),
            DVal::Int(3)
        );
    }
}
