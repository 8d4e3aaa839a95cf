use rust_decimal::Decimal;

use crate::errors::{EvalError, Result};
use crate::expression::Scalar;

/// Turn the engine's scalar into the caller-facing decimal.
/// A missing scalar is a failure, never a silent zero.
pub fn to_decimal(scalar: Option<Scalar>, expression: &str) -> Result<Decimal> {
    match scalar {
        Some(s) => Ok(s.as_decimal().normalize()),
        None => Err(EvalError::EvaluationFailed {
            expression: expression.to_string(),
            reason: "engine produced no value".into(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn booleans_become_one_and_zero() {
        assert_eq!(to_decimal(Some(Scalar::Bool(true)), "x").unwrap(), Decimal::ONE);
        assert_eq!(to_decimal(Some(Scalar::Bool(false)), "x").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn trailing_zeros_are_dropped() {
        let d = to_decimal(Some(Scalar::Number(Decimal::new(70000, 2))), "x").unwrap();
        assert_eq!(d.to_string(), "700");
    }

    #[test]
    fn missing_value_is_an_error() {
        let err = to_decimal(None, "(a)*1").unwrap_err();
        assert_eq!(
            err,
            EvalError::EvaluationFailed { expression: "(a)*1".into(), reason: "engine produced no value".into() }
        );
    }
}
