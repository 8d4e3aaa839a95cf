use formula_calc::context::Context;
use formula_calc::{self as fc, EvalError, Evaluator};
use serde_json::json;

#[test]
fn test_arity_mismatch_is_fatal() {
    let err = fc::eval_record("a,b", "甲", "甲+1", &json!({"a": 1})).unwrap_err();
    assert_eq!(err, EvalError::ArityMismatch { titles: 1, names: 2 });
    assert!(err.is_invalid_argument());
}

#[test]
fn test_malformed_formula_reports_normalized_expression() {
    let err = fc::eval_values("=甲 +* 2", [("甲", 1)]).unwrap_err();
    match err {
        EvalError::EvaluationFailed { expression, .. } => assert_eq!(expression, "(_f0+*2)*1"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unknown_label_cannot_be_evaluated() {
    // unknown labels survive substitution but have no value
    let err = fc::eval_record("a", "甲", "甲+乙", &json!({"a": 1})).unwrap_err();
    assert!(matches!(err, EvalError::EvaluationFailed { ref reason, .. } if reason.contains("乙")));
}

#[test]
fn test_division_by_zero() {
    let err = fc::eval_values("甲/乙", [("甲", 1), ("乙", 0)]).unwrap_err();
    assert_eq!(err, EvalError::DivisionByZero { expression: "(_f0/_f1)*1".into() });
}

#[test]
fn test_delimiters_must_not_split_labels() {
    let ctx = Context::default().with_delimiters("+-（）");
    assert!(matches!(Evaluator::with_context(ctx), Err(EvalError::DelimiterConflict('（'))));
}
