// src/expression.rs
use rust_decimal::{Decimal, MathematicalOps};

use crate::binder::Bindings;
use crate::comparison::cmp_scalars;
pub use crate::comparison::CmpOp;
use crate::errors::{EvalError, Result};
use crate::parser::Parser;

/// Value produced by an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar {
    Number(Decimal),
    Bool(bool),
}

impl Scalar {
    pub fn as_decimal(self) -> Decimal {
        match self {
            Scalar::Number(d) => d,
            Scalar::Bool(true) => Decimal::ONE,
            Scalar::Bool(false) => Decimal::ZERO,
        }
    }

    pub fn truthy(self) -> bool {
        match self {
            Scalar::Number(d) => !d.is_zero(),
            Scalar::Bool(b) => b,
        }
    }
}

/// Evaluates a normalized expression against per-call bindings.
///
/// `Ok(None)` means the engine ran but had nothing to return.
pub trait ExpressionEngine: Send + Sync {
    fn evaluate(&self, expr: &str, bindings: &Bindings) -> Result<Option<Scalar>>;
}

/// Recursive-descent arithmetic/logical evaluator over `Decimal`.
///
/// Holds no state: every call parses into a fresh tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecimalEngine;

impl ExpressionEngine for DecimalEngine {
    fn evaluate(&self, expr: &str, bindings: &Bindings) -> Result<Option<Scalar>> {
        let ast = parse_expr(expr)?;
        eval_ast(&ast, bindings, expr).map(Some)
    }
}

/// Parsed expression. Operator chains at one precedence level are kept flat
/// so a long `a+b+c+...` neither parses nor evaluates recursively.
#[derive(Debug, Clone, PartialEq)]
pub enum ENode {
    Num(Decimal),
    Var(String),
    Neg(Box<ENode>),
    Not(Box<ENode>),
    /// `first op1 x1 op2 x2 ...`, folded left to right.
    Chain(Box<ENode>, Vec<(ArithOp, ENode)>),
    Arith(ArithOp, Box<ENode>, Box<ENode>),
    Cmp(CmpOp, Box<ENode>, Box<ENode>),
    And(Vec<ENode>),
    Or(Vec<ENode>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

pub fn parse_expr(input: &str) -> Result<ENode> {
    let mut p = Parser::new(input);
    p.skip_ws();
    if p.eof() {
        return Err(EvalError::Parse("empty expression".into()));
    }
    let node = parse_or(&mut p)?;
    p.skip_ws();
    if !p.eof() {
        return Err(EvalError::Parse(format!("trailing input `{}`", p.rest())));
    }
    Ok(node)
}

fn parse_or(p: &mut Parser) -> Result<ENode> {
    let mut items = vec![parse_and(p)?];
    loop {
        p.skip_ws();
        if p.consume_str("||") {
            items.push(parse_and(p)?);
        } else {
            break;
        }
    }
    Ok(if items.len() == 1 { items.remove(0) } else { ENode::Or(items) })
}

fn parse_and(p: &mut Parser) -> Result<ENode> {
    let mut items = vec![parse_not(p)?];
    loop {
        p.skip_ws();
        if p.consume_str("&&") {
            items.push(parse_not(p)?);
        } else {
            break;
        }
    }
    Ok(if items.len() == 1 { items.remove(0) } else { ENode::And(items) })
}

fn parse_not(p: &mut Parser) -> Result<ENode> {
    p.skip_ws();
    if !p.peek_str("!=") && p.consume_char('!') {
        p.descend()?;
        let inner = parse_not(p)?;
        p.ascend();
        return Ok(ENode::Not(Box::new(inner)));
    }
    parse_compare(p)
}

fn parse_compare(p: &mut Parser) -> Result<ENode> {
    let left = parse_additive(p)?;
    p.skip_ws();
    // two-char operators first
    let op = if p.consume_str("==") {
        Some(CmpOp::Eq)
    } else if p.consume_str("!=") {
        Some(CmpOp::Ne)
    } else if p.consume_str("<=") {
        Some(CmpOp::Le)
    } else if p.consume_str(">=") {
        Some(CmpOp::Ge)
    } else if p.consume_char('<') {
        Some(CmpOp::Lt)
    } else if p.consume_char('>') {
        Some(CmpOp::Gt)
    } else {
        None
    };
    match op {
        Some(op) => {
            let right = parse_additive(p)?;
            Ok(ENode::Cmp(op, Box::new(left), Box::new(right)))
        }
        None => Ok(left),
    }
}

fn chain(first: ENode, rest: Vec<(ArithOp, ENode)>) -> ENode {
    if rest.is_empty() {
        first
    } else {
        ENode::Chain(Box::new(first), rest)
    }
}

fn parse_additive(p: &mut Parser) -> Result<ENode> {
    let first = parse_term(p)?;
    let mut rest = Vec::new();
    loop {
        p.skip_ws();
        let op = if p.consume_char('+') {
            ArithOp::Add
        } else if p.consume_char('-') {
            ArithOp::Sub
        } else {
            break;
        };
        rest.push((op, parse_term(p)?));
    }
    Ok(chain(first, rest))
}

fn parse_term(p: &mut Parser) -> Result<ENode> {
    let first = parse_unary(p)?;
    let mut rest = Vec::new();
    loop {
        p.skip_ws();
        let op = if p.consume_char('*') {
            ArithOp::Mul
        } else if p.consume_char('/') {
            ArithOp::Div
        } else if p.consume_char('%') {
            ArithOp::Rem
        } else {
            break;
        };
        rest.push((op, parse_unary(p)?));
    }
    Ok(chain(first, rest))
}

fn parse_unary(p: &mut Parser) -> Result<ENode> {
    p.skip_ws();
    if p.consume_char('-') {
        p.descend()?;
        let inner = parse_unary(p)?;
        p.ascend();
        return Ok(ENode::Neg(Box::new(inner)));
    }
    if p.consume_char('+') {
        p.descend()?;
        let inner = parse_unary(p)?;
        p.ascend();
        return Ok(inner);
    }
    parse_power(p)
}

fn parse_power(p: &mut Parser) -> Result<ENode> {
    let base = parse_primary(p)?;
    p.skip_ws();
    if p.consume_char('^') {
        // right associative: 2^3^2 == 2^(3^2)
        p.descend()?;
        let exp = parse_unary(p)?;
        p.ascend();
        return Ok(ENode::Arith(ArithOp::Pow, Box::new(base), Box::new(exp)));
    }
    Ok(base)
}

fn parse_primary(p: &mut Parser) -> Result<ENode> {
    p.skip_ws();
    if p.consume_char('(') {
        p.descend()?;
        let inner = parse_or(p)?;
        p.skip_ws();
        p.expect(')')?;
        p.ascend();
        return Ok(inner);
    }
    if p.at_number() {
        return Ok(ENode::Num(p.parse_number_literal()?));
    }
    if p.at_identifier() {
        return Ok(ENode::Var(p.parse_identifier()?.to_string()));
    }
    match p.peek_char() {
        Some(c) => Err(EvalError::Parse(format!("unexpected `{c}`"))),
        None => Err(EvalError::Parse("unexpected end of expression".into())),
    }
}

/// Evaluate a parsed tree. `source` is only used for error reporting.
pub fn eval_ast(node: &ENode, scope: &Bindings, source: &str) -> Result<Scalar> {
    match node {
        ENode::Num(d) => Ok(Scalar::Number(*d)),
        ENode::Var(name) => scope
            .get(name)
            .copied()
            .map(Scalar::Number)
            .ok_or_else(|| EvalError::Runtime(format!("unbound variable `{name}`"))),
        ENode::Neg(inner) => {
            let v = eval_ast(inner, scope, source)?.as_decimal();
            Ok(Scalar::Number(-v))
        }
        ENode::Not(inner) => Ok(Scalar::Bool(!eval_ast(inner, scope, source)?.truthy())),
        // no short-circuit: an unbound name on either side is still an error
        ENode::And(items) => {
            let mut all = true;
            for item in items {
                all &= eval_ast(item, scope, source)?.truthy();
            }
            Ok(Scalar::Bool(all))
        }
        ENode::Or(items) => {
            let mut any = false;
            for item in items {
                any |= eval_ast(item, scope, source)?.truthy();
            }
            Ok(Scalar::Bool(any))
        }
        ENode::Cmp(op, l, r) => {
            let a = eval_ast(l, scope, source)?;
            let b = eval_ast(r, scope, source)?;
            Ok(Scalar::Bool(cmp_scalars(a, b, *op)))
        }
        ENode::Chain(first, rest) => {
            let mut acc = eval_ast(first, scope, source)?.as_decimal();
            for (op, operand) in rest {
                let b = eval_ast(operand, scope, source)?.as_decimal();
                acc = arith(*op, acc, b, source)?;
            }
            Ok(Scalar::Number(acc))
        }
        ENode::Arith(op, l, r) => {
            let a = eval_ast(l, scope, source)?.as_decimal();
            let b = eval_ast(r, scope, source)?.as_decimal();
            arith(*op, a, b, source).map(Scalar::Number)
        }
    }
}

fn arith(op: ArithOp, a: Decimal, b: Decimal, source: &str) -> Result<Decimal> {
    let overflow = || EvalError::Runtime(format!("numeric overflow in {op:?}"));
    match op {
        ArithOp::Add => a.checked_add(b).ok_or_else(overflow),
        ArithOp::Sub => a.checked_sub(b).ok_or_else(overflow),
        ArithOp::Mul => a.checked_mul(b).ok_or_else(overflow),
        ArithOp::Div | ArithOp::Rem if b.is_zero() => Err(EvalError::DivisionByZero {
            expression: source.to_string(),
        }),
        ArithOp::Div => a.checked_div(b).ok_or_else(overflow),
        ArithOp::Rem => a.checked_rem(b).ok_or_else(overflow),
        ArithOp::Pow => {
            if !b.fract().is_zero() {
                return Err(EvalError::Runtime(format!("non-integral exponent {b}")));
            }
            let exp = i64::try_from(b).map_err(|_| overflow())?;
            if a.is_zero() && exp < 0 {
                return Err(EvalError::DivisionByZero {
                    expression: source.to_string(),
                });
            }
            a.checked_powi(exp).ok_or_else(overflow)
        }
    }
}
