use crate::expression::Scalar;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    fn holds(self, ord: Ordering) -> bool {
        match self {
            CmpOp::Eq => ord == Ordering::Equal,
            CmpOp::Ne => ord != Ordering::Equal,
            CmpOp::Lt => ord == Ordering::Less,
            CmpOp::Le => ord != Ordering::Greater,
            CmpOp::Gt => ord == Ordering::Greater,
            CmpOp::Ge => ord != Ordering::Less,
        }
    }
}

/// Compare two scalars numerically; booleans count as 1 and 0.
/// Scale is ignored: `1.00 == 1`.
pub fn cmp_scalars(a: Scalar, b: Scalar, op: CmpOp) -> bool {
    op.holds(a.as_decimal().cmp(&b.as_decimal()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn compares_across_scales_and_bools() {
        let one = Scalar::Number(Decimal::new(100, 2));
        assert!(cmp_scalars(one, Scalar::Number(Decimal::ONE), CmpOp::Eq));
        assert!(cmp_scalars(one, Scalar::Bool(true), CmpOp::Eq));
        assert!(cmp_scalars(Scalar::Bool(false), one, CmpOp::Lt));
        assert!(!cmp_scalars(one, one, CmpOp::Ne));
        assert!(cmp_scalars(one, one, CmpOp::Ge));
    }
}
