use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::warn;

use crate::record::{FieldValue, Record};
use crate::tokenizer::{tokenize, Delimiters};

/// Field name → decimal value for a single evaluation.
pub type Bindings = BTreeMap<String, Decimal>;

/// Why a field fell back to zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldResolutionFailure {
    Absent,
    Null,
    Inconvertible(String),
}

/// Resolve every name against `target`. Fields that cannot be read bind zero.
pub fn bind<S: AsRef<str>>(names: &[S], target: &dyn Record, scale: u32) -> Bindings {
    let mut out = Bindings::new();
    for name in names {
        let name = name.as_ref();
        let value = match resolve(target, name, scale) {
            Ok(d) => d,
            Err(reason) => {
                warn!(field = name, ?reason, "field value unavailable, bound to 0");
                fixed_scale(Decimal::ZERO, scale)
            }
        };
        out.insert(name.to_string(), value);
    }
    out
}

fn resolve(target: &dyn Record, name: &str, scale: u32) -> Result<Decimal, FieldResolutionFailure> {
    let raw = target.field(name).ok_or(FieldResolutionFailure::Absent)?;
    to_decimal(&raw).map(|d| fixed_scale(d, scale))
}

/// Coerce a raw value without rounding.
pub fn to_decimal(raw: &FieldValue) -> Result<Decimal, FieldResolutionFailure> {
    let bad = || FieldResolutionFailure::Inconvertible(raw.to_string());
    match raw {
        FieldValue::Null => Err(FieldResolutionFailure::Null),
        FieldValue::Int(i) => Ok(Decimal::from(*i)),
        FieldValue::Decimal(d) => Ok(*d),
        FieldValue::Float(x) => Decimal::try_from(*x).map_err(|_| bad()),
        FieldValue::Text(s) => {
            let s = s.trim();
            Decimal::from_str(s)
                .or_else(|_| Decimal::from_scientific(s))
                .map_err(|_| bad())
        }
        FieldValue::Bool(_) => Err(bad()),
    }
}

/// Round half away from zero to `scale` digits and pad to exactly that scale.
pub fn fixed_scale(d: Decimal, scale: u32) -> Decimal {
    let mut out = d.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    out.rescale(scale);
    out
}

/// Identifier tokens of a final expression, first occurrence order.
pub fn referenced_identifiers(expr: &str, delimiters: &Delimiters) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tok in tokenize(expr, delimiters) {
        let starts_numeric = tok
            .chars()
            .next()
            .map(|c| c.is_ascii_digit() || c == '.')
            .unwrap_or(true);
        if !starts_numeric && !out.contains(&tok) {
            out.push(tok);
        }
    }
    out
}
