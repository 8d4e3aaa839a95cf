use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use tracing::{debug, error, warn, warn_span};

use crate::binder::{bind, referenced_identifiers};
use crate::errors::{EvalError, Result};
use crate::normalizer::{coerce_numeric, prepare};
use crate::record::{FieldValue, Record};
use crate::resolver::{build_title_map, canonical_label, substitute};
use crate::tokenizer::tokenize;
use crate::Evaluator;

/// Prefix of the identifiers the value-map form gives its labels.
pub const GENERATED_PREFIX: &str = "_f";

/// =========================
/// Record form
/// =========================

/// Resolve labels through `titles[i] -> names[i]`, read the names from
/// `target` and evaluate.
pub fn eval_record<T, N>(
    ev: &Evaluator,
    titles: &[T],
    names: &[N],
    formula: &str,
    target: &dyn Record,
) -> Result<Decimal>
where
    T: AsRef<str>,
    N: AsRef<str>,
{
    if formula.trim().is_empty() {
        warn!(formula, "blank formula, returning 0");
        return Ok(Decimal::ZERO);
    }
    let title_map = build_title_map(titles, names).map_err(|e| {
        error!(formula, error = %e, "field titles and names do not line up");
        e
    })?;

    let prepared = prepare(formula);
    let tokens = tokenize(&prepared, ev.delimiters());
    let sub = substitute(&tokens, &title_map, &ev.context().script);
    let expression = coerce_numeric(&sub.expression);

    // labels that were substituted, plus field names written directly
    let mut wanted = sub.referenced;
    for id in referenced_identifiers(&expression, ev.delimiters()) {
        if !wanted.contains(&id) && names.iter().any(|n| n.as_ref() == id) {
            wanted.push(id);
        }
    }
    let _span = warn_span!("bind", formula, %expression).entered();
    let bindings = bind(&wanted, target, ev.context().scale);
    debug!(?bindings, "record formula resolved");
    finish(ev, formula, &expression, &bindings)
}

/// =========================
/// Value-map form
/// =========================

/// Evaluate with labels matched directly against the keys of `values`.
///
/// Keys written in the label script are swapped for generated identifiers
/// (`_f0`, `_f1`, ...) before parsing, so a label may start with anything,
/// digits included. Other keys are used as written.
pub fn eval_values<I, K, V>(ev: &Evaluator, formula: &str, values: I) -> Result<Decimal>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<FieldValue>,
{
    if formula.trim().is_empty() {
        warn!(formula, "blank formula, returning 0");
        return Ok(Decimal::ZERO);
    }
    let script = &ev.context().script;
    let entries: Vec<(String, FieldValue)> = values
        .into_iter()
        .map(|(k, v)| (canonical_label(k.as_ref()), v.into()))
        .collect();
    let taken: HashSet<String> = entries.iter().map(|(k, _)| k.clone()).collect();

    let mut title_map: HashMap<String, String> = HashMap::new();
    let mut bound: HashMap<String, FieldValue> = HashMap::new();
    let mut next = 0usize;
    for (label, value) in entries {
        let id = match title_map.get(&label) {
            Some(id) => id.clone(),
            None if script.contains_label_script(&label) => {
                let id = loop {
                    let candidate = format!("{GENERATED_PREFIX}{next}");
                    next += 1;
                    if !taken.contains(&candidate) {
                        break candidate;
                    }
                };
                title_map.insert(label, id.clone());
                id
            }
            None => label,
        };
        bound.insert(id, value);
    }

    let prepared = prepare(formula);
    let tokens = tokenize(&prepared, ev.delimiters());
    let sub = substitute(&tokens, &title_map, script);
    let expression = coerce_numeric(&sub.expression);

    let mut wanted = sub.referenced;
    for id in referenced_identifiers(&expression, ev.delimiters()) {
        if !wanted.contains(&id) && bound.contains_key(&id) {
            wanted.push(id);
        }
    }
    let _span = warn_span!("bind", formula, %expression).entered();
    let bindings = bind(&wanted, &bound, ev.context().scale);
    debug!(?bindings, "value formula resolved");
    finish(ev, formula, &expression, &bindings)
}

fn finish(
    ev: &Evaluator,
    formula: &str,
    expression: &str,
    bindings: &crate::binder::Bindings,
) -> Result<Decimal> {
    let scalar = match ev.engine().evaluate(expression, bindings) {
        Ok(s) => s,
        Err(e @ EvalError::DivisionByZero { .. }) => {
            error!(formula, expression, "formula divides by zero");
            return Err(e);
        }
        Err(e) => {
            error!(formula, expression, error = %e, "formula evaluation failed");
            return Err(EvalError::EvaluationFailed {
                expression: expression.to_string(),
                reason: e.to_string(),
            });
        }
    };
    crate::coerce::to_decimal(scalar, expression).map_err(|e| {
        error!(formula, expression, "formula produced no value");
        e
    })
}
