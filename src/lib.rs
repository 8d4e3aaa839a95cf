//! Evaluate business formulas written with human field labels.
//!
//! ```
//! use formula_calc::eval_values;
//! use rust_decimal::Decimal;
//!
//! let out = eval_values("利息支出+劳务费", [("利息支出", 400), ("劳务费", 300)]).unwrap();
//! assert_eq!(out, Decimal::from(700));
//! ```

pub mod errors;
pub mod context;
pub mod engine;
pub mod record;     // field access for evaluation targets
pub mod script;
pub mod tokenizer;
pub mod resolver;
pub mod normalizer;
pub mod binder;
pub mod expression;
pub mod coerce;
mod parser;
mod comparison;

use rust_decimal::Decimal;
use context::Context;
use errors::Result;
use expression::{DecimalEngine, ExpressionEngine};
use record::{FieldValue, Record};
use tokenizer::Delimiters;

/// The main evaluator: a validated context plus the expression engine.
///
/// Holds no per-call state, so one instance can be shared across threads.
pub struct Evaluator {
    ctx: Context,
    delimiters: Delimiters,
    engine: Box<dyn ExpressionEngine>,
}

const _: fn() = || {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Evaluator>();
};

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Self {
            ctx: Context::default(),
            delimiters: Delimiters::default(),
            engine: Box::new(DecimalEngine),
        }
    }

    /// Fails when the context's delimiters collide with its label script.
    pub fn with_context(ctx: Context) -> Result<Self> {
        let delimiters = ctx.delimiter_set()?;
        Ok(Self { ctx, delimiters, engine: Box::new(DecimalEngine) })
    }

    /// Swap in another expression engine.
    pub fn with_engine<E: ExpressionEngine + 'static>(mut self, engine: E) -> Self {
        self.engine = Box::new(engine);
        self
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }

    pub fn engine(&self) -> &dyn ExpressionEngine {
        self.engine.as_ref()
    }

    /// Evaluate `formula`, whose labels are `titles`, reading the matching
    /// `names` from `target`.
    pub fn eval_record<T, N>(&self, titles: &[T], names: &[N], formula: &str, target: &dyn Record) -> Result<Decimal>
    where
        T: AsRef<str>,
        N: AsRef<str>,
    {
        engine::eval_record(self, titles, names, formula, target)
    }

    /// Same as [`Evaluator::eval_record`] with comma-delimited lists,
    /// e.g. `names = "shoes,hqCost"`, `titles = "鞋,总部成本"`.
    pub fn eval_record_csv(&self, names: &str, titles: &str, formula: &str, target: &dyn Record) -> Result<Decimal> {
        let names = resolver::split_list(names);
        let titles = resolver::split_list(titles);
        engine::eval_record(self, titles.as_slice(), names.as_slice(), formula, target)
    }

    /// Evaluate `formula` whose labels are the keys of `values`.
    pub fn eval_values<I, K, V>(&self, formula: &str, values: I) -> Result<Decimal>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<FieldValue>,
    {
        engine::eval_values(self, formula, values)
    }
}

/// Convenience: record form with comma-delimited names and titles.
pub fn eval_record(names: &str, titles: &str, formula: &str, target: &dyn Record) -> Result<Decimal> {
    Evaluator::new().eval_record_csv(names, titles, formula, target)
}

/// Convenience: value-map form with the default evaluator.
pub fn eval_values<I, K, V>(formula: &str, values: I) -> Result<Decimal>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<FieldValue>,
{
    Evaluator::new().eval_values(formula, values)
}

/// Re-export the most-used types for callers.
pub use errors::EvalError;
pub use expression::Scalar;
pub use record::FieldAccessors;
pub use script::ScriptTable;
