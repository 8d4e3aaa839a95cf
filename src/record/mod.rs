use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// A raw field value as read from an evaluation target.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "null"),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Int(i) => write!(f, "{i}"),
            FieldValue::Float(x) => write!(f, "{x}"),
            FieldValue::Decimal(d) => write!(f, "{d}"),
            FieldValue::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<Decimal> for FieldValue {
    fn from(d: Decimal) -> Self {
        FieldValue::Decimal(d)
    }
}

impl From<&Decimal> for FieldValue {
    fn from(d: &Decimal) -> Self {
        FieldValue::Decimal(*d)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<&i64> for FieldValue {
    fn from(i: &i64) -> Self {
        FieldValue::Int(*i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i64::from(i))
    }
}

impl From<&i32> for FieldValue {
    fn from(i: &i32) -> Self {
        FieldValue::Int(i64::from(*i))
    }
}

impl From<f64> for FieldValue {
    fn from(x: f64) -> Self {
        FieldValue::Float(x)
    }
}

impl From<&f64> for FieldValue {
    fn from(x: &f64) -> Self {
        FieldValue::Float(*x)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<&String> for FieldValue {
    fn from(s: &String) -> Self {
        FieldValue::Text(s.clone())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<&FieldValue> for FieldValue {
    fn from(v: &FieldValue) -> Self {
        v.clone()
    }
}

// One impl per type; a blanket `From<&Option<T>>` overflows trait resolution.
macro_rules! optional_field_value {
    ($($t:ty),*) => {$(
        impl From<Option<$t>> for FieldValue {
            fn from(v: Option<$t>) -> Self {
                v.map(FieldValue::from).unwrap_or(FieldValue::Null)
            }
        }

        impl From<&Option<$t>> for FieldValue {
            fn from(v: &Option<$t>) -> Self {
                v.as_ref().map(FieldValue::from).unwrap_or(FieldValue::Null)
            }
        }
    )*};
}

optional_field_value!(Decimal, i64, i32, f64, bool, String);

impl From<&bool> for FieldValue {
    fn from(b: &bool) -> Self {
        FieldValue::Bool(*b)
    }
}

fn from_json(v: &Value) -> FieldValue {
    match v {
        Value::Null => FieldValue::Null,
        Value::Bool(b) => FieldValue::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => FieldValue::Int(i),
            // keep the literal digits so 0.1 stays exactly 0.1
            None => FieldValue::Text(n.to_string()),
        },
        Value::String(s) => FieldValue::Text(s.clone()),
        other => FieldValue::Text(other.to_string()),
    }
}

impl From<&Value> for FieldValue {
    fn from(v: &Value) -> Self {
        from_json(v)
    }
}

impl From<Value> for FieldValue {
    fn from(v: Value) -> Self {
        from_json(&v)
    }
}

/// Anything a formula can read field values from.
///
/// `None` means the field does not exist; a present field without a value is
/// `Some(FieldValue::Null)`.
pub trait Record {
    fn field(&self, name: &str) -> Option<FieldValue>;
}

impl<R: Record + ?Sized> Record for &R {
    fn field(&self, name: &str) -> Option<FieldValue> {
        (**self).field(name)
    }
}

impl<V> Record for HashMap<String, V>
where
    for<'a> &'a V: Into<FieldValue>,
{
    fn field(&self, name: &str) -> Option<FieldValue> {
        self.get(name).map(Into::into)
    }
}

impl<V> Record for BTreeMap<String, V>
where
    for<'a> &'a V: Into<FieldValue>,
{
    fn field(&self, name: &str) -> Option<FieldValue> {
        self.get(name).map(Into::into)
    }
}

impl Record for serde_json::Map<String, Value> {
    fn field(&self, name: &str) -> Option<FieldValue> {
        self.get(name).map(from_json)
    }
}

impl Record for Value {
    fn field(&self, name: &str) -> Option<FieldValue> {
        self.as_object().and_then(|m| m.field(name))
    }
}

/// Getter for one named field of `T`.
pub type Getter<T> = fn(&T) -> FieldValue;

/// Name → getter table for a record type, built once and shared.
///
/// ```
/// use formula_calc::record::{FieldAccessors, Record};
///
/// struct Cost { labor: i64 }
/// let accessors = FieldAccessors::new().with("labor", |c: &Cost| c.labor.into());
/// let cost = Cost { labor: 300 };
/// assert!(accessors.view(&cost).field("labor").is_some());
/// ```
pub struct FieldAccessors<T> {
    inner: Arc<HashMap<String, Getter<T>>>,
}

impl<T> Clone for FieldAccessors<T> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<T> Default for FieldAccessors<T> {
    fn default() -> Self {
        Self { inner: Arc::new(HashMap::new()) }
    }
}

impl<T> FieldAccessors<T> {
    pub fn new() -> Self { Self::default() }

    pub fn with(mut self, name: &str, getter: Getter<T>) -> Self {
        self.register(name, getter);
        self
    }

    pub fn register(&mut self, name: &str, getter: Getter<T>) {
        let map = Arc::make_mut(&mut self.inner);
        map.insert(name.to_string(), getter);
    }

    pub fn get(&self, name: &str) -> Option<Getter<T>> {
        self.inner.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    /// Pair the table with one record so it can be evaluated against.
    pub fn view<'a>(&'a self, record: &'a T) -> RecordView<'a, T> {
        RecordView { accessors: self, record }
    }
}

/// A record seen through its [`FieldAccessors`].
pub struct RecordView<'a, T> {
    accessors: &'a FieldAccessors<T>,
    record: &'a T,
}

impl<T> Record for RecordView<'_, T> {
    fn field(&self, name: &str) -> Option<FieldValue> {
        self.accessors.get(name).map(|getter| getter(self.record))
    }
}
