use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use tabmask_core::Value;

/// Hashable identity of a cell value.
///
/// Floats compare by bit pattern after folding `-0.0` into `0.0` and every
/// NaN into one canonical NaN.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKey {
    Null,
    Bool(bool),
    Int(i64),
    Float(u64),
    Date(NaiveDate),
    Text(String),
}

impl From<&Value> for ValueKey {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => ValueKey::Null,
            Value::Bool(flag) => ValueKey::Bool(*flag),
            Value::Int(number) => ValueKey::Int(*number),
            Value::Float(number) => ValueKey::Float(float_bits(*number)),
            Value::Date(date) => ValueKey::Date(*date),
            Value::Text(text) => ValueKey::Text(text.clone()),
        }
    }
}

fn float_bits(value: f64) -> u64 {
    if value.is_nan() {
        f64::NAN.to_bits()
    } else if value == 0.0 {
        0.0_f64.to_bits()
    } else {
        value.to_bits()
    }
}

/// Distinct values of a column in order of first appearance.
pub fn distinct_values(values: &[Value]) -> Vec<&Value> {
    let mut seen = HashSet::new();
    let mut distinct = Vec::new();
    for value in values {
        if seen.insert(ValueKey::from(value)) {
            distinct.push(value);
        }
    }
    distinct
}

/// Run-local substitution table for one column.
#[derive(Debug, Default, Clone)]
pub struct ValueMapping {
    entries: HashMap<ValueKey, Value>,
}

impl ValueMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, original: &Value, substitute: Value) {
        self.entries.insert(ValueKey::from(original), substitute);
    }

    pub fn get(&self, original: &Value) -> Option<&Value> {
        self.entries.get(&ValueKey::from(original))
    }

    /// Substitute every value; values missing from the table pass through.
    pub fn apply(&self, values: &[Value]) -> Vec<Value> {
        values
            .iter()
            .map(|value| self.get(value).cloned().unwrap_or_else(|| value.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
