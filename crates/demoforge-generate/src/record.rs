use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Scalar value produced by a field evaluator.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(value) => Some(*value as f64),
            FieldValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Flat textual rendering used for CSV cells and partition segments.
    /// Null renders as the empty string.
    pub fn render(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Bool(value) => value.to_string(),
            FieldValue::Int(value) => value.to_string(),
            FieldValue::Float(value) => value.to_string(),
            FieldValue::Text(value) => value.clone(),
        }
    }

    /// Convert a JSON scalar (pool entry attribute, choice value) into a
    /// field value. Arrays and objects have no scalar meaning and collapse
    /// to their JSON text form.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Bool(value) => FieldValue::Bool(*value),
            serde_json::Value::Number(value) => {
                if let Some(int) = value.as_i64() {
                    FieldValue::Int(int)
                } else {
                    FieldValue::Float(value.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(value) => FieldValue::Text(value.clone()),
            other => FieldValue::Text(other.to_string()),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FieldValue::Null => serde_json::Value::Null,
            FieldValue::Bool(value) => serde_json::Value::Bool(*value),
            FieldValue::Int(value) => serde_json::Value::from(*value),
            FieldValue::Float(value) => serde_json::Number::from_f64(*value)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            FieldValue::Text(value) => serde_json::Value::String(value.clone()),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Round to `dp` decimal places, half away from zero.
pub fn round_dp(value: f64, dp: i32) -> f64 {
    let factor = 10f64.powi(dp);
    (value * factor).round() / factor
}

/// One generated record: an insertion-ordered mapping from field name to
/// scalar value. Field order follows the config's field order (key fields
/// first), which is also the CSV column order.
#[derive(Debug, Clone, Default)]
pub struct Record {
    entries: Vec<(String, FieldValue)>,
    index: HashMap<String, usize>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a field, preserving first-insertion order.
    pub fn insert(&mut self, name: &str, value: FieldValue) {
        match self.index.get(name) {
            Some(&pos) => self.entries[pos].1 = value,
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push((name.to_string(), value));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.index.get(name).map(|&pos| &self.entries[pos].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Copy of this record keeping only fields accepted by `keep`.
    pub fn retain_fields(&self, keep: impl Fn(&str) -> bool) -> Record {
        let mut projected = Record::new();
        for (name, value) in self.iter() {
            if keep(name) {
                projected.insert(name, value.clone());
            }
        }
        projected
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
