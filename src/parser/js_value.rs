//! Value type for parsed data modules.

use serde_json::{Map, Number, Value};

/// Literal value from a data module. Object keys keep their source order.
#[derive(Debug, Clone, PartialEq)]
pub enum JsValue {
    Object(Vec<(String, JsValue)>),
    Array(Vec<JsValue>),
    String(String),
    Number(f64),
    Bool(bool),
    Null,
}

impl JsValue {
    pub fn as_object(&self) -> Option<&[(String, JsValue)]> {
        match self {
            JsValue::Object(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[JsValue]> {
        match self {
            JsValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            JsValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Property lookup; with duplicate keys the last one wins, as in an object literal.
    pub fn get(&self, key: &str) -> Option<&JsValue> {
        self.as_object()?
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Convert to JSON for typed deserialization. Integral numbers become JSON
    /// integers; `null` properties are dropped (treated as absent);
    /// non-finite numbers, which JSON cannot hold, become strings.
    pub fn to_json(&self) -> Value {
        match self {
            JsValue::Object(entries) => {
                let mut map = Map::new();
                for (k, v) in entries {
                    if *v != JsValue::Null {
                        map.insert(k.clone(), v.to_json());
                    }
                }
                Value::Object(map)
            }
            JsValue::Array(items) => Value::Array(items.iter().map(JsValue::to_json).collect()),
            JsValue::String(s) => Value::String(s.clone()),
            JsValue::Number(n) => number_to_json(*n),
            JsValue::Bool(b) => Value::Bool(*b),
            JsValue::Null => Value::Null,
        }
    }
}

fn number_to_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        return Value::Number(Number::from(n as i64));
    }
    match Number::from_f64(n) {
        Some(num) => Value::Number(num),
        None if n == f64::INFINITY => Value::String("Infinity".to_string()),
        None if n == f64::NEG_INFINITY => Value::String("-Infinity".to_string()),
        None => Value::String("NaN".to_string()),
    }
}
