//! Values stored in the dictionary.
//!
//! Every data source decodes into the same closed union so that the number
//! helpers only ever have to deal with a fixed set of representations.

use indexmap::IndexMap;
use minijinja::value::ValueKind;
use serde::Serialize;
use std::fmt;

/// A dictionary value, whatever source it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    Bool(bool),
    Sequence(Vec<Value>),
    Mapping(IndexMap<String, Value>),
    Null,
}

impl Value {
    /// Builds a sequence of text values, as produced by a list source.
    pub fn text_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::Sequence(items.into_iter().map(|item| Value::Text(item.into())).collect())
    }

    /// Builds a text-to-text mapping, as produced by a map source.
    pub fn text_map<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Value::Mapping(
            pairs
                .into_iter()
                .map(|(key, value)| (key.into(), Value::Text(value.into())))
                .collect(),
        )
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s}"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Unsigned(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => write!(f, "null"),
            Value::Sequence(_) | Value::Mapping(_) => {
                write!(f, "{}", serde_json::to_string(self).map_err(|_| fmt::Error)?)
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Unsigned(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Integer(i)
                } else if let Some(u) = n.as_u64() {
                    Value::Unsigned(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or_default())
                }
            }
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Mapping(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<serde_yaml::Value> for Value {
    fn from(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Null => Value::Null,
            serde_yaml::Value::Bool(b) => Value::Bool(b),
            serde_yaml::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Integer(i)
                } else if let Some(u) = n.as_u64() {
                    Value::Unsigned(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or_default())
                }
            }
            serde_yaml::Value::String(s) => Value::Text(s),
            serde_yaml::Value::Sequence(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_yaml::Value::Mapping(map) => Value::Mapping(
                map.into_iter().map(|(k, v)| (yaml_key(k), Value::from(v))).collect(),
            ),
            serde_yaml::Value::Tagged(tagged) => Value::from(tagged.value),
        }
    }
}

/// YAML allows non-string keys; they are flattened to their text form.
fn yaml_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        other => Value::from(other).to_string(),
    }
}

impl From<toml::Value> for Value {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => Value::Text(s),
            toml::Value::Integer(i) => Value::Integer(i),
            toml::Value::Float(f) => Value::Float(f),
            toml::Value::Boolean(b) => Value::Bool(b),
            toml::Value::Datetime(dt) => Value::Text(dt.to_string()),
            toml::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            toml::Value::Table(table) => {
                Value::Mapping(table.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

/// Converts an argument handed to a template function back into a dictionary value.
impl From<&minijinja::Value> for Value {
    fn from(value: &minijinja::Value) -> Self {
        match value.kind() {
            ValueKind::Undefined | ValueKind::None => Value::Null,
            ValueKind::Bool => Value::Bool(value.is_true()),
            ValueKind::String => Value::Text(value.as_str().unwrap_or_default().to_string()),
            ValueKind::Number => {
                if let Ok(i) = i64::try_from(value.clone()) {
                    Value::Integer(i)
                } else if let Ok(u) = u64::try_from(value.clone()) {
                    Value::Unsigned(u)
                } else if let Ok(f) = f64::try_from(value.clone()) {
                    Value::Float(f)
                } else {
                    Value::Text(value.to_string())
                }
            }
            ValueKind::Seq => match value.try_iter() {
                Ok(items) => Value::Sequence(items.map(|item| Value::from(&item)).collect()),
                Err(_) => Value::Text(value.to_string()),
            },
            ValueKind::Map => match value.try_iter() {
                Ok(keys) => Value::Mapping(
                    keys.map(|key| {
                        let item = value.get_item(&key).unwrap_or_default();
                        let key = key.as_str().map(str::to_string).unwrap_or_else(|| key.to_string());
                        (key, Value::from(&item))
                    })
                    .collect(),
                ),
                Err(_) => Value::Text(value.to_string()),
            },
            _ => Value::Text(value.to_string()),
        }
    }
}
