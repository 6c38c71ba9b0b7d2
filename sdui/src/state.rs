//! Named mutable cells read by the renderer and written by actions.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

/// Native form of a state value.
#[derive(Debug, Clone, PartialEq)]
pub enum StateValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Null,
    /// Arrays and objects are kept as JSON.
    Json(Value),
}

impl StateValue {
    /// Convert JSON into its most specific native form.
    ///
    /// Primitives are tried as boolean, then integer, then float, then
    /// string; the first interpretation that succeeds wins. String content is
    /// interpreted too, so `"true"` becomes `Bool(true)` and `"42"` becomes
    /// `Int(42)`.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => StateValue::Null,
            Value::Bool(flag) => StateValue::Bool(*flag),
            Value::Number(number) => {
                if let Some(int) = number.as_i64() {
                    StateValue::Int(int)
                } else {
                    number
                        .as_f64()
                        .map(StateValue::Float)
                        .unwrap_or_else(|| StateValue::String(number.to_string()))
                }
            },
            Value::String(content) => Self::from_content(content),
            Value::Array(_) | Value::Object(_) => StateValue::Json(value.clone()),
        }
    }

    fn from_content(content: &str) -> Self {
        match content {
            "true" => return StateValue::Bool(true),
            "false" => return StateValue::Bool(false),
            _ => {},
        }
        if let Ok(int) = content.parse::<i64>() {
            return StateValue::Int(int);
        }
        if let Ok(float) = content.parse::<f64>() {
            return StateValue::Float(float);
        }
        StateValue::String(content.to_string())
    }

    pub fn to_json(&self) -> Value {
        match self {
            StateValue::Bool(flag) => Value::Bool(*flag),
            StateValue::Int(int) => Value::from(*int),
            StateValue::Float(float) => serde_json::Number::from_f64(*float)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            StateValue::String(content) => Value::String(content.clone()),
            StateValue::Null => Value::Null,
            StateValue::Json(value) => value.clone(),
        }
    }

    /// Runtime type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            StateValue::Bool(_) => "Boolean",
            StateValue::Int(_) => "Integer",
            StateValue::Float(_) => "Float",
            StateValue::String(_) => "String",
            StateValue::Null => "Null",
            StateValue::Json(_) => "Json",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StateValue::Bool(flag) => Some(*flag),
            _ => None,
        }
    }
}

impl fmt::Display for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateValue::Bool(flag) => write!(f, "{flag}"),
            StateValue::Int(int) => write!(f, "{int}"),
            StateValue::Float(float) => write!(f, "{float}"),
            StateValue::String(content) => f.write_str(content),
            StateValue::Null => f.write_str("null"),
            StateValue::Json(value) => write!(f, "{value}"),
        }
    }
}

impl From<bool> for StateValue {
    fn from(flag: bool) -> Self {
        StateValue::Bool(flag)
    }
}

impl From<i64> for StateValue {
    fn from(int: i64) -> Self {
        StateValue::Int(int)
    }
}

impl From<f64> for StateValue {
    fn from(float: f64) -> Self {
        StateValue::Float(float)
    }
}

impl From<&str> for StateValue {
    fn from(content: &str) -> Self {
        StateValue::String(content.to_string())
    }
}

/// Shared handle to one mutable state cell.
///
/// Clones point at the same cell. The handle is single-threaded; callers
/// that cross threads must serialize access themselves.
#[derive(Debug, Clone)]
pub struct StateHost {
    cell: Rc<RefCell<StateValue>>,
}

impl StateHost {
    pub fn new(initial: impl Into<StateValue>) -> Self {
        Self {
            cell: Rc::new(RefCell::new(initial.into())),
        }
    }

    pub fn get(&self) -> StateValue {
        self.cell.borrow().clone()
    }

    pub fn set(&self, value: impl Into<StateValue>) {
        *self.cell.borrow_mut() = value.into();
    }

    /// Whether both handles point at the same cell.
    pub fn same_cell(&self, other: &StateHost) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}

/// Named state hosts. Keys are the identity; inserting an existing key
/// replaces the host.
#[derive(Debug, Clone, Default)]
pub struct StateRegistry {
    hosts: HashMap<String, StateHost>,
}

impl StateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&StateHost> {
        self.hosts.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, host: StateHost) {
        self.hosts.insert(key.into(), host);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.hosts.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.hosts.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Copy every entry of `other` in, replacing hosts on key collision.
    pub fn extend_overriding(&mut self, other: &StateRegistry) {
        for (key, host) in &other.hosts {
            self.hosts.insert(key.clone(), host.clone());
        }
    }

    /// Current values as a JSON object, keys sorted.
    pub fn snapshot(&self) -> serde_json::Map<String, Value> {
        self.keys()
            .into_iter()
            .filter_map(|key| {
                self.get(key)
                    .map(|host| (key.to_string(), host.get().to_json()))
            })
            .collect()
    }
}

impl FromIterator<(String, StateHost)> for StateRegistry {
    fn from_iter<I: IntoIterator<Item = (String, StateHost)>>(iter: I) -> Self {
        Self {
            hosts: iter.into_iter().collect(),
        }
    }
}
