use std::{collections::BTreeMap, fmt};

/// A bound argument or option value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Bool(bool),
    Num(f64),
    List(Vec<Value>),
}

impl Value {
    /// Interprets a raw command line string: the literals `true` and `false`
    /// become booleans, everything else stays a string.
    pub fn from_raw(raw: &str) -> Value {
        match raw {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::Str(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(it) => Some(it),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(it) => Some(*it),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Num(it) => Some(*it),
            Value::Str(it) => it.parse().ok(),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(it) => Some(it),
            _ => None,
        }
    }

    /// Calls `f` on every scalar: once for a scalar, once per element for a
    /// list.
    pub(crate) fn map_scalars(&self, f: &mut dyn FnMut(&str) -> Value) -> Value {
        match self {
            Value::List(items) => Value::List(items.iter().map(|it| it.map_scalars(f)).collect()),
            it => f(&it.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(it) => f.write_str(it),
            Value::Bool(it) => write!(f, "{it}"),
            Value::Num(it) if it.is_finite() && it.fract() == 0.0 && it.abs() < 1e15 => {
                write!(f, "{}", *it as i64)
            }
            Value::Num(it) => write!(f, "{it}"),
            Value::List(items) => {
                let mut sep = "";
                for item in items {
                    write!(f, "{sep}{item}")?;
                    sep = ", ";
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(it: &str) -> Value {
        Value::Str(it.to_string())
    }
}

impl From<String> for Value {
    fn from(it: String) -> Value {
        Value::Str(it)
    }
}

impl From<bool> for Value {
    fn from(it: bool) -> Value {
        Value::Bool(it)
    }
}

impl From<f64> for Value {
    fn from(it: f64) -> Value {
        Value::Num(it)
    }
}

macro_rules! from_int {
    ($($ty:ty),*) => {$(
        impl From<$ty> for Value {
            fn from(it: $ty) -> Value {
                Value::Num(it as f64)
            }
        }
    )*};
}

from_int!(i32, i64, u16, u32, u64, usize);

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(it: Vec<T>) -> Value {
        Value::List(it.into_iter().map(Into::into).collect())
    }
}

/// Name-to-value mapping, ordered by name.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Values {
    map: BTreeMap<String, Value>,
}

impl Values {
    pub fn new() -> Values {
        Values::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.map.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.map.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }

    pub fn get_list(&self, name: &str) -> Option<&[Value]> {
        self.get(name).and_then(Value::as_list)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.map.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Everything a parse bound: global names plus one scope per invoked
/// command.
///
/// Option values land both in the global namespace and in the scope of the
/// command that owns the option, so `serve --port=80` is readable as
/// `matches.get("port")` and `matches.scope("serve").get("port")`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Matches {
    values: Values,
    scopes: BTreeMap<String, Values>,
}

impl Matches {
    pub fn values(&self) -> &Values {
        &self.values
    }

    pub fn scope(&self, command: &str) -> Option<&Values> {
        self.scopes.get(command)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.values.get_str(name)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.values.get_bool(name)
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.values.get_f64(name)
    }

    pub fn get_list(&self, name: &str) -> Option<&[Value]> {
        self.values.get_list(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains(name)
    }

    /// All bindings, scoped ones rendered as `command.name`.
    pub fn iter(&self) -> impl Iterator<Item = (String, &Value)> + '_ {
        let global = self.values.iter().map(|(k, v)| (k.to_string(), v));
        let scoped = self
            .scopes
            .iter()
            .flat_map(|(scope, values)| values.iter().map(move |(k, v)| (format!("{scope}.{k}"), v)));
        global.chain(scoped)
    }

    pub(crate) fn bind(&mut self, scope: Option<&str>, name: &str, value: Value) {
        if let Some(scope) = scope {
            self.scopes.entry(scope.to_string()).or_default().insert(name, value.clone());
        }
        self.values.insert(name, value);
    }
}
