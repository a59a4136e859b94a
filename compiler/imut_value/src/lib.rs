//! Value trees operated on by mutation procedures.
//!
//! # Sharing
//!
//! Containers (lists, maps, records) and dates live behind [`Heap`] handles.
//! Cloning a `Value` shares its node; [`Value::same`] observes that identity
//! while `==` compares structure. Every `Value` is `Send + Sync`.
//!
//! # Writing
//!
//! A node can only be written through [`Heap::get_mut`], which refuses nodes
//! that are frozen or shared with another handle. Updates therefore never
//! leak into a tree that someone else still holds.

mod composite;
mod freeze;
mod heap;
mod write;

use std::fmt;
use std::sync::Arc;

pub use composite::{Class, Constructor, Date, Fields, Record};
pub use heap::Heap;
pub use write::WriteError;

/// Runtime value.
#[derive(Clone)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(Arc<str>),

    /// Timestamp; always re-allocated when on a write path.
    Date(Heap<Date>),
    /// Sequence of values.
    List(Heap<Vec<Value>>),
    /// Associative map with string keys, written through `get`/`set`/`delete`.
    Map(Heap<Fields>),
    /// Keyed record, written through plain field assignment.
    Record(Heap<Record>),
}

// Factory methods

impl Value {
    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Value::Str(s.into())
    }

    pub fn number(n: impl Into<f64>) -> Self {
        Value::Number(n.into())
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Heap::new(items))
    }

    pub fn map(entries: Fields) -> Self {
        Value::Map(Heap::new(entries))
    }

    /// Map from `(key, value)` pairs, in order.
    pub fn map_from<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Bare record (no class).
    pub fn record(fields: Fields) -> Self {
        Value::Record(Heap::new(Record::new(fields)))
    }

    /// Bare record from `(field, value)` pairs, in order.
    pub fn record_from<K: Into<String>>(fields: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::record(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Record that is an instance of `class`.
    pub fn instance(class: Arc<Class>, fields: Fields) -> Self {
        Value::Record(Heap::new(Record {
            class: Some(class),
            fields,
        }))
    }

    pub fn date(millis: i64) -> Self {
        Value::Date(Heap::new(Date { millis }))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s.into())
    }
}

// Inspection

impl Value {
    /// Identity: same node for heap values, equal contents for scalars.
    pub fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Date(a), Value::Date(b)) => a.ptr_eq(b),
            (Value::List(a), Value::List(b)) => a.ptr_eq(b),
            (Value::Map(a), Value::Map(b)) => a.ptr_eq(b),
            (Value::Record(a), Value::Record(b)) => a.ptr_eq(b),
            (Value::Date(_) | Value::List(_) | Value::Map(_) | Value::Record(_), _)
            | (_, Value::Date(_) | Value::List(_) | Value::Map(_) | Value::Record(_)) => false,
            _ => self == other,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Date(_) => "date",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Record(_) => "record",
        }
    }

    /// Whether this value holds a heap node.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            Value::Date(_) | Value::List(_) | Value::Map(_) | Value::Record(_)
        )
    }

    /// Key form of a string or finite number; `None` for anything else.
    ///
    /// Numbers are formatted the way property keys are spelled in source
    /// (`3` for `3.0`, `0` for `-0`).
    pub fn to_key(&self) -> Option<String> {
        match self {
            Value::Str(s) => Some(s.to_string()),
            Value::Number(n) if n.is_finite() => Some(format_number(*n)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Fields> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<Date> {
        match self {
            Value::Date(date) => Some(**date),
            _ => None,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Str(s) => !s.is_empty(),
            Value::Date(_) | Value::List(_) | Value::Map(_) | Value::Record(_) => true,
        }
    }

    /// Child reachable through `key`: a record field, a map entry or a list
    /// element. Strings and lists also expose `length`, maps `size`.
    pub fn get(&self, key: &str) -> Option<Value> {
        match self {
            Value::Record(record) => record.fields.get(key).cloned(),
            Value::Map(entries) => entries.get(key).cloned(),
            Value::List(items) => {
                if key == "length" {
                    return Some(Value::Number(items.len() as f64));
                }
                parse_index(key).and_then(|i| items.get(i)).cloned()
            }
            Value::Str(s) if key == "length" => Some(Value::Number(s.chars().count() as f64)),
            _ => None,
        }
    }

    /// Whether a write path may continue through `key` (the child exists).
    pub fn has_child(&self, key: &str) -> bool {
        match self {
            Value::Record(record) => record.fields.contains_key(key),
            Value::Map(entries) => entries.contains_key(key),
            Value::List(items) => parse_index(key).is_some_and(|i| i < items.len()),
            _ => false,
        }
    }

    /// Read `key` for a procedure: missing children and scalars read as
    /// `undefined`; maps expose `size` rather than their entries.
    pub fn read_property(&self, key: &str) -> Value {
        match self {
            Value::Map(entries) if key == "size" => Value::Number(entries.len() as f64),
            Value::Map(_) => Value::Undefined,
            _ => self.get(key).unwrap_or(Value::Undefined),
        }
    }
}

/// Parse a canonical list index (`"0"`, `"12"`, not `"01"` or `"-1"`).
pub fn parse_index(key: &str) -> Option<usize> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}

/// Format a number the way it appears as a key or in string concatenation.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    format!("{n}")
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "Undefined"),
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Number(n) => write!(f, "Number({n})"),
            Value::Str(s) => write!(f, "Str({:?})", &**s),
            Value::Date(d) => write!(f, "Date({})", d.millis),
            Value::List(items) => write!(f, "List({:?})", &**items),
            Value::Map(entries) => write!(f, "Map({:?})", &**entries),
            Value::Record(record) => match record.class_name() {
                Some(name) => write!(f, "{name}({:?})", record.fields),
                None => write!(f, "Record({:?})", record.fields),
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::Str(s) => write!(f, "{:?}", &**s),
            Value::Date(d) => write!(f, "Date({})", d.millis),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Map(entries) => {
                write!(f, "Map {{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    write!(f, "{}{k:?} => {v}", if i > 0 { ", " } else { " " })?;
                }
                write!(f, "{}}}", if entries.is_empty() { "" } else { " " })
            }
            Value::Record(record) => {
                if let Some(name) = record.class_name() {
                    write!(f, "{name} ")?;
                }
                write!(f, "{{")?;
                for (i, (k, v)) in record.fields.iter().enumerate() {
                    write!(f, "{}{k}: {v}", if i > 0 { ", " } else { " " })?;
                }
                write!(f, "{}}}", if record.fields.is_empty() { "" } else { " " })
            }
        }
    }
}
