//! Deep freezing.

use crate::Value;
use imut_stack::ensure_sufficient_stack;

impl Value {
    /// Mark every reachable node read-only.
    ///
    /// Children are frozen before their parent, so a frozen node always heads
    /// a fully frozen subtree and can be skipped. Scalars need no marking.
    pub fn deep_freeze(&self) {
        ensure_sufficient_stack(|| match self {
            Value::Date(date) => {
                date.freeze();
            }
            Value::List(items) => {
                if !items.is_frozen() {
                    items.iter().for_each(Value::deep_freeze);
                    items.freeze();
                }
            }
            Value::Map(entries) => {
                if !entries.is_frozen() {
                    entries.values().for_each(Value::deep_freeze);
                    entries.freeze();
                }
            }
            Value::Record(record) => {
                if !record.is_frozen() {
                    record.fields.values().for_each(Value::deep_freeze);
                    record.freeze();
                }
            }
            Value::Undefined | Value::Null | Value::Bool(_) | Value::Number(_) | Value::Str(_) => {}
        });
    }

    /// Whether this node is read-only. Scalars always are.
    pub fn is_frozen(&self) -> bool {
        match self {
            Value::Date(h) => h.is_frozen(),
            Value::List(h) => h.is_frozen(),
            Value::Map(h) => h.is_frozen(),
            Value::Record(h) => h.is_frozen(),
            Value::Undefined | Value::Null | Value::Bool(_) | Value::Number(_) | Value::Str(_) => {
                true
            }
        }
    }

    /// Whether this node and everything below it is read-only.
    pub fn is_deep_frozen(&self) -> bool {
        ensure_sufficient_stack(|| {
            self.is_frozen()
                && match self {
                    Value::List(items) => items.iter().all(Value::is_deep_frozen),
                    Value::Map(entries) => entries.values().all(Value::is_deep_frozen),
                    Value::Record(record) => record.fields.values().all(Value::is_deep_frozen),
                    _ => true,
                }
        })
    }
}
