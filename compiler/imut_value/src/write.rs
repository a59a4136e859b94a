//! In-place writes on uniquely held nodes.
//!
//! Every helper goes through [`Heap::get_mut`](crate::Heap::get_mut), so a
//! write can only land on a node that is neither frozen nor shared.

use crate::{parse_index, Value};
use thiserror::Error;

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum WriteError {
    #[error("node is frozen")]
    Frozen,

    #[error("node is shared with another owner")]
    Shared,

    #[error("cannot write `{key}` on a {type_name}")]
    NotAContainer { type_name: &'static str, key: String },

    #[error("`{key}` is not a list index")]
    InvalidIndex { key: String },

    #[error("index {index} is out of range for a list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("no child `{key}` to write through")]
    MissingChild { key: String },

    /// Plain assignment on a map; entries are written with `set`.
    #[error("map entries are written with `set`, not by assigning `{key}`")]
    MapPropertyWrite { key: String },
}

impl Value {
    /// Assign `key` on a record or list.
    ///
    /// Records gain the field if it is missing. Lists accept any index up to
    /// and including their length (which appends).
    pub fn set_key(&mut self, key: &str, value: Value) -> Result<(), WriteError> {
        match self {
            Value::Record(record) => {
                record.get_mut()?.fields.insert(key.to_string(), value);
                Ok(())
            }
            Value::List(items) => {
                let index = parse_index(key).ok_or_else(|| WriteError::InvalidIndex {
                    key: key.to_string(),
                })?;
                let items = items.get_mut()?;
                let len = items.len();
                match index.cmp(&len) {
                    std::cmp::Ordering::Less => items[index] = value,
                    std::cmp::Ordering::Equal => items.push(value),
                    std::cmp::Ordering::Greater => {
                        return Err(WriteError::IndexOutOfRange { index, len })
                    }
                }
                Ok(())
            }
            Value::Map(_) => Err(WriteError::MapPropertyWrite {
                key: key.to_string(),
            }),
            other => Err(WriteError::NotAContainer {
                type_name: other.type_name(),
                key: key.to_string(),
            }),
        }
    }

    /// Mutable access to an existing record field or list element.
    pub fn child_mut(&mut self, key: &str) -> Result<&mut Value, WriteError> {
        match self {
            Value::Record(record) => record
                .get_mut()?
                .fields
                .get_mut(key)
                .ok_or_else(|| WriteError::MissingChild {
                    key: key.to_string(),
                }),
            Value::List(items) => {
                let index = parse_index(key).ok_or_else(|| WriteError::InvalidIndex {
                    key: key.to_string(),
                })?;
                let items = items.get_mut()?;
                let len = items.len();
                items
                    .get_mut(index)
                    .ok_or(WriteError::IndexOutOfRange { index, len })
            }
            Value::Map(_) => Err(WriteError::MapPropertyWrite {
                key: key.to_string(),
            }),
            other => Err(WriteError::NotAContainer {
                type_name: other.type_name(),
                key: key.to_string(),
            }),
        }
    }

    /// Mutable access to an existing map entry (a `get(key)` step).
    pub fn map_entry_mut(&mut self, key: &str) -> Result<&mut Value, WriteError> {
        match self {
            Value::Map(entries) => {
                entries
                    .get_mut()?
                    .get_mut(key)
                    .ok_or_else(|| WriteError::MissingChild {
                        key: key.to_string(),
                    })
            }
            other => Err(WriteError::NotAContainer {
                type_name: other.type_name(),
                key: key.to_string(),
            }),
        }
    }

    /// Insert or overwrite a map entry.
    pub fn map_set(&mut self, key: String, value: Value) -> Result<(), WriteError> {
        match self {
            Value::Map(entries) => {
                entries.get_mut()?.insert(key, value);
                Ok(())
            }
            other => Err(WriteError::NotAContainer {
                type_name: other.type_name(),
                key,
            }),
        }
    }

    /// Remove a map entry, keeping the order of the rest. Returns whether the
    /// key was present.
    pub fn map_delete(&mut self, key: &str) -> Result<bool, WriteError> {
        match self {
            Value::Map(entries) => Ok(entries.get_mut()?.shift_remove(key).is_some()),
            other => Err(WriteError::NotAContainer {
                type_name: other.type_name(),
                key: key.to_string(),
            }),
        }
    }
}
