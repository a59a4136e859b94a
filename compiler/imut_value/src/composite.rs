//! Records, classes and dates.

use crate::Value;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Insertion-ordered field table shared by records and maps.
pub type Fields = IndexMap<String, Value>;

/// Produces the default fields of a fresh instance.
pub type Constructor = fn() -> Fields;

/// The concrete type of a record.
///
/// A class with a constructor can be re-instantiated by the selective cloner
/// when concrete types are preserved; without one, clones degrade to bare
/// records.
pub struct Class {
    name: String,
    construct: Option<Constructor>,
}

impl Class {
    /// A class that cannot be re-instantiated.
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Class {
            name: name.into(),
            construct: None,
        })
    }

    pub fn with_constructor(name: impl Into<String>, construct: Constructor) -> Arc<Self> {
        Arc::new(Class {
            name: name.into(),
            construct: Some(construct),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_constructor(&self) -> bool {
        self.construct.is_some()
    }

    /// Run the constructor, if any.
    pub fn construct(&self) -> Option<Fields> {
        self.construct.map(|f| f())
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name)
            .field("constructor", &self.construct.is_some())
            .finish()
    }
}

/// Keyed record, optionally an instance of a [`Class`].
#[derive(Clone, Debug, Default)]
pub struct Record {
    pub class: Option<Arc<Class>>,
    pub fields: Fields,
}

impl Record {
    pub fn new(fields: Fields) -> Self {
        Record {
            class: None,
            fields,
        }
    }

    pub fn class_name(&self) -> Option<&str> {
        self.class.as_deref().map(Class::name)
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.class_name() == other.class_name() && self.fields == other.fields
    }
}

/// Opaque timestamp in milliseconds since the Unix epoch.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Date {
    pub millis: i64,
}
