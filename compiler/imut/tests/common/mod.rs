//! Shared fixtures for the update tests.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use imut::{Class, Fields, UpdateOptions, Value};
use std::sync::Arc;

pub fn test_class_defaults() -> Fields {
    Fields::from([("text".to_string(), Value::from("Hello world!"))])
}

pub fn test_class() -> Arc<Class> {
    Class::with_constructor("TestClass", test_class_defaults)
}

pub fn instance(text: &str) -> Value {
    Value::instance(
        test_class(),
        Fields::from([("text".to_string(), Value::from(text))]),
    )
}

/// State with one node of every kind.
pub fn state() -> Value {
    Value::record_from([
        ("num", Value::from(1)),
        ("date", Value::date(1_551_484_800_000)),
        ("string", Value::from("test")),
        ("plainObj", Value::record_from([("text", Value::from("Hello world!"))])),
        ("classObj", instance("Hello world!")),
        (
            "record",
            Value::record_from([("foo", instance("foo")), ("bar", instance("bar"))]),
        ),
        (
            "map",
            Value::map_from([("foo", instance("foo")), ("bar", instance("bar"))]),
        ),
    ])
}

/// Value reached by following `keys` from `root`; map entries included.
pub fn at(root: &Value, keys: &[&str]) -> Value {
    keys.iter().fold(root.clone(), |node, key| {
        node.get(key)
            .unwrap_or_else(|| panic!("no `{key}` on the way to {keys:?}"))
    })
}

/// Record with no fields.
pub fn empty() -> Value {
    Value::record(Fields::new())
}

pub fn unfrozen() -> UpdateOptions {
    UpdateOptions::new().freeze_result(false)
}
