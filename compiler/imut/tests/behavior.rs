// Test code uses unwrap for clarity - panics provide good test failure messages
#![allow(clippy::unwrap_used)]

//! Update behavior on a state with one node of every kind.

mod common;

use common::{at, empty, state, unfrozen};
use imut::{
    update, AnalysisError, ArgumentShapeError, Update, UpdateError, UpdateOptions, Value,
};
use pretty_assertions::assert_eq;

const ALL_KEYS: [&str; 7] = [
    "num", "date", "string", "plainObj", "classObj", "record", "map",
];

fn assert_shared_except(out: &Value, original: &Value, changed: &[&str]) {
    for &key in ALL_KEYS.iter().filter(|key| !changed.contains(*key)) {
        assert!(
            at(out, &[key]).same(&at(original, &[key])),
            "`{key}` should be shared"
        );
    }
}

#[test]
fn unrelated_properties_are_shared() {
    let original = state();
    let out = update(&original, "s => { s.num = 2 }", None, None).unwrap();
    assert_eq!(at(&out, &["num"]), Value::from(2));
    assert_shared_except(&out, &original, &["num"]);
}

#[test]
fn multiple_assignments() {
    let original = state();
    let out = update(
        &original,
        "state => {
            state.num = 2;
            state.string = 'changed';
            state.plainObj.text = 'plain';
            state.record.foo.text = 'record';
        }",
        None,
        None,
    )
    .unwrap();
    assert_eq!(at(&out, &["num"]), Value::from(2));
    assert_eq!(at(&out, &["string"]), Value::from("changed"));
    assert_eq!(at(&out, &["plainObj", "text"]), Value::from("plain"));
    assert_eq!(at(&out, &["record", "foo", "text"]), Value::from("record"));
    assert!(at(&out, &["record", "bar"]).same(&at(&original, &["record", "bar"])));
    assert_shared_except(&out, &original, &["num", "string", "plainObj", "record"]);
}

#[test]
fn class_instances_keep_their_class() {
    let original = state();
    let out = update(&original, "s => { s.classObj.text = 'changed' }", None, None).unwrap();
    let obj = at(&out, &["classObj"]);
    assert_eq!(obj.as_record().unwrap().class_name(), Some("TestClass"));
    assert_eq!(at(&obj, &["text"]), Value::from("changed"));
    assert_eq!(at(&original, &["classObj", "text"]), Value::from("Hello world!"));
}

#[test]
fn class_instances_become_records_without_preservation() {
    let original = state();
    let out = update(
        &original,
        "s => { s.classObj.text = 'changed' }",
        None,
        Some(&UpdateOptions::new().preserve_concrete_type(false)),
    )
    .unwrap();
    let obj = at(&out, &["classObj"]);
    assert_eq!(obj.as_record().unwrap().class_name(), None);
    assert_eq!(at(&obj, &["text"]), Value::from("changed"));
    // Only copied nodes lose their class.
    assert_eq!(
        at(&out, &["record", "foo"]).as_record().unwrap().class_name(),
        Some("TestClass")
    );
}

#[test]
fn record_argument_fields_as_keys() {
    let original = state();
    let args = Value::record_from([("key", Value::from("bar")), ("text", Value::from("new"))]);
    let out = update(
        &original,
        "(s, args) => { s.record[args.key].text = args.text }",
        Some(&args),
        None,
    )
    .unwrap();
    assert_eq!(at(&out, &["record", "bar", "text"]), Value::from("new"));
    assert!(at(&out, &["record", "foo"]).same(&at(&original, &["record", "foo"])));
    assert_shared_except(&out, &original, &["record"]);
}

#[test]
fn scalar_argument_as_key() {
    let original = state();
    let out = update(
        &original,
        "(s, key) => { s.record[key].text = 'by value'; s.map.get(key).text = 'in map' }",
        Some(&Value::from("foo")),
        None,
    )
    .unwrap();
    assert_eq!(at(&out, &["record", "foo", "text"]), Value::from("by value"));
    assert_eq!(at(&out, &["map", "foo", "text"]), Value::from("in map"));
    assert!(at(&out, &["map", "bar"]).same(&at(&original, &["map", "bar"])));
}

#[test]
fn bracketed_argument_fields() {
    let original = state();
    let args = Value::record_from([("which", Value::from("foo"))]);
    let out = update(
        &original,
        "(s, a) => { s.record[a['which']].text = 'bracketed' }",
        Some(&args),
        None,
    )
    .unwrap();
    assert_eq!(at(&out, &["record", "foo", "text"]), Value::from("bracketed"));
}

#[test]
fn argument_shape_mismatches() {
    let original = state();
    let err = update(
        &original,
        "(s, a) => { s.record[a.key].text = 'x' }",
        Some(&Value::from("foo")),
        None,
    )
    .unwrap_err();
    assert_eq!(
        err,
        UpdateError::ArgumentShape(ArgumentShapeError::ExpectedRecord {
            field: "key".to_string(),
            found: "string",
        })
    );

    let err = update(
        &original,
        "(s, key) => { s.record[key].text = 'x' }",
        Some(&empty()),
        None,
    )
    .unwrap_err();
    assert_eq!(
        err,
        UpdateError::ArgumentShape(ArgumentShapeError::ExpectedKey { found: "record" })
    );
}

#[test]
fn captured_variables_on_the_right() {
    let original = state();
    let out = Update::new("s => { s.plainObj.text = text }")
        .capture("text", Value::from("captured"))
        .apply(&original)
        .unwrap();
    assert_eq!(at(&out, &["plainObj", "text"]), Value::from("captured"));
}

#[test]
fn captured_variables_cannot_be_keys() {
    let original = state();
    let err = Update::new("s => { s.record[key].text = 'x' }")
        .capture("key", Value::from("foo"))
        .apply(&original)
        .unwrap_err();
    assert!(
        matches!(err, UpdateError::Analysis(AnalysisError::UnanalyzableKey { ref key, .. }) if key == "key"),
        "{err:?}"
    );
}

#[test]
fn map_set_new_and_existing() {
    let original = state();
    let out = update(
        &original,
        "(s, a) => { s.map.set(a.key, a.value) }",
        Some(&Value::record_from([
            ("key", Value::from("baz")),
            ("value", Value::from("added")),
        ])),
        Some(&unfrozen()),
    )
    .unwrap();
    let map = at(&out, &["map"]);
    let keys: Vec<&String> = map.as_map().unwrap().keys().collect();
    assert_eq!(keys, vec!["foo", "bar", "baz"]);
    assert_eq!(at(&map, &["baz"]), Value::from("added"));
    assert!(at(&map, &["foo"]).same(&at(&original, &["map", "foo"])));
    assert!(at(&map, &["bar"]).same(&at(&original, &["map", "bar"])));

    let out = update(&original, "s => { s.map.set('foo', 1) }", None, None).unwrap();
    assert_eq!(at(&out, &["map", "foo"]), Value::from(1));
    assert!(at(&out, &["map", "bar"]).same(&at(&original, &["map", "bar"])));
}

#[test]
fn map_entry_modified_through_get() {
    let original = state();
    let out = update(&original, "s => { s.map.get('bar').text = 'modified' }", None, None).unwrap();
    assert_eq!(at(&out, &["map", "bar", "text"]), Value::from("modified"));
    assert_eq!(
        at(&out, &["map", "bar"]).as_record().unwrap().class_name(),
        Some("TestClass")
    );
    assert!(at(&out, &["map", "foo"]).same(&at(&original, &["map", "foo"])));
    assert_eq!(at(&original, &["map", "bar", "text"]), Value::from("bar"));
}

#[test]
fn map_delete() {
    let original = state();
    let out = update(&original, "(s, k) => { s.map.delete(k) }", Some(&Value::from("foo")), None)
        .unwrap();
    let map = at(&out, &["map"]);
    assert_eq!(map.get("foo"), None);
    assert!(at(&map, &["bar"]).same(&at(&original, &["map", "bar"])));
    assert!(at(&original, &["map"]).get("foo").is_some());
}

#[test]
fn deleted_entries_are_gone_before_the_procedure_runs() {
    let original = Value::record_from([("m", Value::map_from([("k", Value::from(7))]))]);
    let out = update(
        &original,
        "s => { s.old = s.m.get('k'); s.removed = s.m.delete('k') }",
        None,
        None,
    )
    .unwrap();
    assert_eq!(at(&out, &["old"]), Value::Undefined);
    assert_eq!(at(&out, &["removed"]), Value::Bool(false));
    assert_eq!(at(&out, &["m"]).get("k"), None);
    assert_eq!(at(&original, &["m", "k"]), Value::from(7));
}

#[test]
fn dates_have_no_writable_fields() {
    let original = state();
    let out = update(&original, "s => { s.date.label = 'x' }", None, Some(&unfrozen()));
    // Dates have no fields to write.
    assert!(matches!(out, Err(UpdateError::Eval(_))));

    let out = update(&original, "s => { s.date = 0 }", None, None).unwrap();
    assert_eq!(at(&out, &["date"]), Value::from(0));
    assert_eq!(at(&original, &["date"]), Value::date(1_551_484_800_000));
}
