#![allow(clippy::unwrap_used, reason = "tests unwrap known-present children")]

use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn path(keys: &[&str]) -> ResolvedPath {
    ResolvedPath::new(keys.iter().copied(), Effect::Assign)
}

fn child(value: &Value, keys: &[&str]) -> Value {
    keys.iter()
        .fold(value.clone(), |node, key| node.get(key).unwrap())
}

fn state() -> Value {
    Value::record_from([
        ("num", Value::from(1)),
        ("date", Value::date(1_551_484_800_000)),
        ("plain", Value::record_from([("text", Value::from("hello"))])),
        (
            "nested",
            Value::record_from([(
                "inner",
                Value::record_from([("leaf", Value::from(0)), ("other", Value::list(vec![]))]),
            )]),
        ),
        (
            "list",
            Value::list(vec![
                Value::record_from([("v", Value::from(0))]),
                Value::record_from([("v", Value::from(1))]),
            ]),
        ),
        (
            "map",
            Value::map_from([
                ("foo", Value::record_from([("text", Value::from("foo"))])),
                ("bar", Value::record_from([("text", Value::from("bar"))])),
            ]),
        ),
    ])
}

#[test]
fn copies_only_nodes_on_the_path() {
    let original = state();
    let cloned = SelectiveCloner::new().clone_root(&original, &[path(&["nested", "inner", "leaf"])]);
    assert!(cloned.warnings.is_empty());
    let root = cloned.root;

    assert!(!root.same(&original));
    assert!(!child(&root, &["nested"]).same(&child(&original, &["nested"])));
    assert!(!child(&root, &["nested", "inner"]).same(&child(&original, &["nested", "inner"])));
    for shared in [&["num"][..], &["date"], &["plain"], &["list"], &["map"], &["nested", "inner", "other"]] {
        assert!(child(&root, shared).same(&child(&original, shared)), "{shared:?}");
    }
    assert_eq!(root, original);
}

#[test]
fn terminal_targets_stay_shared() {
    let original = state();
    let root = SelectiveCloner::new()
        .clone_root(&original, &[path(&["plain"])])
        .root;
    assert!(!root.same(&original));
    assert!(child(&root, &["plain"]).same(&child(&original, &["plain"])));
}

#[test]
fn copied_nodes_are_uniquely_held() {
    let original = state();
    let mut root = SelectiveCloner::new()
        .clone_root(&original, &[path(&["nested", "inner", "leaf"])])
        .root;
    root.child_mut("nested")
        .unwrap()
        .child_mut("inner")
        .unwrap()
        .set_key("leaf", Value::from(9))
        .unwrap();
    assert_eq!(child(&root, &["nested", "inner", "leaf"]), Value::from(9));
    assert_eq!(child(&original, &["nested", "inner", "leaf"]), Value::from(0));
}

#[test]
fn list_elements_by_index() {
    let original = state();
    let root = SelectiveCloner::new()
        .clone_root(&original, &[path(&["list", "1", "v"])])
        .root;
    assert!(!child(&root, &["list"]).same(&child(&original, &["list"])));
    assert!(child(&root, &["list", "0"]).same(&child(&original, &["list", "0"])));
    assert!(!child(&root, &["list", "1"]).same(&child(&original, &["list", "1"])));
}

#[test]
fn dates_on_a_path_are_fresh() {
    let original = state();
    let root = SelectiveCloner::new()
        .clone_root(&original, &[path(&["date", "x"])])
        .root;
    let date = child(&root, &["date"]);
    assert!(!date.same(&child(&original, &["date"])));
    assert_eq!(date, child(&original, &["date"]));
}

#[test]
fn map_entries() {
    let original = state();
    let paths = [
        path(&["map", "bar", "text"]),
        ResolvedPath::new(["map", "new"], Effect::MapSet),
    ];
    let root = SelectiveCloner::new().clone_root(&original, &paths).root;
    let map = child(&root, &["map"]);
    assert!(!map.same(&child(&original, &["map"])));
    assert!(child(&map, &["foo"]).same(&child(&original, &["map", "foo"])));
    assert!(!child(&map, &["bar"]).same(&child(&original, &["map", "bar"])));
    assert_eq!(map.as_map().unwrap().len(), 2);
}

#[test]
fn terminal_deletes_remove_the_key() {
    let original = state();
    let root = SelectiveCloner::new()
        .clone_root(&original, &[ResolvedPath::new(["map", "bar"], Effect::MapDelete)])
        .root;
    let map = child(&root, &["map"]);
    assert_eq!(map.get("bar"), None);
    assert!(child(&map, &["foo"]).same(&child(&original, &["map", "foo"])));
    assert!(original.get("map").unwrap().get("bar").is_some());
}

#[test]
fn delete_with_a_deeper_write_keeps_the_key() {
    let original = state();
    let paths = [
        ResolvedPath::new(["map", "bar"], Effect::MapDelete),
        path(&["map", "bar", "text"]),
    ];
    let root = SelectiveCloner::new().clone_root(&original, &paths).root;
    let bar = child(&root, &["map", "bar"]);
    assert!(!bar.same(&child(&original, &["map", "bar"])));
}

#[test]
fn class_preservation() {
    fn defaults() -> Fields {
        Fields::from([
            ("id".to_string(), Value::Undefined),
            ("text".to_string(), Value::from("Hello world!")),
        ])
    }
    let class = Class::with_constructor("TestClass", defaults);
    let original = Value::record_from([(
        "obj",
        Value::instance(class, Fields::from([("text".to_string(), Value::from("custom"))])),
    )]);

    let kept = SelectiveCloner::new()
        .clone_root(&original, &[path(&["obj", "text"])])
        .root;
    let obj = child(&kept, &["obj"]);
    assert_eq!(obj.as_record().unwrap().class_name(), Some("TestClass"));
    // Constructor defaults first, then the original fields over them.
    let keys: Vec<&String> = obj.as_record().unwrap().fields.keys().collect();
    assert_eq!(keys, vec!["id", "text"]);
    assert_eq!(obj.get("text"), Some(Value::from("custom")));

    let plain = SelectiveCloner::new()
        .preserve_concrete_type(false)
        .clone_root(&original, &[path(&["obj", "text"])])
        .root;
    let obj = child(&plain, &["obj"]);
    assert_eq!(obj.as_record().unwrap().class_name(), None);
    assert_eq!(obj.as_record().unwrap().fields.len(), 1);
}

#[test]
fn mismatched_paths_warn() {
    let original = state();
    let paths = [
        path(&["num", "x"]),
        path(&["missing", "x"]),
        path(&["list", "7", "v"]),
    ];
    let cloned = SelectiveCloner::new().clone_root(&original, &paths);
    assert_eq!(
        cloned.warnings,
        vec![
            StructuralCloneWarning::PastScalar {
                path: "num".to_string(),
                type_name: "number"
            },
            StructuralCloneWarning::AbsentKey {
                path: "missing".to_string(),
                key: "missing".to_string()
            },
            StructuralCloneWarning::AbsentKey {
                path: "list.7".to_string(),
                key: "7".to_string()
            },
        ]
    );
    assert_eq!(cloned.root, original);
}

#[test]
fn frozen_originals_yield_writable_copies() {
    let original = state();
    original.deep_freeze();
    let mut root = SelectiveCloner::new()
        .clone_root(&original, &[path(&["plain", "text"])])
        .root;
    assert!(!root.is_frozen());
    root.child_mut("plain")
        .unwrap()
        .set_key("text", Value::from("changed"))
        .unwrap();
    assert!(original.is_deep_frozen());
}

#[test]
fn no_paths_share_the_root() {
    let original = state();
    let cloned = SelectiveCloner::new().clone_root(&original, &[]);
    assert!(cloned.root.same(&original));
}

fn arb_tree() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        (-10i32..10).prop_map(Value::from),
        "[a-z]{0,3}".prop_map(Value::from),
    ];
    leaf.prop_recursive(4, 48, 4, |inner| {
        prop::collection::vec(("[a-c]", inner), 1..4)
            .prop_map(|fields| Value::record_from(fields))
    })
}

/// Every key sequence that reaches a node of `value`.
fn all_paths(value: &Value, prefix: &mut Vec<String>, out: &mut Vec<Vec<String>>) {
    if let Some(record) = value.as_record() {
        for (key, child) in &record.fields {
            prefix.push(key.clone());
            out.push(prefix.clone());
            all_paths(child, prefix, out);
            prefix.pop();
        }
    }
}

/// Whether `target` lies on (or below) the path `keys`.
fn on_path(keys: &[String], target: &[String]) -> bool {
    target.len() < keys.len() && keys.starts_with(target)
}

proptest! {
    #[test]
    fn only_path_prefixes_are_copied(tree in arb_tree(), picks in prop::collection::vec(any::<prop::sample::Index>(), 1..3)) {
        let mut candidates = Vec::new();
        all_paths(&tree, &mut Vec::new(), &mut candidates);
        prop_assume!(!candidates.is_empty());
        let chosen: Vec<Vec<String>> = picks.iter().map(|i| i.get(&candidates).clone()).collect();
        let paths: Vec<ResolvedPath> = chosen
            .iter()
            .map(|keys| ResolvedPath::new(keys.iter().cloned(), Effect::Assign))
            .collect();

        let cloned = SelectiveCloner::new().clone_root(&tree, &paths);
        prop_assert!(cloned.warnings.is_empty());
        prop_assert_eq!(&cloned.root, &tree);
        prop_assert!(!cloned.root.same(&tree));

        for node in &candidates {
            let refs: Vec<&str> = node.iter().map(String::as_str).collect();
            let before = child(&tree, &refs);
            let after = child(&cloned.root, &refs);
            let copied = chosen.iter().any(|keys| on_path(keys, node));
            if !before.is_container() {
                continue;
            }
            prop_assert_eq!(!after.same(&before), copied, "{:?}", node);
        }
    }
}
