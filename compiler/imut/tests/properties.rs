// Test code uses unwrap for clarity - panics provide good test failure messages
#![allow(clippy::unwrap_used)]

//! Sharing and non-mutation over generated states, and concurrent use.

mod common;

use common::at;
use imut::{update, PathCache, Update, Value};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rayon::prelude::*;

fn arb_state() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        (-100i32..100).prop_map(Value::from),
        "[a-z ]{0,6}".prop_map(Value::from),
        Just(Value::Null),
    ];
    let tree = leaf.prop_recursive(4, 64, 4, |inner| {
        prop::collection::vec(("[a-d]", inner), 1..4).prop_map(|fields| Value::record_from(fields))
    });
    prop::collection::vec(("[a-d]", tree), 1..4).prop_map(|fields| Value::record_from(fields))
}

/// Every key sequence that reaches a node of `value`.
fn key_paths(value: &Value, prefix: &mut Vec<String>, out: &mut Vec<Vec<String>>) {
    if let Some(record) = value.as_record() {
        for (key, child) in &record.fields {
            prefix.push(key.clone());
            out.push(prefix.clone());
            key_paths(child, prefix, out);
            prefix.pop();
        }
    }
}

fn procedure_for(target: &[String]) -> String {
    let place: String = target.iter().map(|key| format!("['{key}']")).collect();
    format!("s => {{ s{place} = 99 }}")
}

proptest! {
    #[test]
    fn untouched_subtrees_are_shared(
        state in arb_state(),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut candidates = Vec::new();
        key_paths(&state, &mut Vec::new(), &mut candidates);
        prop_assume!(!candidates.is_empty());
        let target = pick.get(&candidates).clone();
        let before = state.to_string();

        let out = update(&state, &procedure_for(&target), None, None).unwrap();

        prop_assert_eq!(state.to_string(), before);
        prop_assert!(!out.same(&state));
        let target_refs: Vec<&str> = target.iter().map(String::as_str).collect();
        prop_assert_eq!(at(&out, &target_refs), Value::from(99));

        for node in &candidates {
            if node.starts_with(&target) {
                continue;
            }
            let refs: Vec<&str> = node.iter().map(String::as_str).collect();
            let on_path = target.starts_with(node);
            let shared = at(&out, &refs).same(&at(&state, &refs));
            if on_path {
                prop_assert!(!shared, "{:?} is on the write path", node);
            } else {
                prop_assert!(shared, "{:?} should be shared", node);
            }
        }
    }

    #[test]
    fn repeated_compiles_return_equal_paths(depth in 1usize..6) {
        let cache = PathCache::new();
        let target: Vec<String> = (0..depth).map(|i| format!("k{i}")).collect();
        let source = procedure_for(&target);
        let first = cache.extract_paths(&source).unwrap();
        let second = cache.extract_paths(&source).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(cache.stats().compilations, 1);
        prop_assert_eq!(first[0].segments.len(), depth);
    }
}

#[test]
fn concurrent_first_compiles_share_one_entry() {
    let cache = PathCache::new();
    let root = Value::record_from([("n", Value::from(0))]);
    let source = "(s, n) => { s.n = n }";

    let results: Vec<Value> = (0..64)
        .into_par_iter()
        .map(|i| {
            Update::new(source)
                .args(Value::from(i))
                .cache(&cache)
                .apply(&root)
                .unwrap()
        })
        .collect();

    for (i, out) in (0..).zip(&results) {
        assert_eq!(at(out, &["n"]), Value::from(i));
    }
    let stats = cache.stats();
    assert_eq!(stats.entries, 1);
    assert_eq!(stats.compilations, 1);
    assert_eq!(stats.hits, 63);
    assert_eq!(at(&root, &["n"]), Value::from(0));
}

#[test]
fn one_state_updated_from_many_threads() {
    let root = Value::record_from([
        ("counters", Value::map_from((0..16).map(|i| (format!("c{i}"), Value::from(0))))),
        ("config", Value::record_from([("name", Value::from("shared"))])),
    ]);
    let outs: Vec<Value> = (0..16)
        .into_par_iter()
        .map(|i| {
            let key = Value::from(format!("c{i}"));
            update(&root, "(s, k) => { s.counters.set(k, 1) }", Some(&key), None).unwrap()
        })
        .collect();
    for (i, out) in outs.iter().enumerate() {
        assert_eq!(at(out, &["counters", &format!("c{i}")]), Value::from(1));
        assert!(at(out, &["config"]).same(&at(&root, &["config"])));
    }
    assert!(root
        .get("counters")
        .unwrap()
        .as_map()
        .unwrap()
        .values()
        .all(|v| *v == Value::from(0)));
}
