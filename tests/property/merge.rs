//! Deep merge properties

use jargal::context::merge_maps;
use jargal::Context;
use proptest::prelude::*;
use serde_json::{json, Map, Value};

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z]{0,6}".prop_map(Value::from),
        prop::collection::vec(any::<i32>().prop_map(Value::from), 0..3).prop_map(Value::Array),
    ]
}

fn object() -> impl Strategy<Value = Map<String, Value>> {
    let value = leaf().prop_recursive(3, 24, 4, |inner| {
        prop::collection::btree_map("[a-d]", inner, 0..4)
            .prop_map(|entries| Value::Object(entries.into_iter().collect()))
    });
    prop::collection::btree_map("[a-d]", value, 0..4).prop_map(|m| m.into_iter().collect())
}

/// Every leaf of `patch` is present in `merged` at the same position.
fn contains_patch(merged: &Map<String, Value>, patch: &Map<String, Value>) -> bool {
    patch.iter().all(|(key, value)| match (merged.get(key), value) {
        (Some(Value::Object(m)), Value::Object(p)) => contains_patch(m, p),
        (Some(existing), _) => existing == value,
        (None, _) => false,
    })
}

/// Every key of `base` is still present after merging.
fn keeps_keys(merged: &Map<String, Value>, base: &Map<String, Value>) -> bool {
    base.keys().all(|key| merged.contains_key(key))
}

#[test]
fn test_merge_applies_patch_and_keeps_keys() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(object(), object()), |(base, patch)| {
            let mut merged = base.clone();
            merge_maps(&mut merged, patch.clone());

            prop_assert!(contains_patch(&merged, &patch));
            prop_assert!(keeps_keys(&merged, &base));
            Ok(())
        })
        .unwrap();
}

#[test]
fn test_merge_is_idempotent() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(object(), object()), |(base, patch)| {
            let mut once = base.clone();
            merge_maps(&mut once, patch.clone());
            let mut twice = once.clone();
            merge_maps(&mut twice, patch);

            prop_assert_eq!(once, twice);
            Ok(())
        })
        .unwrap();
}

#[test]
fn test_nested_merge_example() {
    let mut ctx = Context::new();
    ctx.insert("a", json!({"x": 1, "y": 1}));

    let mut patch = Map::new();
    patch.insert("a".to_string(), json!({"x": 2}));
    ctx.merge(patch);

    assert_eq!(ctx.get("a"), Some(&json!({"x": 2, "y": 1})));
}
