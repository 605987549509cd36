//! Property-based tests for namespace stacks.
//!
//! Generates random stacks of mappings and checks that:
//! 1. Lookup returns the value from the most recently pushed mapping that
//!    defines the key, and misses exactly when no mapping does.
//! 2. Pushing then popping a source leaves every lookup unchanged.
//! 3. `len` is the sum of the mapping sizes.
//! 4. Every stored value, callables included, reads back unchanged when
//!    lookup does not invoke.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::disallowed_types,
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use std::collections::BTreeMap;

use proptest::prelude::*;
use stencil_namespace::{NamespaceError, NamespaceStack, ScopeMap, Value};

// -- Strategies --

/// Keys from a small alphabet so layers overlap often.
fn key_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-e]").expect("valid regex")
}

fn layer_strategy() -> impl Strategy<Value = BTreeMap<String, i64>> {
    prop::collection::btree_map(key_strategy(), any::<i64>(), 0..4)
}

fn layers_strategy() -> impl Strategy<Value = Vec<BTreeMap<String, i64>>> {
    prop::collection::vec(layer_strategy(), 0..6)
}

fn build(layers: &[BTreeMap<String, i64>]) -> NamespaceStack {
    let mut ns = NamespaceStack::new();
    for layer in layers {
        let map: ScopeMap = layer.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        ns.push(map);
    }
    ns
}

/// Stored values of every kind. Floats stay finite so equality holds.
fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::None),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        (-1.0e9..1.0e9f64).prop_map(Value::Float),
        "[a-z ]{0,8}".prop_map(Value::from),
        any::<i64>().prop_map(|n| Value::function("answer", move || Ok(Value::Int(n)))),
    ]
}

/// Reference model: newest layer defining `key` wins.
fn expected(layers: &[BTreeMap<String, i64>], key: &str) -> Option<i64> {
    layers.iter().rev().find_map(|layer| layer.get(key).copied())
}

proptest! {
    #[test]
    fn lookup_matches_newest_definition(layers in layers_strategy(), key in key_strategy()) {
        let mut ns = build(&layers);
        match expected(&layers, &key) {
            Some(value) => prop_assert_eq!(ns.lookup(&key, true), Ok(Value::Int(value))),
            None => prop_assert_eq!(
                ns.lookup(&key, true),
                Err(NamespaceError::missing_key(key.as_str()))
            ),
        }
        prop_assert_eq!(ns.contains(&key), Ok(expected(&layers, &key).is_some()));
    }

    #[test]
    fn push_then_pop_is_invisible(
        layers in layers_strategy(),
        extra in layer_strategy(),
        key in key_strategy(),
    ) {
        let mut ns = build(&layers);
        let before = ns.fetch(&key);

        let map: ScopeMap = extra.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        ns.push(map);
        let popped = ns.pop(1).unwrap();

        prop_assert_eq!(popped.len(), 1);
        prop_assert_eq!(ns.depth(), layers.len());
        prop_assert_eq!(ns.fetch(&key), before);
    }

    #[test]
    fn len_sums_layer_sizes(layers in layers_strategy()) {
        let ns = build(&layers);
        let total: usize = layers.iter().map(|layer| layer.len()).sum();
        prop_assert_eq!(ns.len(), Ok(total));
        prop_assert_eq!(ns.keys().unwrap().len(), total);
    }

    #[test]
    fn uninvoked_lookup_returns_stored_values(
        entries in prop::collection::btree_map(key_strategy(), value_strategy(), 0..5),
    ) {
        let mut ns = NamespaceStack::new();
        let map: ScopeMap = entries.iter().map(|(k, v)| (k.as_str(), v.clone())).collect();
        ns.push(map);
        for (key, stored) in &entries {
            prop_assert_eq!(ns.lookup(key, false), Ok(stored.clone()));
            if let Value::Function(func) = stored {
                prop_assert_eq!(ns.lookup(key, true), func.call());
            }
        }
        prop_assert_eq!(ns.len(), Ok(entries.len()));
    }
}
