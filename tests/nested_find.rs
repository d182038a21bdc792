//! Nested Field Tests
//!
//! Tests for field paths through nested, embedded and pointer fields:
//! - Qualified paths descend by exact name
//! - Embedded fields are reachable unqualified and qualified
//! - Pointers resolve like values; a nil pointer mid-path is an error

mod common;

use std::collections::BTreeSet;

use common::{nested_data, nested_keys, nested_store, Nest, Nested};
use structhold::{BoxError, Query, Store, StoreErrorCode};

// =============================================================================
// Scenarios
// =============================================================================

struct NestedCase {
    name: &'static str,
    query: Query,
    result: Vec<i64>,
}

fn nested_cases() -> Vec<NestedCase> {
    vec![
        NestedCase {
            name: "Nested",
            query: Query::filter("L1.Name").eq("Joe"),
            result: vec![0],
        },
        NestedCase {
            name: "Embedded",
            query: Query::filter("Color").eq("red"),
            result: vec![0, 1],
        },
        NestedCase {
            name: "Embedded Explicit",
            query: Query::filter("Embed.Color").eq("red"),
            result: vec![0, 1],
        },
        NestedCase {
            name: "Nested Multiple Levels",
            query: Query::filter("L2.L3.Name").eq("Joe"),
            result: vec![0, 3],
        },
        NestedCase {
            name: "Pointer",
            query: Query::filter("Pointer.Name").eq("Jill"),
            result: vec![1, 2, 3],
        },
        NestedCase {
            name: "Sort",
            query: Query::filter("Key").ge(0).sort_by(["L2.L3.Name"]),
            result: vec![4, 1, 2, 0, 3],
        },
        NestedCase {
            name: "Sort On Pointer",
            query: Query::filter("Key").ge(0).sort_by(["Pointer.Name"]),
            result: vec![4, 1, 2, 3, 0],
        },
        NestedCase {
            name: "Sort On Embedded",
            query: Query::all().sort_by(["Color"]).skip(1).limit(2),
            result: vec![2, 3],
        },
    ]
}

fn as_set(keys: &[i64]) -> BTreeSet<i64> {
    keys.iter().copied().collect()
}

// =============================================================================
// Find
// =============================================================================

#[test]
fn test_nested() {
    let store = nested_store();
    for case in nested_cases() {
        assert_eq!(nested_keys(&store, &case.query), case.result, "{}", case.name);
    }
}

#[test]
fn test_promoted_and_qualified_agree() {
    let store = nested_store();
    for color in ["red", "orange", "blue", "green"] {
        assert_eq!(
            nested_keys(&store, &Query::filter("Color").eq(color)),
            nested_keys(&store, &Query::filter("Embed.Color").eq(color)),
            "{}",
            color
        );
    }
}

#[test]
fn test_pointer_matches_value_field() {
    let store = nested_store();
    for name in ["Joe", "Jill", "Abner"] {
        assert_eq!(
            nested_keys(&store, &Query::filter("Pointer.Name").eq(name)),
            nested_keys(&store, &Query::filter("L1.Name").eq(name)),
            "{}",
            name
        );
    }
}

#[test]
fn test_path_ending_on_composite() {
    let store = nested_store();
    let mut result: Vec<Nested> = Vec::new();
    let err = store
        .find(&mut result, &Query::filter("L2").eq("Joe"))
        .unwrap_err();
    assert_eq!(err.code(), StoreErrorCode::HoldFieldNotFound);
}

#[test]
fn test_unknown_segment() {
    let store = nested_store();
    let mut result: Vec<Nested> = Vec::new();
    let err = store
        .find(&mut result, &Query::filter("L2.L4.Name").eq("Joe"))
        .unwrap_err();
    assert_eq!(err.code(), StoreErrorCode::HoldFieldNotFound);
    assert_eq!(err.field(), Some("L2.L4.Name"));
}

#[test]
fn test_promotion_only_for_single_segment() {
    let store = nested_store();
    let mut result: Vec<Nested> = Vec::new();
    // "Color" is promoted, but a qualified path must name "Embed"
    let err = store
        .find(&mut result, &Query::filter("L1.Color").eq("red"))
        .unwrap_err();
    assert_eq!(err.code(), StoreErrorCode::HoldFieldNotFound);
}

#[test]
fn test_nil_pointer_mid_path() {
    let store = nested_store();
    let mut orphan = nested_data()[0].clone();
    orphan.key = 5;
    orphan.pointer = None;
    store.insert(5, &orphan).unwrap();

    let mut result: Vec<Nested> = Vec::new();
    let err = store
        .find(&mut result, &Query::filter("Pointer.Name").eq("Joe"))
        .unwrap_err();
    assert_eq!(err.code(), StoreErrorCode::HoldFieldNotFound);

    // The pointer itself resolves to nil
    let keys = nested_keys(&store, &Query::filter("Pointer").is_nil());
    assert_eq!(keys, vec![5]);
    let keys = nested_keys(&store, &Query::filter("Pointer").not().is_nil());
    assert_eq!(keys, vec![0, 1, 2, 3, 4]);
}

// =============================================================================
// Update Matching
// =============================================================================

#[test]
fn test_nested_update_matching() {
    for case in nested_cases() {
        let store = nested_store();
        let updated = store
            .update_matching(&case.query, |record: &mut Nested| {
                record.l1.name = "Updated".to_string();
                Ok::<(), BoxError>(())
            })
            .unwrap();
        assert_eq!(updated, case.result.len(), "{}", case.name);

        let keys = nested_keys(&store, &Query::filter("L1.Name").eq("Updated"));
        assert_eq!(as_set(&keys), as_set(&case.result), "{}", case.name);
    }
}

#[test]
fn test_update_through_pointer() {
    let store = nested_store();
    store
        .update_matching(&Query::filter("Pointer.Name").eq("Abner"), |record: &mut Nested| {
            record.pointer = Some(Box::new(Nest {
                name: "Zed".to_string(),
            }));
            Ok::<(), BoxError>(())
        })
        .unwrap();

    let updated: Option<Nested> = store.get(4).unwrap();
    assert_eq!(updated.and_then(|n| n.pointer).map(|p| p.name), Some("Zed".to_string()));
}

// =============================================================================
// Delete Matching
// =============================================================================

#[test]
fn test_nested_delete_matching() {
    for case in nested_cases() {
        let store = nested_store();
        let deleted = store.delete_matching::<Nested>(&case.query).unwrap();
        assert_eq!(deleted, case.result.len(), "{}", case.name);

        let remaining = nested_keys(&store, &Query::all());
        assert_eq!(remaining.len(), nested_data().len() - case.result.len());
        for key in &case.result {
            assert!(!remaining.contains(key), "{}: {} not deleted", case.name, key);
        }
    }
}

#[test]
fn test_empty_bucket() {
    let store = Store::in_memory();
    assert!(nested_keys(&store, &Query::filter("L2.L3.Name").eq("Joe")).is_empty());
}
