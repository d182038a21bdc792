//! Sorted Find Tests
//!
//! Tests for the match window shared by find, update-matching and
//! delete-matching:
//! - Stable multi-key sort, duplicate sort fields ignored
//! - Reverse flips the whole sorted sequence
//! - Skip then limit, skip past the end is empty
//! - Sorting by the record key is a contract violation

mod common;

use std::collections::BTreeSet;

use common::{find_keys, item_data, item_store, ItemTest};
use structhold::{BoxError, Query, StoreErrorCode, KEY};

// =============================================================================
// Scenarios
// =============================================================================

struct SortCase {
    name: &'static str,
    query: Query,
    result: Vec<i64>,
}

fn animals() -> Query {
    Query::filter("Category").eq("animal").sort_by(["Name"])
}

fn sort_cases() -> Vec<SortCase> {
    vec![
        SortCase {
            name: "Sort By Name",
            query: animals(),
            result: vec![9, 5, 14, 8, 13, 2, 16],
        },
        SortCase {
            name: "Sort By Name Reversed",
            query: animals().reverse(),
            result: vec![16, 2, 13, 8, 14, 5, 9],
        },
        SortCase {
            name: "Sort By Multiple Fields",
            query: Query::filter("ID")
                .is_in([8, 3, 13])
                .sort_by(["Category", "Name"]),
            result: vec![13, 15, 4, 3],
        },
        SortCase {
            name: "Sort By Multiple Fields Reversed",
            query: Query::filter("ID")
                .is_in([8, 3, 13])
                .sort_by(["Category", "Name"])
                .reverse(),
            result: vec![3, 4, 15, 13],
        },
        SortCase {
            name: "Sort By Duplicate Field Names",
            query: Query::filter("ID")
                .is_in([8, 3, 13])
                .sort_by(["Category", "Name", "Category"]),
            result: vec![13, 15, 4, 3],
        },
        SortCase {
            name: "Sort By Name With Limit",
            query: animals().limit(3),
            result: vec![9, 5, 14],
        },
        SortCase {
            name: "Sort By Name With Skip",
            query: animals().skip(3),
            result: vec![8, 13, 2, 16],
        },
        SortCase {
            name: "Sort By Name With Skip And Limit",
            query: animals().skip(2).limit(3),
            result: vec![14, 8, 13],
        },
        SortCase {
            name: "Sort By Name Reversed With Skip And Limit",
            query: animals().reverse().skip(2).limit(3),
            result: vec![13, 8, 14],
        },
        SortCase {
            name: "Sort By Name With Skip",
            query: animals().skip(4),
            result: vec![13, 2, 16],
        },
        SortCase {
            name: "Sort By Name With Skip Past End",
            query: animals().skip(10),
            result: vec![],
        },
        SortCase {
            name: "Sort By Tags",
            query: Query::filter("Category").eq("fruit").sort_by(["Tags"]),
            result: vec![10, 11],
        },
    ]
}

// =============================================================================
// Find
// =============================================================================

#[test]
fn test_sorted_find() {
    let store = item_store();
    for case in sort_cases() {
        assert_eq!(find_keys(&store, &case.query), case.result, "{}", case.name);
    }
}

#[test]
fn test_sorted_find_full_records() {
    let store = item_store();
    let data = item_data();
    let mut result: Vec<ItemTest> = Vec::new();
    store.find(&mut result, &animals().limit(2)).unwrap();
    assert_eq!(result, vec![data[9].clone(), data[5].clone()]);
}

#[test]
fn test_reverse_is_exact_mirror() {
    let store = item_store();
    let mut forward = find_keys(&store, &animals());
    let backward = find_keys(&store, &animals().reverse());
    forward.reverse();
    assert_eq!(forward, backward);
}

#[test]
fn test_reverse_without_sort_reverses_key_order() {
    let store = item_store();
    let keys = find_keys(&store, &Query::filter("Category").eq("fruit").reverse());
    assert_eq!(keys, vec![11, 10]);
}

#[test]
fn test_none_query_returns_all_in_key_order() {
    let store = item_store();
    let mut result: Vec<ItemTest> = Vec::new();
    store.find(&mut result, None).unwrap();
    assert_eq!(result, item_data());
}

#[test]
fn test_find_one_and_count_share_window() {
    let store = item_store();
    let first: Option<ItemTest> = store.find_one(&animals().skip(1)).unwrap();
    assert_eq!(first.map(|item| item.key), Some(5));
    assert_eq!(store.count::<ItemTest>(&animals().skip(5)).unwrap(), 2);
    assert_eq!(store.count::<ItemTest>(&animals().skip(10)).unwrap(), 0);
}

#[test]
fn test_sort_by_unknown_field() {
    let store = item_store();
    let mut result: Vec<ItemTest> = Vec::new();
    let err = store
        .find(&mut result, &Query::all().sort_by(["Flavor"]))
        .unwrap_err();
    assert_eq!(err.code(), StoreErrorCode::HoldFieldNotFound);
    assert_eq!(err.field(), Some("Flavor"));
    assert!(result.is_empty());
}

#[test]
#[should_panic(expected = "cannot sort by the record key")]
fn test_find_sort_by_key_panics() {
    let store = item_store();
    let mut result: Vec<ItemTest> = Vec::new();
    let _ = store.find(&mut result, &Query::filter(KEY).gt(3).sort_by([KEY]));
}

#[test]
#[should_panic(expected = "cannot sort by the record key")]
fn test_sort_by_key_panics_even_on_empty_bucket() {
    let store = structhold::Store::in_memory();
    let mut result: Vec<ItemTest> = Vec::new();
    let _ = store.find(&mut result, &Query::all().sort_by(["Name"]).sort_by([KEY]));
}

// =============================================================================
// Update Matching
// =============================================================================

#[test]
fn test_update_matching_sorted_window() {
    for case in sort_cases() {
        let store = item_store();
        let updated = store
            .update_matching(&case.query, |item: &mut ItemTest| {
                item.update_field = "updated".to_string();
                item.update_index = "updated index".to_string();
                Ok::<(), BoxError>(())
            })
            .unwrap();
        assert_eq!(updated, case.result.len(), "{}", case.name);

        let by_field: BTreeSet<i64> =
            find_keys(&store, &Query::filter("UpdateField").eq("updated"))
                .into_iter()
                .collect();
        let by_index: BTreeSet<i64> =
            find_keys(&store, &Query::filter("UpdateIndex").eq("updated index"))
                .into_iter()
                .collect();
        let expected: BTreeSet<i64> = case.result.iter().copied().collect();
        assert_eq!(by_field, expected, "{}", case.name);
        assert_eq!(by_index, expected, "{}", case.name);
    }
}

#[test]
fn test_update_matching_limit_marks_first_three() {
    let store = item_store();
    store
        .update_matching(&animals().limit(3), |item: &mut ItemTest| {
            item.update_field = "updated".to_string();
            Ok::<(), BoxError>(())
        })
        .unwrap();

    let keys = find_keys(
        &store,
        &Query::filter("UpdateField").eq("updated").sort_by(["Name"]),
    );
    assert_eq!(keys, vec![9, 5, 14]);
}

#[test]
#[should_panic(expected = "cannot sort by the record key")]
fn test_update_matching_sort_by_key_panics() {
    let store = item_store();
    let _ = store.update_matching(&Query::all().sort_by([KEY]), |_: &mut ItemTest| {
        Ok::<(), BoxError>(())
    });
}

// =============================================================================
// Delete Matching
// =============================================================================

#[test]
fn test_delete_matching_sorted_window() {
    for case in sort_cases() {
        let store = item_store();
        let deleted = store.delete_matching::<ItemTest>(&case.query).unwrap();
        assert_eq!(deleted, case.result.len(), "{}", case.name);

        let remaining = find_keys(&store, &Query::all());
        assert_eq!(
            remaining.len(),
            item_data().len() - case.result.len(),
            "{}",
            case.name
        );
        for key in &case.result {
            assert!(!remaining.contains(key), "{}: {} not deleted", case.name, key);
        }
    }
}

#[test]
fn test_delete_matching_clears_index() {
    let store = item_store();
    store.delete_matching::<ItemTest>(&animals().limit(2)).unwrap();
    assert_eq!(
        find_keys(&store, &Query::filter("Category").eq("animal")),
        vec![2, 8, 13, 14, 16]
    );
}

#[test]
#[should_panic(expected = "cannot sort by the record key")]
fn test_delete_matching_sort_by_key_panics() {
    let store = item_store();
    let _ = store.delete_matching::<ItemTest>(&Query::all().sort_by([KEY]));
}
