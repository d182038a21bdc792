//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::OnceLock;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use structhold::{Backend, Query, Record, Shape, ShapeBuilder, Shaped, Store, StoreConfig};

// =============================================================================
// Item fixtures
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemTest {
    pub key: i64,
    pub id: i64,
    pub name: String,
    pub category: String,
    pub created: DateTime<Utc>,
    pub tags: Vec<String>,
    pub color: String,
    pub fruit: String,
    pub update_field: String,
    pub update_index: String,
}

impl Shaped for ItemTest {
    fn shape() -> &'static Shape {
        static SHAPE: OnceLock<Shape> = OnceLock::new();
        SHAPE.get_or_init(|| {
            ShapeBuilder::<ItemTest>::new("ItemTest")
                .field("Key", |i| i.key.into())
                .field("ID", |i| i.id.into())
                .field("Name", |i| i.name.as_str().into())
                .field("Category", |i| i.category.as_str().into())
                .field("Created", |i| i.created.into())
                .field("Tags", |i| i.tags.clone().into())
                .field("Color", |i| i.color.as_str().into())
                .field("Fruit", |i| i.fruit.as_str().into())
                .field("UpdateField", |i| i.update_field.as_str().into())
                .field("UpdateIndex", |i| i.update_index.as_str().into())
                .index("Category", "Category")
                .index("UpdateIndex", "UpdateIndex")
                .build()
        })
    }
}

impl Record for ItemTest {}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

/// Seventeen items keyed by their position
pub fn item_data() -> Vec<ItemTest> {
    let rows: [(i64, &str, &str, &[&str], &str, &str); 17] = [
        (0, "car", "vehicle", &["red", "fast"], "red", ""),
        (1, "truck", "vehicle", &["big"], "blue", ""),
        (2, "seal", "animal", &["water", "mammal"], "grey", ""),
        (3, "van", "vehicle", &[], "white", ""),
        (8, "pizza", "food", &["hot"], "", ""),
        (5, "crow", "animal", &["bird", "flying"], "black", ""),
        (6, "van", "vehicle", &["big"], "blue", ""),
        (7, "pizza", "food", &["cold"], "", ""),
        (9, "dog", "animal", &["mammal"], "brown", ""),
        (5, "bear", "animal", &["mammal", "big"], "brown", ""),
        (10, "orange", "fruit", &["citrus"], "orange", "orange"),
        (11, "apple", "fruit", &["red"], "red", "apple"),
        (12, "boat", "vehicle", &["water"], "white", ""),
        (13, "ferret", "animal", &["mammal"], "white", ""),
        (14, "crow", "animal", &["bird"], "black", ""),
        (13, "apple", "food", &["baked"], "", "apple"),
        (16, "zebra", "animal", &["mammal", "striped"], "black", ""),
    ];

    rows.iter()
        .enumerate()
        .map(|(key, (id, name, category, tags, color, fruit))| ItemTest {
            key: key as i64,
            id: *id,
            name: name.to_string(),
            category: category.to_string(),
            created: base_time() + Duration::days(key as i64),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            color: color.to_string(),
            fruit: fruit.to_string(),
            update_field: String::new(),
            update_index: String::new(),
        })
        .collect()
}

pub fn item_store() -> Store {
    item_store_with(StoreConfig::default())
}

pub fn item_store_with(config: StoreConfig) -> Store {
    let store = Store::open(config);
    for item in item_data() {
        store.insert(item.key, &item).unwrap();
    }
    store
}

/// Keys of the items returned by `query`, in result order
pub fn find_keys<B: Backend>(store: &Store<B>, query: &Query) -> Vec<i64> {
    let mut result: Vec<ItemTest> = Vec::new();
    store.find(&mut result, query).unwrap();
    result.iter().map(|item| item.key).collect()
}

// =============================================================================
// Nested fixtures
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nest {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level2 {
    pub name: String,
    pub l3: Nest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nested {
    pub key: i64,
    pub embed: Embed,
    pub l1: Nest,
    pub l2: Level2,
    pub pointer: Option<Box<Nest>>,
}

impl Shaped for Nest {
    fn shape() -> &'static Shape {
        static SHAPE: OnceLock<Shape> = OnceLock::new();
        SHAPE.get_or_init(|| {
            ShapeBuilder::<Nest>::new("Nest")
                .field("Name", |n| n.name.as_str().into())
                .build()
        })
    }
}

impl Shaped for Embed {
    fn shape() -> &'static Shape {
        static SHAPE: OnceLock<Shape> = OnceLock::new();
        SHAPE.get_or_init(|| {
            ShapeBuilder::<Embed>::new("Embed")
                .field("Color", |e| e.color.as_str().into())
                .build()
        })
    }
}

impl Shaped for Level2 {
    fn shape() -> &'static Shape {
        static SHAPE: OnceLock<Shape> = OnceLock::new();
        SHAPE.get_or_init(|| {
            ShapeBuilder::<Level2>::new("Level2")
                .field("Name", |l| l.name.as_str().into())
                .nested::<Nest>("L3", |l| &l.l3)
                .build()
        })
    }
}

impl Shaped for Nested {
    fn shape() -> &'static Shape {
        static SHAPE: OnceLock<Shape> = OnceLock::new();
        SHAPE.get_or_init(|| {
            ShapeBuilder::<Nested>::new("Nested")
                .field("Key", |n| n.key.into())
                .embedded::<Embed>("Embed", |n| &n.embed)
                .nested::<Nest>("L1", |n| &n.l1)
                .nested::<Level2>("L2", |n| &n.l2)
                .pointer::<Nest>("Pointer", |n| n.pointer.as_deref())
                .index("L1", "L1.Name")
                .index("Pointer", "Pointer.Name")
                .build()
        })
    }
}

impl Record for Nested {}

fn nest(name: &str) -> Nest {
    Nest {
        name: name.to_string(),
    }
}

/// Five nested records keyed 0 to 4
pub fn nested_data() -> Vec<Nested> {
    let rows = [
        ("red", "Joe", "Joe", "Joe"),
        ("red", "Jill", "Jill", "Jill"),
        ("orange", "Jill", "Jill", "Jill"),
        ("orange", "Jill", "Jill", "Joe"),
        ("blue", "Abner", "Abner", "Abner"),
    ];

    rows.iter()
        .enumerate()
        .map(|(key, (color, l1, l2, l3))| Nested {
            key: key as i64,
            embed: Embed {
                color: color.to_string(),
            },
            l1: nest(l1),
            l2: Level2 {
                name: l2.to_string(),
                l3: nest(l3),
            },
            pointer: Some(Box::new(nest(l1))),
        })
        .collect()
}

pub fn nested_store() -> Store {
    nested_store_with(StoreConfig::default())
}

pub fn nested_store_with(config: StoreConfig) -> Store {
    let store = Store::open(config);
    for record in nested_data() {
        store.insert(record.key, &record).unwrap();
    }
    store
}

pub fn nested_keys(store: &Store, query: &Query) -> Vec<i64> {
    let mut result: Vec<Nested> = Vec::new();
    store.find(&mut result, query).unwrap();
    result.iter().map(|n| n.key).collect()
}
