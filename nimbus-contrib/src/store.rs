//! Read-only backing data for the example resource.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde_json::{Map, Value, json};

/// One entry of the backing data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    pub id: &'static str,
    pub content: &'static str,
}

impl Record {
    pub fn to_json(&self) -> Value {
        json!({ "id": self.id, "content": self.content })
    }
}

static RECORDS: LazyLock<BTreeMap<&'static str, Record>> = LazyLock::new(|| {
    [
        Record {
            id: "1",
            content: "It is a ball",
        },
        Record {
            id: "2",
            content: "It is a square",
        },
        Record {
            id: "3",
            content: "It is a triangle",
        },
    ]
    .into_iter()
    .map(|record| (record.id, record))
    .collect()
});

/// Looks up a record by id.
pub fn get(id: &str) -> Option<&'static Record> {
    RECORDS.get(id)
}

/// Every record, ordered by id.
pub fn all() -> impl Iterator<Item = &'static Record> {
    RECORDS.values()
}

/// The whole store as a JSON object keyed by id.
pub fn snapshot() -> Value {
    let entries: Map<String, Value> = all()
        .map(|record| (record.id.to_string(), record.to_json()))
        .collect();
    Value::Object(entries)
}
