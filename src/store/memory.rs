use aws_sdk_dynamodb::types::AttributeValue;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

use super::ItemStore;
use crate::condition::{ConditionSet, normalize_number};
use crate::error::Error;
use crate::keys::{Item, Key};

type Tables = HashMap<String, HashMap<String, Item>>;

/// [`ItemStore`] keeping items in process memory
///
/// Conditions are evaluated against the stored item the same way the
/// service does, which makes this store a stand-in for DynamoDB in tests
/// and local tooling. Numbers in keys and conditions compare by value.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items stored in `table`
    pub fn len(&self, table: &str) -> usize {
        self.tables().get(table).map_or(0, HashMap::len)
    }

    /// True when `table` holds no items
    pub fn is_empty(&self, table: &str) -> bool {
        self.len(table) == 0
    }

    /// Store `item` directly, bypassing conditions
    pub fn insert(&self, table: &str, key: &Key, item: Item) {
        let _ = self
            .tables()
            .entry(table.to_string())
            .or_default()
            .insert(fingerprint(key), item);
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        // A panicking writer leaves no half-written item behind, the map stays usable.
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Order-independent identity of a key, numbers by value
fn fingerprint(key: &Key) -> String {
    let mut parts: Vec<(&String, AttributeValue)> = key
        .iter()
        .map(|(name, value)| match value {
            AttributeValue::N(number) => (name, AttributeValue::N(normalize_number(number))),
            other => (name, other.clone()),
        })
        .collect();
    parts.sort_unstable_by(|a, b| a.0.cmp(b.0));
    format!("{parts:?}")
}

impl ItemStore for InMemoryStore {
    async fn conditional_put(
        &self,
        table: &str,
        key: &Key,
        item: Item,
        condition: Option<&ConditionSet>,
    ) -> Result<(), Error> {
        let mut tables = self.tables();
        let items = tables.entry(table.to_string()).or_default();
        let id = fingerprint(key);

        if let Some(condition) = condition {
            if !condition.evaluate(items.get(&id)) {
                debug!(table, "conditional check failed");
                return Err(Error::ConditionalCheckFailed {
                    table: table.to_string(),
                    key: key.clone(),
                });
            }
        }

        let _ = items.insert(id, item);
        Ok(())
    }

    async fn get_item(&self, table: &str, key: &Key) -> Result<Option<Item>, Error> {
        Ok(self
            .tables()
            .get(table)
            .and_then(|items| items.get(&fingerprint(key)))
            .cloned())
    }
}
