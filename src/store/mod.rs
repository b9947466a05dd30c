//! Storage collaborators the writer puts items into.

mod dynamodb;
mod memory;

pub use dynamodb::DynamoDbStore;
pub use memory::InMemoryStore;

use std::future::Future;

use crate::condition::ConditionSet;
use crate::error::Error;
use crate::keys::{Item, Key};

/// A table-oriented item store supporting conditional puts
///
/// A put whose condition does not hold against the currently stored item
/// must fail with [`Error::ConditionalCheckFailed`] carrying `key`. Any other
/// failure is returned as the store's own error, unchanged.
pub trait ItemStore: Send + Sync {
    /// Write `item` under `key` if `condition` holds (always, when `None`)
    fn conditional_put(
        &self,
        table: &str,
        key: &Key,
        item: Item,
        condition: Option<&ConditionSet>,
    ) -> impl Future<Output = Result<(), Error>> + Send;

    /// Read the item stored under `key`
    fn get_item(
        &self,
        table: &str,
        key: &Key,
    ) -> impl Future<Output = Result<Option<Item>, Error>> + Send;
}
