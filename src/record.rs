use serde::{Serialize, de::DeserializeOwned};
use std::future::Future;

use crate::condition::ConditionSet;
use crate::descriptor::RecordDescriptor;
use crate::error::Error;
use crate::keys::Key;
use crate::store::DynamoDbStore;
use crate::writer::{BatchSaveOutput, KeyAssigningWriter, Saved};

/// A record type stored in one table, with a static key layout
///
/// The provided methods save and load through the global DynamoDB client.
/// Use [`KeyAssigningWriter`] directly to target another store.
///
/// # Example
///
/// ```rust,no_run
/// use dynamo_autokey::{AttributeDescriptor, Error, Record, RecordDescriptor};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// struct Order {
///     customer_id: String,
///     #[serde(skip_serializing_if = "Option::is_none")]
///     order_id: Option<String>,
///     total: u64,
/// }
///
/// impl Record for Order {
///     const TABLE: &'static str = "orders";
///     const DESCRIPTOR: RecordDescriptor = RecordDescriptor::new(&[
///         AttributeDescriptor::hash_key("customer_id"),
///         AttributeDescriptor::range_key("order_id").auto_generated(),
///     ]);
/// }
///
/// async fn example() -> Result<(), Error> {
///     let order = Order {
///         customer_id: "c-1".to_string(),
///         order_id: None,
///         total: 1200,
///     };
///
///     let saved = order.save().await?;
///     let order_id = saved.record.order_id.clone();
///
///     let loaded = Order::load("c-1", order_id.as_deref()).await?;
///     assert!(loaded.is_some());
///     Ok(())
/// }
/// ```
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    /// Name of the table holding the records
    const TABLE: &'static str;

    /// Key attributes of the record
    const DESCRIPTOR: RecordDescriptor;

    /// Save the record, generating unset auto-generated keys
    ///
    /// Fails with [`Error::ConditionalCheckFailed`] rather than overwrite an
    /// existing item under a generated key.
    fn save(&self) -> impl Future<Output = Result<Saved<Self>, Error>> {
        save_record::<Self>(self, None)
    }

    /// Save the record with additional expected conditions
    ///
    /// AND-joined conditions are merged with the guard on generated keys.
    /// OR-joined conditions must name every generated key attribute and then
    /// replace the guard.
    fn save_with_conditions(
        &self,
        conditions: &ConditionSet,
    ) -> impl Future<Output = Result<Saved<Self>, Error>> {
        save_record::<Self>(self, Some(conditions))
    }

    /// Save several records, each independently
    fn batch_save(records: Vec<Self>) -> impl Future<Output = BatchSaveOutput<Self>> {
        batch_save_records::<Self>(records)
    }

    /// Load a record by its key values
    fn load(
        hash_key: &str,
        range_key: Option<&str>,
    ) -> impl Future<Output = Result<Option<Self>, Error>> {
        load_record::<Self>(hash_key, range_key)
    }

    /// Load a record by its full key, such as [`Saved::key`]
    fn load_key(key: &Key) -> impl Future<Output = Result<Option<Self>, Error>> {
        load_record_by_key::<Self>(key)
    }
}

/// Save a record through the global DynamoDB client
pub async fn save_record<T: Record>(
    record: &T,
    conditions: Option<&ConditionSet>,
) -> Result<Saved<T>, Error> {
    KeyAssigningWriter::new(DynamoDbStore::global().await)
        .save(record, conditions)
        .await
}

/// Save records through the global DynamoDB client
pub async fn batch_save_records<T: Record>(records: Vec<T>) -> BatchSaveOutput<T> {
    KeyAssigningWriter::new(DynamoDbStore::global().await)
        .batch_save(records)
        .await
}

/// Load a record through the global DynamoDB client
pub async fn load_record<T: Record>(
    hash_key: &str,
    range_key: Option<&str>,
) -> Result<Option<T>, Error> {
    KeyAssigningWriter::new(DynamoDbStore::global().await)
        .load(hash_key, range_key)
        .await
}

/// Load a record by its full key through the global DynamoDB client
pub async fn load_record_by_key<T: Record>(key: &Key) -> Result<Option<T>, Error> {
    KeyAssigningWriter::new(DynamoDbStore::global().await)
        .load_key(key)
        .await
}
