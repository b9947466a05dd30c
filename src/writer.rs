//! The key-assigning writer.
//!
//! A save runs in four steps: generate the unset auto-generated keys,
//! validate the full key, merge the "must not exist" guard on generated
//! attributes with any caller conditions, and issue one conditional put.
//! Everything before the put is local; a validation failure never reaches
//! the store. A rejected put is not retried.

use aws_sdk_dynamodb::types::AttributeValue;
use futures_util::StreamExt;
use serde::Serialize;
use serde_dynamo::{from_item, to_attribute_value};
use tokio_stream as stream;
use tracing::{debug, warn};

use crate::condition::{ConditionSet, merge_conditions};
use crate::descriptor::RecordDescriptor;
use crate::error::{Error, ValidationError};
use crate::keys::{Item, Key, KeyGenerator, assign_keys, generate_key};
use crate::record::Record;
use crate::store::ItemStore;

/// Default number of saves a batch keeps in flight
pub const DEFAULT_BATCH_CONCURRENCY: usize = 10;

/// Outcome of a successful untyped save
#[derive(Debug, Clone, PartialEq)]
pub struct SavedItem {
    /// The item as written, generated keys included
    pub item: Item,
    /// Full key of the written item
    pub key: Key,
    /// Attributes generated by this save
    pub generated: Vec<&'static str>,
}

/// Outcome of a successful typed save
#[derive(Debug, Clone, PartialEq)]
pub struct Saved<T> {
    /// The record as written, generated keys included
    pub record: T,
    /// Full key of the written item
    pub key: Key,
    /// Attributes generated by this save
    pub generated: Vec<&'static str>,
}

/// Per-item outcomes of a batch save, in input order
#[must_use = "batch outcomes should be checked, items can fail independently"]
#[derive(Debug)]
pub struct BatchSaveOutput<T> {
    /// One outcome per input record
    pub outcomes: Vec<Result<Saved<T>, Error>>,
}

impl<T> BatchSaveOutput<T> {
    /// True when every record was saved
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(Result::is_ok)
    }

    /// Number of saved records
    pub fn saved_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }

    /// Number of failed records
    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.saved_count()
    }

    /// The saved records, in input order
    pub fn saved(&self) -> impl Iterator<Item = &Saved<T>> {
        self.outcomes.iter().filter_map(|o| o.as_ref().ok())
    }

    /// The failures with their input position
    pub fn failures(&self) -> impl Iterator<Item = (usize, &Error)> {
        self.outcomes
            .iter()
            .enumerate()
            .filter_map(|(index, o)| o.as_ref().err().map(|e| (index, e)))
    }
}

/// Assigns auto-generated keys and writes new items without overwriting
#[derive(Debug, Clone)]
pub struct KeyAssigningWriter<S> {
    store: S,
    key_generator: KeyGenerator,
    batch_concurrency: usize,
}

impl<S: ItemStore> KeyAssigningWriter<S> {
    /// Writer over `store` generating ULID keys
    pub fn new(store: S) -> Self {
        Self {
            store,
            key_generator: generate_key,
            batch_concurrency: DEFAULT_BATCH_CONCURRENCY,
        }
    }

    /// Use a different source of key values
    pub fn with_key_generator(mut self, key_generator: KeyGenerator) -> Self {
        self.key_generator = key_generator;
        self
    }

    /// Number of saves a batch keeps in flight, at least one
    pub fn with_batch_concurrency(mut self, batch_concurrency: usize) -> Self {
        self.batch_concurrency = batch_concurrency.max(1);
        self
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Save an attribute map described by `descriptor` into `table`
    ///
    /// Returns the item as written. On [`Error::ConditionalCheckFailed`] the
    /// error carries the key of the rejected attempt, generated values
    /// included.
    pub async fn save_item(
        &self,
        table: &str,
        descriptor: &RecordDescriptor,
        item: Item,
        conditions: Option<&ConditionSet>,
    ) -> Result<SavedItem, Error> {
        let assigned = assign_keys(descriptor, item, self.key_generator)?;
        let condition = merge_conditions(&assigned.generated, conditions)?;

        if !assigned.generated.is_empty() {
            debug!(table, generated = ?assigned.generated, "assigned generated keys");
        }

        self.store
            .conditional_put(table, &assigned.key, assigned.item.clone(), condition.as_ref())
            .await?;

        debug!(table, conditional = condition.is_some(), "item written");

        Ok(SavedItem {
            item: assigned.item,
            key: assigned.key,
            generated: assigned.generated,
        })
    }

    /// Save a record, generating its unset auto-generated keys
    ///
    /// `record` itself is left as it is; the written form comes back in
    /// [`Saved::record`].
    pub async fn save<T: Record>(
        &self,
        record: &T,
        conditions: Option<&ConditionSet>,
    ) -> Result<Saved<T>, Error> {
        let item = record_to_item(record)?;
        let saved = self
            .save_item(T::TABLE, &T::DESCRIPTOR, item, conditions)
            .await?;

        Ok(Saved {
            record: from_item(saved.item)?,
            key: saved.key,
            generated: saved.generated,
        })
    }

    /// Save every record independently
    ///
    /// Each record gets its own keys and its own conditional put; a failure
    /// does not affect the others.
    pub async fn batch_save<T: Record>(&self, records: Vec<T>) -> BatchSaveOutput<T> {
        let total = records.len();
        let outcomes: Vec<Result<Saved<T>, Error>> = stream::iter(records)
            .map(|record| async move { self.save(&record, None).await })
            .buffered(self.batch_concurrency)
            .collect()
            .await;

        let output = BatchSaveOutput { outcomes };
        if !output.is_success() {
            warn!(
                table = T::TABLE,
                total,
                failed = output.failed_count(),
                "batch save finished with failures"
            );
        }
        output
    }

    /// Load a record by string key values
    ///
    /// `range_key` is ignored for records without a sort key. Records keyed
    /// by numbers or binary values are loaded with [`Self::load_key`].
    pub async fn load<T: Record>(
        &self,
        hash_key: &str,
        range_key: Option<&str>,
    ) -> Result<Option<T>, Error> {
        let key = string_key(&T::DESCRIPTOR, hash_key, range_key)?;
        self.load_key(&key).await
    }

    /// Load a record by its full key, such as [`Saved::key`]
    pub async fn load_key<T: Record>(&self, key: &Key) -> Result<Option<T>, Error> {
        T::DESCRIPTOR.validate()?;
        for attribute in T::DESCRIPTOR.key_attributes() {
            if !key.contains_key(attribute.name) {
                return Err(ValidationError::MissingKey {
                    attribute: attribute.name.to_string(),
                }
                .into());
            }
        }

        match self.store.get_item(T::TABLE, key).await? {
            Some(item) => Ok(Some(from_item(item)?)),
            None => Ok(None),
        }
    }
}

fn record_to_item<T: Serialize>(record: &T) -> Result<Item, Error> {
    let value: AttributeValue = to_attribute_value(record)?;
    match value {
        AttributeValue::M(item) => Ok(item),
        _ => Err(ValidationError::NotAnItem.into()),
    }
}

/// Build a key of string values for `descriptor`
pub(crate) fn string_key(
    descriptor: &RecordDescriptor,
    hash_key: &str,
    range_key: Option<&str>,
) -> Result<Key, ValidationError> {
    descriptor.validate()?;

    let mut key = Key::with_capacity(2);
    if let Some(attribute) = descriptor.hash_key() {
        if hash_key.is_empty() {
            return Err(ValidationError::EmptyKey {
                attribute: attribute.name.to_string(),
            });
        }
        let _ = key.insert(
            attribute.name.to_string(),
            AttributeValue::S(hash_key.to_string()),
        );
    }

    if let Some(attribute) = descriptor.range_key() {
        match range_key {
            Some(value) if !value.is_empty() => {
                let _ = key.insert(
                    attribute.name.to_string(),
                    AttributeValue::S(value.to_string()),
                );
            }
            Some(_) => {
                return Err(ValidationError::EmptyKey {
                    attribute: attribute.name.to_string(),
                });
            }
            None => {
                return Err(ValidationError::MissingKey {
                    attribute: attribute.name.to_string(),
                });
            }
        }
    }

    Ok(key)
}
