//! Key assignment: fill in auto-generated key attributes and resolve the item key.

use aws_sdk_dynamodb::types::AttributeValue;
use std::collections::HashMap;

use crate::descriptor::RecordDescriptor;
use crate::error::ValidationError;

/// A DynamoDB item: attribute name to value
pub type Item = HashMap<String, AttributeValue>;

/// The key attributes of an item
pub type Key = HashMap<String, AttributeValue>;

/// Source of fresh key values
pub type KeyGenerator = fn() -> String;

/// Generate a new unique key value
///
/// Values are ULIDs: 26 Crockford base32 characters, lexicographically
/// ordered by creation time.
pub fn generate_key() -> String {
    rusty_ulid::generate_ulid_string()
}

/// An item with its key attributes resolved
#[must_use = "the assigned item must be written for the generated keys to take effect"]
#[derive(Debug, Clone, PartialEq)]
pub struct AssignedKeys {
    /// The item with generated key values applied
    pub item: Item,
    /// Full key of the item
    pub key: Key,
    /// Attributes generated by this assignment, hash key first
    pub generated: Vec<&'static str>,
}

/// State of a key attribute in an item
enum KeyValue<'a> {
    Unset,
    Empty,
    Unsupported,
    Set(&'a AttributeValue),
}

fn key_value<'a>(item: &'a Item, attribute: &str) -> KeyValue<'a> {
    match item.get(attribute) {
        None | Some(AttributeValue::Null(_)) => KeyValue::Unset,
        Some(AttributeValue::S(s)) if s.is_empty() => KeyValue::Empty,
        Some(AttributeValue::B(b)) if b.as_ref().is_empty() => KeyValue::Empty,
        Some(value @ (AttributeValue::S(_) | AttributeValue::N(_) | AttributeValue::B(_))) => {
            KeyValue::Set(value)
        }
        Some(_) => KeyValue::Unsupported,
    }
}

/// Apply generated key values to `item` and resolve its key
///
/// Unset auto-generated attributes receive a value from `generator`; set ones
/// are left alone. Every key attribute must end up with a non-empty scalar:
/// an explicit empty string is rejected rather than replaced, unset
/// non-generated keys are rejected. Nothing is returned on failure, so the
/// caller's item is never partially updated.
pub fn assign_keys(
    descriptor: &RecordDescriptor,
    mut item: Item,
    generator: KeyGenerator,
) -> Result<AssignedKeys, ValidationError> {
    descriptor.validate()?;

    let mut key = Key::with_capacity(2);
    let mut generated = Vec::new();
    let mut fresh: Vec<(&'static str, String)> = Vec::new();

    for attribute in descriptor.key_attributes() {
        let name = attribute.name;

        match key_value(&item, name) {
            KeyValue::Set(value) => {
                let _ = key.insert(name.to_string(), value.clone());
            }
            KeyValue::Empty => {
                return Err(ValidationError::EmptyKey {
                    attribute: name.to_string(),
                });
            }
            KeyValue::Unsupported => {
                return Err(ValidationError::UnsupportedKeyType {
                    attribute: name.to_string(),
                });
            }
            KeyValue::Unset if attribute.flags.auto_generated => {
                fresh.push((name, generator()));
                generated.push(name);
            }
            KeyValue::Unset => {
                return Err(ValidationError::MissingKey {
                    attribute: name.to_string(),
                });
            }
        }
    }

    for (name, value) in fresh {
        let value = AttributeValue::S(value);
        let _ = key.insert(name.to_string(), value.clone());
        let _ = item.insert(name.to_string(), value);
    }

    Ok(AssignedKeys {
        item,
        key,
        generated,
    })
}
