//! Static description of a record's key attributes.
//!
//! A [`RecordDescriptor`] is built in `const` context and names which
//! attributes form the item key and which of those the writer fills in:
//!
//! ```rust
//! use dynamo_autokey::descriptor::{AttributeDescriptor, RecordDescriptor};
//!
//! const ORDER: RecordDescriptor = RecordDescriptor::new(&[
//!     AttributeDescriptor::hash_key("customer_id"),
//!     AttributeDescriptor::range_key("order_id").auto_generated(),
//! ]);
//!
//! assert!(ORDER.validate().is_ok());
//! assert_eq!(ORDER.range_key().map(|a| a.name), Some("order_id"));
//! ```

use crate::error::ValidationError;

/// Role flags carried by a single attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyFlags {
    /// Attribute is the partition (hash) key
    pub hash_key: bool,
    /// Attribute is the sort (range) key
    pub range_key: bool,
    /// Attribute is assigned by the writer when unset
    pub auto_generated: bool,
}

impl KeyFlags {
    /// True for either key role
    pub const fn is_key(&self) -> bool {
        self.hash_key || self.range_key
    }
}

/// One attribute of a record and its key roles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeDescriptor {
    /// Attribute name as stored in the table
    pub name: &'static str,
    /// Key roles of the attribute
    pub flags: KeyFlags,
}

impl AttributeDescriptor {
    /// Plain attribute with no key role
    pub const fn attribute(name: &'static str) -> Self {
        Self {
            name,
            flags: KeyFlags {
                hash_key: false,
                range_key: false,
                auto_generated: false,
            },
        }
    }

    /// Partition key attribute
    pub const fn hash_key(name: &'static str) -> Self {
        let mut attribute = Self::attribute(name);
        attribute.flags.hash_key = true;
        attribute
    }

    /// Sort key attribute
    pub const fn range_key(name: &'static str) -> Self {
        let mut attribute = Self::attribute(name);
        attribute.flags.range_key = true;
        attribute
    }

    /// Mark the attribute as auto-generated
    pub const fn auto_generated(mut self) -> Self {
        self.flags.auto_generated = true;
        self
    }
}

/// Key layout of a record type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordDescriptor {
    attributes: &'static [AttributeDescriptor],
}

impl RecordDescriptor {
    /// Describe a record by its attributes
    ///
    /// Only key attributes need to be listed; plain attributes are accepted
    /// and ignored by the writer.
    pub const fn new(attributes: &'static [AttributeDescriptor]) -> Self {
        Self { attributes }
    }

    /// All described attributes
    pub fn attributes(&self) -> &'static [AttributeDescriptor] {
        self.attributes
    }

    /// The partition key attribute, if one is described
    pub fn hash_key(&self) -> Option<&'static AttributeDescriptor> {
        self.attributes.iter().find(|a| a.flags.hash_key)
    }

    /// The sort key attribute, if one is described
    pub fn range_key(&self) -> Option<&'static AttributeDescriptor> {
        self.attributes.iter().find(|a| a.flags.range_key)
    }

    /// Key attributes, hash key first
    pub fn key_attributes(&self) -> impl Iterator<Item = &'static AttributeDescriptor> {
        self.hash_key().into_iter().chain(self.range_key())
    }

    /// Names of the attributes the writer generates
    pub fn auto_generated(&self) -> impl Iterator<Item = &'static str> {
        self.attributes
            .iter()
            .filter(|a| a.flags.auto_generated)
            .map(|a| a.name)
    }

    /// Check the structural rules of the descriptor
    ///
    /// Exactly one hash key, at most one range key, no attribute holding
    /// both roles, only key attributes auto-generated, names non-empty and
    /// unique.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let invalid = |reason: String| Err(ValidationError::InvalidDescriptor(reason));

        for (index, attribute) in self.attributes.iter().enumerate() {
            if attribute.name.is_empty() {
                return invalid(format!("attribute #{index} has an empty name"));
            }
            if self.attributes[..index]
                .iter()
                .any(|other| other.name == attribute.name)
            {
                return invalid(format!("attribute '{}' is described twice", attribute.name));
            }
            if attribute.flags.hash_key && attribute.flags.range_key {
                return invalid(format!(
                    "attribute '{}' cannot be both hash and range key",
                    attribute.name
                ));
            }
            if attribute.flags.auto_generated && !attribute.flags.is_key() {
                return invalid(format!(
                    "attribute '{}' is auto-generated but not a key",
                    attribute.name
                ));
            }
        }

        match self.attributes.iter().filter(|a| a.flags.hash_key).count() {
            1 => {}
            0 => return invalid("no hash key".to_string()),
            n => return invalid(format!("{n} hash keys")),
        }

        let range_keys = self.attributes.iter().filter(|a| a.flags.range_key).count();
        if range_keys > 1 {
            return invalid(format!("{range_keys} range keys"));
        }

        Ok(())
    }
}
