//! Common test fixtures and data structures
//!
//! Every record lives in the same table, keyed by `key` (hash) and
//! `rangeKey` (range), and differs only in which keys are auto-generated.
use super::{Deserialize, Serialize};
use dynamo_autokey::{AttributeDescriptor, Record, RecordDescriptor};

pub const TABLE_NAME: &str = "dynamo-autokey-string-range";

/// Both keys generated
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Default)]
pub struct HashKeyRangeKeyBothAutoGenerated {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(rename = "rangeKey", skip_serializing_if = "Option::is_none")]
    pub range_key: Option<String>,
    #[serde(rename = "otherAttribute", skip_serializing_if = "Option::is_none")]
    pub other_attribute: Option<String>,
}

impl Record for HashKeyRangeKeyBothAutoGenerated {
    const TABLE: &'static str = TABLE_NAME;
    const DESCRIPTOR: RecordDescriptor = RecordDescriptor::new(&[
        AttributeDescriptor::hash_key("key").auto_generated(),
        AttributeDescriptor::range_key("rangeKey").auto_generated(),
        AttributeDescriptor::attribute("otherAttribute"),
    ]);
}

/// Only the hash key generated
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Default)]
pub struct HashKeyAutoGenerated {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(rename = "rangeKey", skip_serializing_if = "Option::is_none")]
    pub range_key: Option<String>,
    #[serde(rename = "otherAttribute", skip_serializing_if = "Option::is_none")]
    pub other_attribute: Option<String>,
}

impl Record for HashKeyAutoGenerated {
    const TABLE: &'static str = TABLE_NAME;
    const DESCRIPTOR: RecordDescriptor = RecordDescriptor::new(&[
        AttributeDescriptor::hash_key("key").auto_generated(),
        AttributeDescriptor::range_key("rangeKey"),
    ]);
}

/// Only the range key generated
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Default)]
pub struct RangeKeyAutoGenerated {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(rename = "rangeKey", skip_serializing_if = "Option::is_none")]
    pub range_key: Option<String>,
    #[serde(rename = "otherAttribute", skip_serializing_if = "Option::is_none")]
    pub other_attribute: Option<String>,
}

impl Record for RangeKeyAutoGenerated {
    const TABLE: &'static str = TABLE_NAME;
    const DESCRIPTOR: RecordDescriptor = RecordDescriptor::new(&[
        AttributeDescriptor::hash_key("key"),
        AttributeDescriptor::range_key("rangeKey").auto_generated(),
    ]);
}

/// No key generated
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Default)]
pub struct NothingAutoGenerated {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(rename = "rangeKey", skip_serializing_if = "Option::is_none")]
    pub range_key: Option<String>,
    #[serde(rename = "otherAttribute", skip_serializing_if = "Option::is_none")]
    pub other_attribute: Option<String>,
}

impl Record for NothingAutoGenerated {
    const TABLE: &'static str = TABLE_NAME;
    const DESCRIPTOR: RecordDescriptor = RecordDescriptor::new(&[
        AttributeDescriptor::hash_key("key"),
        AttributeDescriptor::range_key("rangeKey"),
    ]);
}

/// Both keys generated, no other attribute
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Default)]
pub struct BothAutoGeneratedKeyOnly {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(rename = "rangeKey", skip_serializing_if = "Option::is_none")]
    pub range_key: Option<String>,
}

impl Record for BothAutoGeneratedKeyOnly {
    const TABLE: &'static str = TABLE_NAME;
    const DESCRIPTOR: RecordDescriptor = RecordDescriptor::new(&[
        AttributeDescriptor::hash_key("key").auto_generated(),
        AttributeDescriptor::range_key("rangeKey").auto_generated(),
    ]);
}

/// Hash key generated, no other attribute
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Default)]
pub struct HashKeyAutoGeneratedKeyOnly {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(rename = "rangeKey", skip_serializing_if = "Option::is_none")]
    pub range_key: Option<String>,
}

impl Record for HashKeyAutoGeneratedKeyOnly {
    const TABLE: &'static str = TABLE_NAME;
    const DESCRIPTOR: RecordDescriptor = RecordDescriptor::new(&[
        AttributeDescriptor::hash_key("key").auto_generated(),
        AttributeDescriptor::range_key("rangeKey"),
    ]);
}

/// Range key generated, no other attribute
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Default)]
pub struct RangeKeyAutoGeneratedKeyOnly {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(rename = "rangeKey", skip_serializing_if = "Option::is_none")]
    pub range_key: Option<String>,
}

impl Record for RangeKeyAutoGeneratedKeyOnly {
    const TABLE: &'static str = TABLE_NAME;
    const DESCRIPTOR: RecordDescriptor = RecordDescriptor::new(&[
        AttributeDescriptor::hash_key("key"),
        AttributeDescriptor::range_key("rangeKey").auto_generated(),
    ]);
}

/// No key generated, no other attribute
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Default)]
pub struct NothingAutoGeneratedKeyOnly {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(rename = "rangeKey", skip_serializing_if = "Option::is_none")]
    pub range_key: Option<String>,
}

impl Record for NothingAutoGeneratedKeyOnly {
    const TABLE: &'static str = TABLE_NAME;
    const DESCRIPTOR: RecordDescriptor = RecordDescriptor::new(&[
        AttributeDescriptor::hash_key("key"),
        AttributeDescriptor::range_key("rangeKey"),
    ]);
}

pub const COUNTER_TABLE_NAME: &str = "dynamo-autokey-counters";

/// Numeric hash key, generated range key
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct Counter {
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seq: Option<String>,
    pub total: u64,
}

impl Record for Counter {
    const TABLE: &'static str = COUNTER_TABLE_NAME;
    const DESCRIPTOR: RecordDescriptor = RecordDescriptor::new(&[
        AttributeDescriptor::hash_key("id"),
        AttributeDescriptor::range_key("seq").auto_generated(),
    ]);
}
