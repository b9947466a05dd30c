//! Test helpers and fixtures for the integration tests
//!
//! This module provides common test utilities, fixtures, and helper functions
//! used across all integration tests.
#![allow(dead_code, unused_imports)]

pub mod fixtures;

pub use aws_sdk_dynamodb::types::AttributeValue;
pub use dynamo_autokey::setup;
pub use dynamo_autokey::{
    ConditionSet, ConditionalOperator, Error, ExpectedValue, InMemoryStore, Item, Key,
    KeyAssigningWriter, Record, ValidationError,
};
pub use serde::{Deserialize, Serialize};

pub use fixtures::*;

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::OnceCell;

/// Ensure DynamoDB client is initialized for tests
static TEST_INIT: OnceCell<()> = OnceCell::const_new();

/// Initialize DynamoDB client for tests (idempotent)
pub async fn init_test_client() {
    TEST_INIT
        .get_or_init(|| async {
            // Trigger auto-initialization
            let _ = dynamo_autokey::dynamodb_client().await;
        })
        .await;
}

/// Setup the fixture table for LocalStack tests
///
/// Creates the table if it doesn't exist. Safe to call multiple times.
pub async fn setup_table() -> Result<(), Error> {
    init_test_client().await;
    let _ = setup::table::<NothingAutoGenerated>().await?;
    Ok(())
}

/// Writer over a fresh in-memory store
pub fn memory_writer() -> KeyAssigningWriter<InMemoryStore> {
    KeyAssigningWriter::new(InMemoryStore::new())
}

/// A unique, caller-chosen key value
///
/// Timestamp based with a process-wide counter so values stay distinct
/// within the same millisecond.
pub fn unique_value() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    format!(
        "{}-{}",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis(),
        COUNTER.fetch_add(1, Ordering::Relaxed)
    )
}

/// String attribute value
pub fn s(value: &str) -> AttributeValue {
    AttributeValue::S(value.to_string())
}

/// A generated key value looks like a ULID
pub fn assert_generated(value: &Option<String>) {
    let value = value.as_deref().expect("generated key should be set");
    assert_eq!(value.len(), 26, "unexpected generated key {value:?}");
}
