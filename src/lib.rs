//! # DynamoDB Auto-Generated Keys
//!
//! Save records whose partition and/or sort key values are generated on
//! insert, without ever overwriting an existing item:
//! - Unset auto-generated key attributes receive a fresh ULID
//! - Every key attribute is validated before any request is sent
//! - The put is guarded by `attribute_not_exists` on each generated attribute
//! - Caller conditions can be layered on top (AND) or replace the guard (OR)
//! - Batch saves apply the same rules to each record independently
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dynamo_autokey::{AttributeDescriptor, Error, Record, RecordDescriptor};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
//! struct Event {
//!     #[serde(skip_serializing_if = "Option::is_none")]
//!     event_id: Option<String>,
//!     payload: String,
//! }
//!
//! impl Record for Event {
//!     const TABLE: &'static str = "events";
//!     const DESCRIPTOR: RecordDescriptor = RecordDescriptor::new(&[
//!         AttributeDescriptor::hash_key("event_id").auto_generated(),
//!     ]);
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Error> {
//!     let config = aws_config::defaults(aws_config::BehaviorVersion::latest()).load().await;
//!     dynamo_autokey::init(&config).await;
//!
//!     let event = Event { event_id: None, payload: "hello".to_string() };
//!     let saved = event.save().await?;
//!
//!     let loaded = Event::load(saved.record.event_id.as_deref().unwrap_or_default(), None).await?;
//!     assert_eq!(loaded, Some(saved.record));
//!     Ok(())
//! }
//! ```
#![deny(
    warnings,
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    unused_allocation,
    unused_comparisons,
    unused_parens,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results,
    deprecated,
    unknown_lints,
    unreachable_code,
    unused_mut
)]

mod error;
pub use error::{Error, ValidationError};

/// Key layout of records
pub mod descriptor;

/// Key generation and assignment
pub mod keys;

/// Expected-value conditions
pub mod condition;

/// Storage collaborators
pub mod store;

/// The key-assigning writer
pub mod writer;

/// Record trait backed by the global client
pub mod record;

/// Table setup utilities for testing
pub mod setup;

// Re-export main types for convenience
pub use condition::{ConditionSet, ConditionalOperator, ExpectedValue};
pub use descriptor::{AttributeDescriptor, KeyFlags, RecordDescriptor};
pub use keys::{Item, Key, generate_key};
pub use record::Record;
pub use store::{DynamoDbStore, InMemoryStore, ItemStore};
pub use writer::{BatchSaveOutput, KeyAssigningWriter, Saved, SavedItem};

// Re-export aws-config types for configuration
pub use aws_config::{
    BehaviorVersion, Region, SdkConfig, defaults,
    retry::{RetryConfig, RetryMode},
    timeout::TimeoutConfig,
};

// Re-export aws-types for advanced configuration
pub use aws_types::sdk_config::Builder as SdkConfigBuilder;

use aws_sdk_dynamodb::Client as DynamoDbClient;
use tokio::sync::OnceCell;

/// Global DynamoDB client instance
static GLOBAL_CLIENT: OnceCell<DynamoDbClient> = OnceCell::const_new();

/// Default AWS configuration for the global client
///
/// - Adaptive retry mode with 3 max attempts
/// - Exponential backoff starting at 1 second
/// - Connect timeout: 3 seconds
/// - Read timeout: 20 seconds
/// - Operation timeout: 60 seconds
/// - LocalStack support via AWS_PROFILE=localstack
async fn aws_config_defaults() -> SdkConfig {
    use std::time::Duration;

    let timeout_config = TimeoutConfig::builder()
        .connect_timeout(Duration::from_secs(3))
        .read_timeout(Duration::from_secs(20))
        .operation_timeout(Duration::from_secs(60))
        .build();

    let mut loader = defaults(BehaviorVersion::latest())
        .retry_config(
            RetryConfig::adaptive()
                .with_max_attempts(3)
                .with_initial_backoff(Duration::from_secs(1)),
        )
        .timeout_config(timeout_config);

    // Support LocalStack via AWS_PROFILE=localstack
    if std::env::var("AWS_PROFILE").unwrap_or_default() == "localstack" {
        loader = loader.endpoint_url("http://127.0.0.1:4566");
    }

    loader.load().await
}

/// Initialize the global DynamoDB client with a custom AWS config
///
/// Has no effect once the client is initialized.
///
/// # Example
///
/// ```rust,no_run
/// #[tokio::main]
/// async fn main() {
///     let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
///         .region(aws_config::Region::new("us-west-2"))
///         .load()
///         .await;
///     dynamo_autokey::init(&config).await;
/// }
/// ```
pub async fn init(config: &SdkConfig) {
    let _ = GLOBAL_CLIENT
        .get_or_init(|| async { DynamoDbClient::new(config) })
        .await;
}

/// Initialize the global DynamoDB client with a custom client instance
pub async fn init_with_client(client: DynamoDbClient) {
    let _ = GLOBAL_CLIENT.get_or_init(|| async { client }).await;
}

/// Get a reference to the global DynamoDB client
///
/// Automatically initializes the client with sensible defaults if not already initialized:
/// adaptive retries (3 attempts), 3s connect / 20s read / 60s operation timeouts,
/// and the LocalStack endpoint when `AWS_PROFILE=localstack`.
/// For custom configuration, call [`init`] or [`init_with_client`] first.
pub async fn dynamodb_client() -> &'static DynamoDbClient {
    GLOBAL_CLIENT
        .get_or_init(|| async {
            let config = aws_config_defaults().await;
            DynamoDbClient::new(&config)
        })
        .await
}
