use aws_sdk_dynamodb::error::BuildError;
use aws_sdk_dynamodb::operation::create_table::CreateTableError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_smithy_runtime_api::client::result::SdkError;
use aws_smithy_runtime_api::http::Response;
use serde_dynamo::Error as SerdeDynamoError;
use std::error::Error as StdError;
use std::fmt;

use crate::keys::Key;

type DynamoPutError = SdkError<PutItemError, Response>;
type DynamoGetError = SdkError<GetItemError, Response>;
type DynamoCreateTableError = SdkError<CreateTableError, Response>;

/// Error raised by a save or load
#[derive(Debug)]
pub enum Error {
    /// Local validation failure, no request was sent
    Validation(ValidationError),
    /// The store rejected the write because the merged condition did not hold
    ///
    /// `key` holds the key values of the rejected attempt, generated ones included.
    ConditionalCheckFailed {
        /// Table the write was aimed at
        table: String,
        /// Full key of the rejected item
        key: Key,
    },
    /// Serde DynamoDB serialization/deserialization error
    SerdeDynamo(SerdeDynamoError),
    /// DynamoDB request builder error
    BuildError(BuildError),
    /// DynamoDB PutItem operation error
    DynamoPutError(DynamoPutError),
    /// DynamoDB GetItem operation error
    DynamoGetError(DynamoGetError),
    /// DynamoDB CreateTable operation error
    DynamoCreateTableError(DynamoCreateTableError),
}

/// Client-side validation failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The record descriptor breaks one of its structural rules
    InvalidDescriptor(String),
    /// A key attribute has no value and is not auto-generated
    MissingKey {
        /// Attribute name
        attribute: String,
    },
    /// A key attribute is set to an empty string or empty binary
    EmptyKey {
        /// Attribute name
        attribute: String,
    },
    /// A key attribute holds something other than a string, number or binary
    UnsupportedKeyType {
        /// Attribute name
        attribute: String,
    },
    /// The record did not serialize to an attribute map
    NotAnItem,
    /// OR-joined caller conditions leave generated key attributes unguarded
    IncompatibleConditions {
        /// Generated attributes the caller's set does not mention
        uncovered: Vec<String>,
    },
}

impl Error {
    /// Check if the error is a DynamoDB ConditionalCheckFailedException
    ///
    /// Signals either a genuine key collision or a caller condition that did not hold.
    ///
    /// # Example
    /// ```no_run
    /// # use dynamo_autokey::Error;
    /// # async fn example(error: Error) {
    /// if error.is_conditional_check_failed() {
    ///     println!("An item with this key already exists");
    /// }
    /// # }
    /// ```
    pub fn is_conditional_check_failed(&self) -> bool {
        matches!(self, Error::ConditionalCheckFailed { .. })
    }

    /// Check if the error was raised locally before any request was made
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// Check if the error is a serialization/deserialization error
    pub fn is_serialization_error(&self) -> bool {
        matches!(self, Error::SerdeDynamo(_))
    }

    /// Check if the error is a DynamoDB transport or service error
    ///
    /// Conditional check failures are reported separately and return `false`.
    pub fn is_dynamodb_error(&self) -> bool {
        matches!(
            self,
            Error::BuildError(_)
                | Error::DynamoPutError(_)
                | Error::DynamoGetError(_)
                | Error::DynamoCreateTableError(_)
        )
    }

    /// The key of the rejected write, if this is a conditional check failure
    pub fn rejected_key(&self) -> Option<&Key> {
        match self {
            Error::ConditionalCheckFailed { key, .. } => Some(key),
            _ => None,
        }
    }
}

macro_rules! impl_from_error {
    ($name:ident, $variant:ident) => {
        impl From<$name> for Error {
            fn from(e: $name) -> Self {
                Error::$variant(e)
            }
        }
    };
    ($name:ident) => {
        impl From<$name> for Error {
            fn from(e: $name) -> Self {
                Error::$name(e)
            }
        }
    };
}

impl_from_error!(ValidationError, Validation);
impl_from_error!(SerdeDynamoError, SerdeDynamo);
impl_from_error!(BuildError);
impl_from_error!(DynamoPutError);
impl_from_error!(DynamoGetError);
impl_from_error!(DynamoCreateTableError);

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Validation(e) => write!(f, "validation failed: {}", e),
            Error::ConditionalCheckFailed { table, key } => {
                let mut names: Vec<&str> = key.keys().map(String::as_str).collect();
                names.sort_unstable();
                write!(
                    f,
                    "conditional check failed on table '{}' for key ({})",
                    table,
                    names.join(", ")
                )
            }
            Error::SerdeDynamo(e) => write!(f, "DynamoDB serialization error: {}", e),
            Error::BuildError(e) => write!(f, "DynamoDB request builder error: {}", e),
            Error::DynamoPutError(e) => {
                write!(f, "DynamoDB PutItem operation failed: {}", e)
            }
            Error::DynamoGetError(e) => {
                write!(f, "DynamoDB GetItem operation failed: {}", e)
            }
            Error::DynamoCreateTableError(e) => {
                write!(f, "DynamoDB CreateTable operation failed: {}", e)
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Validation(e) => Some(e),
            Error::SerdeDynamo(e) => Some(e),
            Error::BuildError(e) => Some(e),
            Error::DynamoPutError(e) => Some(e),
            Error::DynamoGetError(e) => Some(e),
            Error::DynamoCreateTableError(e) => Some(e),
            Error::ConditionalCheckFailed { .. } => None,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidDescriptor(reason) => {
                write!(f, "invalid record descriptor: {}", reason)
            }
            ValidationError::MissingKey { attribute } => {
                write!(f, "key attribute '{}' has no value", attribute)
            }
            ValidationError::EmptyKey { attribute } => {
                write!(f, "key attribute '{}' is empty", attribute)
            }
            ValidationError::UnsupportedKeyType { attribute } => write!(
                f,
                "key attribute '{}' must be a string, number or binary",
                attribute
            ),
            ValidationError::NotAnItem => f.write_str("record did not serialize to a map"),
            ValidationError::IncompatibleConditions { uncovered } => write!(
                f,
                "OR conditions must cover every auto-generated key attribute, missing: {}",
                uncovered.join(", ")
            ),
        }
    }
}

impl StdError for ValidationError {}
