use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::put_item::builders::PutItemFluentBuilder;
use aws_sdk_dynamodb::types::{ReturnConsumedCapacity, ReturnValue};
use aws_smithy_runtime_api::client::result::SdkError;
use tracing::debug;

use super::ItemStore;
use crate::condition::ConditionSet;
use crate::error::Error;
use crate::keys::{Item, Key};

/// [`ItemStore`] backed by the DynamoDB service
#[derive(Debug, Clone)]
pub struct DynamoDbStore {
    client: Client,
}

impl DynamoDbStore {
    /// Store using the given client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Store using the global client, initializing it with defaults if needed
    ///
    /// See [`crate::dynamodb_client`].
    pub async fn global() -> Self {
        Self::new(crate::dynamodb_client().await.clone())
    }

    /// The underlying client
    pub fn client(&self) -> &Client {
        &self.client
    }

    fn put_request(
        &self,
        table: &str,
        item: Item,
        condition: Option<&ConditionSet>,
    ) -> PutItemFluentBuilder {
        let mut builder = self
            .client
            .put_item()
            .table_name(table)
            .return_values(ReturnValue::None)
            .return_consumed_capacity(ReturnConsumedCapacity::None)
            .set_item(Some(item));

        if let Some(condition) = condition.filter(|c| !c.is_empty()) {
            let rendered = condition.to_expression();
            builder = builder
                .condition_expression(rendered.expression)
                .set_expression_attribute_names(Some(rendered.names));
            // DynamoDB rejects an empty ExpressionAttributeValues map
            if !rendered.values.is_empty() {
                builder = builder.set_expression_attribute_values(Some(rendered.values));
            }
        }

        builder
    }
}

fn is_conditional_check_failed<R>(e: &SdkError<PutItemError, R>) -> bool {
    matches!(
        e.as_service_error(),
        Some(PutItemError::ConditionalCheckFailedException(_))
    )
}

impl ItemStore for DynamoDbStore {
    async fn conditional_put(
        &self,
        table: &str,
        key: &Key,
        item: Item,
        condition: Option<&ConditionSet>,
    ) -> Result<(), Error> {
        match self.put_request(table, item, condition).send().await {
            Ok(_) => Ok(()),
            Err(e) if is_conditional_check_failed(&e) => {
                debug!(table, "conditional check failed");
                Err(Error::ConditionalCheckFailed {
                    table: table.to_string(),
                    key: key.clone(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_item(&self, table: &str, key: &Key) -> Result<Option<Item>, Error> {
        let result = self
            .client
            .get_item()
            .table_name(table)
            .consistent_read(true)
            .set_return_consumed_capacity(None)
            .set_key(Some(key.clone()))
            .send()
            .await?;

        Ok(result.item)
    }
}
