use aws_sdk_dynamodb::operation::create_table::{CreateTableError, CreateTableOutput};
use aws_sdk_dynamodb::types::{
    AttributeDefinition, KeySchemaElement, KeyType, ProvisionedThroughput, ScalarAttributeType,
};

use crate::dynamodb_client;
use crate::error::Error;
use crate::record::Record;

/// Create the table of a [`Record`] with string key attributes
///
/// Automatically initializes the DynamoDB client with defaults if not already initialized.
/// An already existing table is not an error.
pub async fn table<T: Record>() -> Result<CreateTableOutput, Error> {
    T::DESCRIPTOR.validate()?;

    let client = dynamodb_client().await;

    let mut builder = client.create_table().table_name(T::TABLE).provisioned_throughput(
        ProvisionedThroughput::builder()
            .read_capacity_units(10)
            .write_capacity_units(5)
            .build()?,
    );

    for attribute in T::DESCRIPTOR.key_attributes() {
        let key_type = if attribute.flags.hash_key {
            KeyType::Hash
        } else {
            KeyType::Range
        };

        builder = builder
            .key_schema(
                KeySchemaElement::builder()
                    .attribute_name(attribute.name)
                    .key_type(key_type)
                    .build()?,
            )
            .attribute_definitions(
                AttributeDefinition::builder()
                    .attribute_name(attribute.name)
                    .attribute_type(ScalarAttributeType::S)
                    .build()?,
            );
    }

    // Ignore ResourceInUseException - table already exists
    match builder.send().await {
        Ok(output) => Ok(output),
        Err(e) => {
            if matches!(
                e.as_service_error(),
                Some(CreateTableError::ResourceInUseException(_))
            ) {
                return Ok(CreateTableOutput::builder().build());
            }
            Err(e.into())
        }
    }
}
