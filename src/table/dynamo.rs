//! Amazon DynamoDB table

use super::BarTable;
use crate::error::{Error, Result};
use crate::record::BarRecord;
use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use std::collections::HashMap;

/// DynamoDB table written with `PutItem`
#[derive(Debug, Clone)]
pub struct DynamoTable {
    client: Client,
    table_name: String,
}

impl DynamoTable {
    /// Create a table handle from an existing client
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Create a table handle with a client configured from the environment
    pub async fn from_env(
        table_name: impl Into<String>,
        region: Option<String>,
        endpoint_url: Option<String>,
    ) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

        if let Some(region) = region {
            loader = loader.region(aws_config::Region::new(region));
        }

        if let Some(endpoint) = endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        Self::new(Client::new(&sdk_config), table_name)
    }

    /// Convert a record into DynamoDB attributes
    ///
    /// Keys and text fields are strings (`S`); prices and volume are
    /// numbers (`N`) carrying their exact decimal text.
    pub fn to_item(record: &BarRecord) -> HashMap<String, AttributeValue> {
        HashMap::from([
            (
                "symbol_timestamp".to_string(),
                AttributeValue::S(record.symbol_timestamp.clone()),
            ),
            (
                "row_key".to_string(),
                AttributeValue::S(record.row_key.clone()),
            ),
            ("symbol".to_string(), AttributeValue::S(record.symbol.clone())),
            (
                "timestamp".to_string(),
                AttributeValue::S(record.timestamp.clone()),
            ),
            ("date".to_string(), AttributeValue::S(record.date.clone())),
            ("open".to_string(), AttributeValue::N(record.open.to_string())),
            (
                "close".to_string(),
                AttributeValue::N(record.close.to_string()),
            ),
            ("high".to_string(), AttributeValue::N(record.high.to_string())),
            ("low".to_string(), AttributeValue::N(record.low.to_string())),
            (
                "volume".to_string(),
                AttributeValue::N(record.volume.to_string()),
            ),
        ])
    }
}

#[async_trait]
impl BarTable for DynamoTable {
    fn name(&self) -> &str {
        &self.table_name
    }

    fn label(&self) -> &str {
        "DynamoDB"
    }

    async fn put(&self, record: &BarRecord) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(Self::to_item(record)))
            .send()
            .await
            .map_err(|e| Error::write(&self.table_name, DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }
}
