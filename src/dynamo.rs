//! The DynamoDB-backed store.
//!
//! Every table is keyed by a single string attribute, `id`. Items cross the
//! boundary through `serde_dynamo`, which is also what turns DynamoDB's
//! decimal numbers back into plain JSON numbers on the way out.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use lambda_runtime::tracing;
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::expression::{equality_expression, update_expression};
use crate::item::{Item, KEY_ATTR};
use crate::store::{Continuation, Page, Store};

pub struct DynamoStore {
    client: aws_sdk_dynamodb::Client,
}

impl DynamoStore {
    pub fn new(client: aws_sdk_dynamodb::Client) -> Self {
        DynamoStore { client }
    }
}

fn key_value(id: &str) -> AttributeValue {
    AttributeValue::S(id.to_owned())
}

fn into_page(
    items: Option<Vec<HashMap<String, AttributeValue>>>,
    last_key: Option<HashMap<String, AttributeValue>>,
) -> Result<Page> {
    let items: Vec<Item> = serde_dynamo::from_items(items.unwrap_or_default())?;

    Ok(Page {
        items,
        next: last_key.filter(|k| !k.is_empty()).map(Continuation),
    })
}

#[async_trait]
impl Store for DynamoStore {
    async fn get_item(&self, table: &str, id: &str) -> Result<Option<Item>> {
        let result = self
            .client
            .get_item()
            .table_name(table)
            .key(KEY_ATTR, key_value(id))
            .send()
            .await
            .map_err(|e| Error::from_sdk("GetItem", e))?;

        match result.item {
            Some(item) => Ok(Some(serde_dynamo::from_item(item)?)),
            None => Ok(None),
        }
    }

    async fn put_item(&self, table: &str, item: &Item) -> Result<()> {
        let item: HashMap<String, AttributeValue> = serde_dynamo::to_item(item)?;

        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| Error::from_sdk("PutItem", e))?;

        Ok(())
    }

    async fn update_item(&self, table: &str, id: &str, updates: &Item) -> Result<Item> {
        let expr = update_expression(updates)?;

        let result = self
            .client
            .update_item()
            .table_name(table)
            .key(KEY_ATTR, key_value(id))
            .update_expression(expr.text)
            .set_expression_attribute_names(Some(expr.names))
            .set_expression_attribute_values(Some(expr.values))
            .return_values(ReturnValue::AllNew)
            .send()
            .await
            .map_err(|e| Error::from_sdk("UpdateItem", e))?;

        Ok(serde_dynamo::from_item(result.attributes.unwrap_or_default())?)
    }

    async fn delete_item(&self, table: &str, id: &str) -> Result<()> {
        self.client
            .delete_item()
            .table_name(table)
            .key(KEY_ATTR, key_value(id))
            .send()
            .await
            .map_err(|e| Error::from_sdk("DeleteItem", e))?;

        Ok(())
    }

    async fn scan_page(
        &self,
        table: &str,
        filters: &Item,
        start: Option<Continuation>,
    ) -> Result<Page> {
        let mut scan = self
            .client
            .scan()
            .table_name(table)
            .set_exclusive_start_key(start.map(|c| c.0));

        if let Some(expr) = equality_expression(filters)? {
            scan = scan
                .filter_expression(expr.text)
                .set_expression_attribute_names(Some(expr.names))
                .set_expression_attribute_values(Some(expr.values));
        }

        let result = scan
            .send()
            .await
            .map_err(|e| Error::from_sdk("Scan", e))?;

        tracing::debug!(
            table,
            scanned = result.scanned_count,
            returned = result.count,
            "scan page"
        );
        into_page(result.items, result.last_evaluated_key)
    }

    async fn query_page(
        &self,
        table: &str,
        index: Option<&str>,
        key_condition: &Item,
        start: Option<Continuation>,
    ) -> Result<Page> {
        let expr = equality_expression(key_condition)?
            .ok_or_else(|| Error::Validation("query needs at least one key condition".into()))?;

        let result = self
            .client
            .query()
            .table_name(table)
            .set_index_name(index.map(|s| s.to_owned()))
            .key_condition_expression(expr.text)
            .set_expression_attribute_names(Some(expr.names))
            .set_expression_attribute_values(Some(expr.values))
            .set_exclusive_start_key(start.map(|c| c.0))
            .send()
            .await
            .map_err(|e| Error::from_sdk("Query", e))?;

        tracing::debug!(table, index = ?index, returned = result.count, "query page");
        into_page(result.items, result.last_evaluated_key)
    }
}
