//! The key-value store seam.
//!
//! Handlers talk to this trait rather than to `aws_sdk_dynamodb::Client`
//! directly, so that the pagination and dispatch logic can be exercised
//! against an in-memory table. The trait stays close to the six DynamoDB
//! calls we make; `DynamoStore` is the real implementation.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use std::{collections::HashMap, future::Future};

use crate::error::Result;
use crate::item::Item;

/// An opaque continuation marker (DynamoDB's `LastEvaluatedKey`).
#[derive(Clone, Debug)]
pub struct Continuation(pub HashMap<String, AttributeValue>);

/// One page of a scan or query.
#[derive(Debug)]
pub struct Page {
    pub items: Vec<Item>,
    pub next: Option<Continuation>,
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn get_item(&self, table: &str, id: &str) -> Result<Option<Item>>;

    async fn put_item(&self, table: &str, item: &Item) -> Result<()>;

    /// Apply `updates` as attribute assignments and return the item as it
    /// stands afterwards.
    async fn update_item(&self, table: &str, id: &str, updates: &Item) -> Result<Item>;

    async fn delete_item(&self, table: &str, id: &str) -> Result<()>;

    /// Read one page of a table, keeping items whose attributes equal every
    /// entry of `filters`.
    async fn scan_page(
        &self,
        table: &str,
        filters: &Item,
        start: Option<Continuation>,
    ) -> Result<Page>;

    /// Read one page of items matching `key_condition`, on `index` if given,
    /// else on the table's primary key.
    async fn query_page(
        &self,
        table: &str,
        index: Option<&str>,
        key_condition: &Item,
        start: Option<Continuation>,
    ) -> Result<Page>;
}

/// Follow continuation markers until the store stops returning one,
/// collecting every page's items in order.
///
/// An error from any page aborts the whole read.
pub async fn read_all_pages<F, Fut>(mut fetch: F) -> Result<Vec<Item>>
where
    F: FnMut(Option<Continuation>) -> Fut,
    Fut: Future<Output = Result<Page>>,
{
    let mut items = Vec::new();
    let mut start = None;

    loop {
        let page = fetch(start).await?;
        items.extend(page.items);

        match page.next {
            Some(c) => start = Some(c),
            None => break,
        }
    }

    Ok(items)
}
