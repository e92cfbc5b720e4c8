//! The six store operations.
//!
//! Each handler makes one class of store call and shapes the JSON result the
//! front end expects. Write times are passed in so that stamping is
//! deterministic under test.

use lambda_runtime::tracing;
use serde_json::{json, Value};

use crate::error::{Error, Result};
use crate::item::{self, Item, KEY_ATTR};
use crate::request::{KeyRequest, PutRequest, QueryRequest, ScanRequest, UpdateRequest};
use crate::store::{read_all_pages, Store};

pub async fn get_item<S: Store + ?Sized>(store: &S, req: KeyRequest) -> Result<Value> {
    match store.get_item(&req.table_name, &req.id).await? {
        Some(item) => Ok(json!({ "item": item })),
        None => Err(Error::NotFound("Item not found".to_owned())),
    }
}

pub async fn put_item<S: Store + ?Sized>(store: &S, req: PutRequest, now: &str) -> Result<Value> {
    let mut item = req.item;

    if item::key_of(&item).is_none() {
        return Err(Error::Validation(format!(
            "item needs a string `{KEY_ATTR}` attribute"
        )));
    }

    item::stamp_for_put(&mut item, now);
    store.put_item(&req.table_name, &item).await?;

    Ok(json!({
        "message": "Item saved successfully",
        "item": item,
    }))
}

pub async fn update_item<S: Store + ?Sized>(
    store: &S,
    req: UpdateRequest,
    now: &str,
) -> Result<Value> {
    let mut updates = req.updates;

    if updates.contains_key(KEY_ATTR) {
        return Err(Error::Validation(format!(
            "cannot update the key attribute `{KEY_ATTR}`"
        )));
    }

    item::stamp_for_update(&mut updates, now);
    let item = store.update_item(&req.table_name, &req.id, &updates).await?;
    Ok(json!({ "item": item }))
}

pub async fn delete_item<S: Store + ?Sized>(store: &S, req: KeyRequest) -> Result<Value> {
    store.delete_item(&req.table_name, &req.id).await?;
    Ok(json!({ "message": "Item deleted successfully" }))
}

pub async fn scan_items<S: Store + ?Sized>(store: &S, req: ScanRequest) -> Result<Value> {
    let filters = req.filters.unwrap_or_default();
    let table = req.table_name.as_str();
    let filters_ref = &filters;

    let items =
        read_all_pages(move |start| store.scan_page(table, filters_ref, start)).await?;

    tracing::info!(table, count = items.len(), "scan complete");
    Ok(listing(items))
}

pub async fn query_items<S: Store + ?Sized>(store: &S, req: QueryRequest) -> Result<Value> {
    if req.key_condition.is_empty() {
        return Err(Error::Validation(
            "`keyCondition` needs at least one attribute".to_owned(),
        ));
    }

    let table = req.table_name.as_str();
    let index = req.index();
    let key_condition = &req.key_condition;

    let items =
        read_all_pages(move |start| store.query_page(table, index, key_condition, start)).await?;

    tracing::info!(table, index = ?index, count = items.len(), "query complete");
    Ok(listing(items))
}

fn listing(items: Vec<Item>) -> Value {
    let count = items.len();
    json!({ "items": items, "count": count })
}
