//! An in-memory `Store` for tests.
//!
//! Tables are ordered by `id`, pages are cut at a fixed size, and the
//! continuation marker is the last `id` read, much like DynamoDB's own
//! `LastEvaluatedKey`. Every call is counted.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use serde_json::Value;
use std::{
    collections::{BTreeMap, HashMap},
    ops::Bound,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

use crate::error::{Error, Result};
use crate::item::{Item, KEY_ATTR};
use crate::store::{Continuation, Page, Store};

type Table = BTreeMap<String, Item>;

pub struct MemStore {
    tables: Mutex<HashMap<String, Table>>,
    page_size: usize,
    calls: AtomicUsize,
}

impl MemStore {
    pub fn new(page_size: usize) -> Self {
        MemStore {
            tables: Mutex::new(HashMap::new()),
            page_size,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Seed an item without counting it as a call.
    pub fn insert(&self, table: &str, item: Item) {
        let id = item[KEY_ATTR].as_str().unwrap().to_owned();
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_owned())
            .or_default()
            .insert(id, item);
    }

    fn count(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn page<P>(&self, table: &str, start: Option<Continuation>, keep: P) -> Result<Page>
    where
        P: Fn(&Item) -> bool,
    {
        let tables = self.tables.lock().unwrap();
        let table = tables
            .get(table)
            .ok_or_else(|| Error::NotFound(format!("no such table `{table}`")))?;

        let lower = match start {
            Some(Continuation(key)) => match key.get(KEY_ATTR) {
                Some(AttributeValue::S(id)) => Bound::Excluded(id.clone()),
                _ => return Err(Error::Validation("bad continuation marker".into())),
            },
            None => Bound::Unbounded,
        };

        // Like DynamoDB, the page limit applies before filtering, and a full
        // page always carries a marker even when nothing follows it.
        let window: Vec<(&String, &Item)> = table
            .range((lower, Bound::Unbounded))
            .take(self.page_size)
            .collect();

        let next = match window.last() {
            Some((id, _)) if window.len() == self.page_size => {
                let mut key = HashMap::new();
                key.insert(KEY_ATTR.to_owned(), AttributeValue::S((*id).clone()));
                Some(Continuation(key))
            }
            _ => None,
        };

        Ok(Page {
            items: window
                .into_iter()
                .map(|(_, item)| item)
                .filter(|item| keep(item))
                .cloned()
                .collect(),
            next,
        })
    }
}

fn matches(item: &Item, conditions: &Item) -> bool {
    conditions
        .iter()
        .all(|(name, value)| item.get(name) == Some(value))
}

#[async_trait]
impl Store for MemStore {
    async fn get_item(&self, table: &str, id: &str) -> Result<Option<Item>> {
        self.count();
        let tables = self.tables.lock().unwrap();
        Ok(tables.get(table).and_then(|t| t.get(id)).cloned())
    }

    async fn put_item(&self, table: &str, item: &Item) -> Result<()> {
        self.count();
        let id = item
            .get(KEY_ATTR)
            .and_then(Value::as_str)
            .ok_or_else(|| Error::Validation("missing key".into()))?;
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_owned())
            .or_default()
            .insert(id.to_owned(), item.clone());
        Ok(())
    }

    async fn update_item(&self, table: &str, id: &str, updates: &Item) -> Result<Item> {
        self.count();
        let mut tables = self.tables.lock().unwrap();
        let item = tables
            .entry(table.to_owned())
            .or_default()
            .entry(id.to_owned())
            .or_insert_with(|| {
                let mut fresh = Item::new();
                fresh.insert(KEY_ATTR.to_owned(), Value::String(id.to_owned()));
                fresh
            });

        for (name, value) in updates {
            item.insert(name.clone(), value.clone());
        }

        Ok(item.clone())
    }

    async fn delete_item(&self, table: &str, id: &str) -> Result<()> {
        self.count();
        if let Some(t) = self.tables.lock().unwrap().get_mut(table) {
            t.remove(id);
        }
        Ok(())
    }

    async fn scan_page(
        &self,
        table: &str,
        filters: &Item,
        start: Option<Continuation>,
    ) -> Result<Page> {
        self.count();
        self.page(table, start, |item| matches(item, filters))
    }

    async fn query_page(
        &self,
        table: &str,
        _index: Option<&str>,
        key_condition: &Item,
        start: Option<Continuation>,
    ) -> Result<Page> {
        self.count();
        if key_condition.is_empty() {
            return Err(Error::Validation("query needs at least one key condition".into()));
        }
        self.page(table, start, |item| matches(item, key_condition))
    }
}
