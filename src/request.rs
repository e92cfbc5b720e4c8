//! Decoding of the request envelope.
//!
//! The front end sends a loose JSON object with an `action` tag. We turn that
//! into a typed request up front so that a missing field is reported before we
//! touch DynamoDB, instead of surfacing as whatever the SDK makes of it.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::item::Item;

const ACTIONS: &[&str] = &[
    "getItem",
    "putItem",
    "updateItem",
    "deleteItem",
    "scanItems",
    "query",
    "searchPlace",
];

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    GetItem(KeyRequest),
    PutItem(PutRequest),
    UpdateItem(UpdateRequest),
    DeleteItem(KeyRequest),
    ScanItems(ScanRequest),
    Query(QueryRequest),
    SearchPlace(SearchRequest),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyRequest {
    pub table_name: String,
    pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutRequest {
    pub table_name: String,
    pub item: Item,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    pub table_name: String,
    pub id: String,
    pub updates: Item,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    pub table_name: String,
    #[serde(default)]
    pub filters: Option<Item>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub table_name: String,
    #[serde(default)]
    pub index_name: Option<String>,
    pub key_condition: Item,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

impl Request {
    pub fn from_value(payload: Value) -> Result<Self> {
        let action = match payload.get("action") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => return Err(Error::Validation(format!("Unknown action: {other}"))),
            None => return Err(Error::Validation("Unknown action: null".to_owned())),
        };

        if !ACTIONS.contains(&action.as_str()) {
            return Err(Error::Validation(format!("Unknown action: {action}")));
        }

        serde_json::from_value(payload)
            .map_err(|e| Error::Validation(format!("invalid `{action}` request: {e}")))
    }

    pub fn action(&self) -> &'static str {
        match self {
            Request::GetItem(_) => "getItem",
            Request::PutItem(_) => "putItem",
            Request::UpdateItem(_) => "updateItem",
            Request::DeleteItem(_) => "deleteItem",
            Request::ScanItems(_) => "scanItems",
            Request::Query(_) => "query",
            Request::SearchPlace(_) => "searchPlace",
        }
    }

    pub fn table_name(&self) -> Option<&str> {
        match self {
            Request::GetItem(r) | Request::DeleteItem(r) => Some(&r.table_name),
            Request::PutItem(r) => Some(&r.table_name),
            Request::UpdateItem(r) => Some(&r.table_name),
            Request::ScanItems(r) => Some(&r.table_name),
            Request::Query(r) => Some(&r.table_name),
            Request::SearchPlace(_) => None,
        }
    }
}

impl QueryRequest {
    /// An empty index name means the table's primary key.
    pub fn index(&self) -> Option<&str> {
        self.index_name.as_deref().filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(r: Result<Request>) -> String {
        match r {
            Err(Error::Validation(m)) => m,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn decodes_update() {
        let req = Request::from_value(json!({
            "action": "updateItem",
            "tableName": "basketball-teams",
            "id": "team-1",
            "updates": { "name": "Night Owls" },
        }))
        .unwrap();

        match req {
            Request::UpdateItem(u) => {
                assert_eq!(u.table_name, "basketball-teams");
                assert_eq!(u.id, "team-1");
                assert_eq!(u.updates["name"], "Night Owls");
            }
            other => panic!("wrong variant {other:?}"),
        }
    }

    #[test]
    fn scan_filters_are_optional() {
        let req = Request::from_value(json!({ "action": "scanItems", "tableName": "t" })).unwrap();
        assert!(matches!(req, Request::ScanItems(ScanRequest { filters: None, .. })));

        let req = Request::from_value(json!({
            "action": "scanItems", "tableName": "t", "filters": null,
        }))
        .unwrap();
        assert!(matches!(req, Request::ScanItems(ScanRequest { filters: None, .. })));
    }

    #[test]
    fn empty_index_name_means_primary_key() {
        let req = Request::from_value(json!({
            "action": "query",
            "tableName": "sessions",
            "indexName": "",
            "keyCondition": { "teamId": "team-1" },
        }))
        .unwrap();

        match req {
            Request::Query(q) => assert_eq!(q.index(), None),
            other => panic!("wrong variant {other:?}"),
        }
    }

    #[test]
    fn search_ignores_table_name() {
        let req = Request::from_value(json!({
            "action": "searchPlace", "tableName": "unused", "query": "강남 농구장",
        }))
        .unwrap();
        assert_eq!(req.action(), "searchPlace");
        assert_eq!(req.table_name(), None);
    }

    #[test]
    fn unknown_action_is_named() {
        let m = message(Request::from_value(json!({ "action": "dropTable", "tableName": "t" })));
        assert_eq!(m, "Unknown action: dropTable");
    }

    #[test]
    fn missing_action_reads_as_unknown() {
        let m = message(Request::from_value(json!({ "tableName": "t" })));
        assert_eq!(m, "Unknown action: null");

        let m = message(Request::from_value(json!({ "action": null, "tableName": "t" })));
        assert_eq!(m, "Unknown action: null");
    }

    #[test]
    fn missing_required_field() {
        let m = message(Request::from_value(json!({ "action": "getItem", "tableName": "t" })));
        assert!(m.starts_with("invalid `getItem` request"), "{m}");
    }
}
