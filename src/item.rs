//! Items and the timestamps we manage on them.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// A stored record: an arbitrary JSON object keyed by its string `id`.
pub type Item = Map<String, Value>;

pub const KEY_ATTR: &str = "id";
pub const CREATED_AT: &str = "createdAt";
pub const UPDATED_AT: &str = "updatedAt";

/// Render a write time the way existing records store it: naive UTC with
/// microseconds, e.g. `2024-03-01T09:30:00.000000`.
pub fn timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

pub fn now_timestamp() -> String {
    timestamp(Utc::now())
}

/// Stamp an item about to be put: `updatedAt` always, `createdAt` only if the
/// caller didn't supply one.
pub fn stamp_for_put(item: &mut Item, now: &str) {
    item.insert(UPDATED_AT.to_owned(), Value::String(now.to_owned()));

    if !item.contains_key(CREATED_AT) {
        item.insert(CREATED_AT.to_owned(), Value::String(now.to_owned()));
    }
}

pub fn stamp_for_update(updates: &mut Item, now: &str) {
    updates.insert(UPDATED_AT.to_owned(), Value::String(now.to_owned()));
}

/// The item's key, if it has a usable one.
pub fn key_of(item: &Item) -> Option<&str> {
    item.get(KEY_ATTR).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn obj(v: Value) -> Item {
        match v {
            Value::Object(m) => m,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn timestamp_format() {
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 5).unwrap();
        assert_eq!(timestamp(t), "2024-03-01T09:30:05.000000");
    }

    #[test]
    fn put_sets_created_at_when_absent() {
        let mut item = obj(json!({ "id": "t1", "name": "Tuesday run" }));
        stamp_for_put(&mut item, "T");
        assert_eq!(item["updatedAt"], "T");
        assert_eq!(item["createdAt"], "T");
    }

    #[test]
    fn put_keeps_supplied_created_at() {
        let mut item = obj(json!({ "id": "t1", "createdAt": "EARLIER", "updatedAt": "OLD" }));
        stamp_for_put(&mut item, "T");
        assert_eq!(item["updatedAt"], "T");
        assert_eq!(item["createdAt"], "EARLIER");
    }

    #[test]
    fn key_must_be_a_string() {
        assert_eq!(key_of(&obj(json!({ "id": "x" }))), Some("x"));
        assert_eq!(key_of(&obj(json!({ "id": 7 }))), None);
        assert_eq!(key_of(&obj(json!({}))), None);
    }
}
