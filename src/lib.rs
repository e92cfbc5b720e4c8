//! The AWS/Lambda-powered data service for the basketball team platform
//!
//! This library crate implements the one Lambda function that sits between
//! the web front end and DynamoDB. The front end sends a small JSON envelope
//! naming an `action` and a `tableName`; we run the matching store operation
//! and hand back JSON. The same function also proxies place searches to the
//! Naver Local API, so that its credentials stay out of the browser.
//!
//! The code is compiled into three executables: `hoops-platform-lambda-bare`
//! for direct invocation (and the API Gateway "Lambda integration" mode),
//! `hoops-platform-lambda-proxyevent` for API Gateway's "proxy event"
//! framework, and `hoops-platform-lambda-oneshot` for poking at things from
//! the command line.

use aws_config::meta::region::RegionProviderChain;
use lambda_runtime::{tracing, Error as LambdaError};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

pub mod config;
mod dynamo;
pub mod error;
mod expression;
mod handlers;
mod http;
mod item;
#[cfg(test)]
mod memstore;
pub mod request;
pub mod search;
pub mod store;

pub use dynamo::DynamoStore;
pub use item::Item;
pub use search::{NaverSearch, Place, PlaceSearch};
pub use store::Store;

use crate::error::Result;
use crate::request::Request;

pub struct Services<S = DynamoStore, P = NaverSearch> {
    store: S,
    search: P,
}

impl Services {
    /// Create a state object for the platform's Lambda services.
    pub async fn init() -> std::result::Result<Self, LambdaError> {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false) // don't print the module name
            .without_time() // don't print time (CloudWatch has it)
            .init();

        let cfg = config::Config::from_env();

        let region = RegionProviderChain::default_provider().or_else(config::DEFAULT_REGION);
        let aws = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(region)
            .load()
            .await;

        let store = DynamoStore::new(aws_sdk_dynamodb::Client::new(&aws));

        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let search = NaverSearch::new(http, &cfg);

        if cfg.search_credentials.is_none() {
            tracing::warn!("NAVER_CLIENT_ID/NAVER_CLIENT_SECRET unset; place search disabled");
        }

        Ok(Services::new(store, search))
    }
}

impl<S: Store, P: PlaceSearch> Services<S, P> {
    pub fn new(store: S, search: P) -> Self {
        Services { store, search }
    }

    /// Handle one request envelope.
    ///
    /// The envelope is decoded in full before anything else happens, so an
    /// unknown action or a missing field never reaches DynamoDB.
    pub async fn dispatch(&self, payload: Value) -> Result<Value> {
        tracing::debug!(%payload, "envelope");

        let request = Request::from_value(payload)?;
        let action = request.action();
        tracing::info!(action, table = ?request.table_name(), "dispatching");

        let now = item::now_timestamp();
        let store = &self.store;

        let result = match request {
            Request::GetItem(r) => handlers::get_item(store, r).await,
            Request::PutItem(r) => handlers::put_item(store, r, &now).await,
            Request::UpdateItem(r) => handlers::update_item(store, r, &now).await,
            Request::DeleteItem(r) => handlers::delete_item(store, r).await,
            Request::ScanItems(r) => handlers::scan_items(store, r).await,
            Request::Query(r) => handlers::query_items(store, r).await,
            Request::SearchPlace(r) => self
                .search
                .search(&r.query)
                .await
                .map(|places| json!({ "places": places })),
        };

        if let Err(e) = &result {
            tracing::warn!(action, error = %e, "request failed");
        }

        result
    }

    /// Handle a direct invocation.
    ///
    /// With API Gateway's non-proxy "Lambda integration" the event is the
    /// envelope itself, but a mapping template may instead pass along
    /// `httpMethod` and a `body`, possibly still as JSON text. We accept all
    /// of these. An empty `body` means the event is the envelope; any other
    /// `body` that isn't an object is rejected. Failures come back as `{"error": ...}` rather than as a
    /// Lambda error, since that's what the front end reads.
    pub async fn handle_event(&self, event: Value) -> Value {
        if event.get("httpMethod").and_then(Value::as_str) == Some("OPTIONS") {
            return preflight_body();
        }

        let unwrapped = match event.get("body") {
            Some(Value::String(text)) if !text.is_empty() => {
                match serde_json::from_str::<Value>(text) {
                    Ok(v) => Some(v),
                    Err(e) => {
                        return error::Error::Validation(format!("request body is not JSON: {e}"))
                            .to_body()
                    }
                }
            }
            Some(Value::Object(m)) if !m.is_empty() => Some(Value::Object(m.clone())),
            Some(other) if !is_blank(other) => {
                return error::Error::Validation("request body must be a JSON object".to_owned())
                    .to_body()
            }
            _ => None,
        };

        let payload = unwrapped.unwrap_or(event);

        match self.dispatch(payload).await {
            Ok(v) => v,
            Err(e) => e.to_body(),
        }
    }
}

/// Whether an event `body` counts as absent: null, false, zero, or empty.
fn is_blank(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(m) => m.is_empty(),
    }
}

/// What we answer to a CORS preflight.
fn preflight_body() -> Value {
    json!({ "message": "OK" })
}
