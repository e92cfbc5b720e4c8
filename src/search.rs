//! The place search service.
//!
//! A thin adapter over the Naver Local search API, which the front end uses
//! to pick courts on a map. Naver reports coordinates as WGS84 degrees times
//! 10^7, in strings, and wraps matched words in the title with `<b>` tags.

use async_trait::async_trait;
use lambda_runtime::tracing;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{Config, SearchCredentials};
use crate::error::{Error, Result};

/// How many results we ask Naver for. This is the API's maximum.
const DISPLAY: usize = 10;

const COORDINATE_SCALE: f64 = 10_000_000.0;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: String,
    pub name: String,
    pub address: String,
    pub road_address: String,
    pub category: String,
    pub link: String,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SearchItem {
    title: String,
    link: String,
    category: String,
    address: String,
    road_address: String,
    mapx: Option<Value>,
    mapy: Option<Value>,
}

#[async_trait]
pub trait PlaceSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<Place>>;
}

pub struct NaverSearch {
    http: reqwest::Client,
    endpoint: String,
    credentials: Option<SearchCredentials>,
}

impl NaverSearch {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        NaverSearch {
            http,
            endpoint: config.search_endpoint.clone(),
            credentials: config.search_credentials.clone(),
        }
    }

    fn url(&self, query: &str) -> String {
        format!(
            "{}?query={}&display={DISPLAY}&start=1&sort=random",
            self.endpoint,
            urlencoding::encode(query)
        )
    }
}

#[async_trait]
impl PlaceSearch for NaverSearch {
    async fn search(&self, query: &str) -> Result<Vec<Place>> {
        let creds = self.credentials.as_ref().ok_or_else(|| {
            Error::Upstream("place search credentials are not configured".to_owned())
        })?;

        let url = self.url(query);
        tracing::debug!(query, url, "searching places");

        let resp = self
            .http
            .get(&url)
            .header("X-Naver-Client-Id", &creds.client_id)
            .header("X-Naver-Client-Secret", &creds.client_secret)
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("place search request failed: {e}")))?;

        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body, "place search rejected");
            return Err(Error::Upstream(format!(
                "place search HTTP error: {}",
                status.as_u16()
            )));
        }

        let parsed: SearchResponse = resp
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("unreadable place search response: {e}")))?;

        let places = parse_places(parsed);
        tracing::debug!(n = places.len(), "parsed places");
        Ok(places)
    }
}

/// Naver sends these as strings, but accept JSON integers too.
fn fixed_point_degrees(v: Option<&Value>) -> Option<f64> {
    let raw = match v? {
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        Value::Number(n) => n.as_i64()?,
        _ => return None,
    };

    Some(raw as f64 / COORDINATE_SCALE)
}

fn strip_emphasis(title: &str) -> String {
    title.replace("<b>", "").replace("</b>", "")
}

fn parse_places(resp: SearchResponse) -> Vec<Place> {
    let mut places = Vec::with_capacity(resp.items.len());

    for item in resp.items {
        let name = strip_emphasis(&item.title);

        let (Some(lng), Some(lat)) = (
            fixed_point_degrees(item.mapx.as_ref()),
            fixed_point_degrees(item.mapy.as_ref()),
        ) else {
            tracing::warn!(place = %name, "dropping place without usable coordinates");
            continue;
        };

        let id = if item.link.is_empty() {
            format!("place-{}", places.len())
        } else {
            item.link.clone()
        };

        let road_address = if item.road_address.is_empty() {
            item.address.clone()
        } else {
            item.road_address
        };

        places.push(Place {
            id,
            name,
            address: item.address,
            road_address,
            category: item.category,
            link: item.link,
            lat,
            lng,
        });
    }

    places
}
