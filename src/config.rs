//! Runtime configuration, all of it sourced from the Lambda environment.

use std::env;

pub const DEFAULT_REGION: &str = "ap-northeast-2";

pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://openapi.naver.com/v1/search/local.json";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SearchCredentials {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    /// `None` if either credential is unset; place searches then fail.
    pub search_credentials: Option<SearchCredentials>,
    pub search_endpoint: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let nonempty = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let search_credentials = match (
            nonempty("NAVER_CLIENT_ID"),
            nonempty("NAVER_CLIENT_SECRET"),
        ) {
            (Some(client_id), Some(client_secret)) => Some(SearchCredentials {
                client_id,
                client_secret,
            }),
            _ => None,
        };

        let search_endpoint = nonempty("PLACE_SEARCH_ENDPOINT")
            .unwrap_or_else(|| DEFAULT_SEARCH_ENDPOINT.to_owned());

        Config {
            search_credentials,
            search_endpoint,
        }
    }
}
