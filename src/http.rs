//! The API Gateway "proxy event" front door.
//!
//! Here we own the HTTP envelope: CORS headers on every response, preflight
//! requests answered without looking at the body, and a status code chosen
//! from the error kind.

use lambda_http::{
    http::{header::CONTENT_TYPE, Method},
    Body, Error, Request, Response,
};
use lambda_runtime::tracing;
use serde_json::Value;

use crate::{error, preflight_body, PlaceSearch, Services, Store};

const CORS_HEADERS: &[(&str, &str)] = &[
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "POST, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type"),
];

fn json_response(status: u16, body: &Value) -> Result<Response<Body>, Error> {
    let mut builder = Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json");

    for (name, value) in CORS_HEADERS {
        builder = builder.header(*name, *value);
    }

    Ok(builder
        .body(Body::Text(body.to_string()))
        .map_err(Box::new)?)
}

impl<S: Store, P: PlaceSearch> Services<S, P> {
    /// Handle one proxy-event request.
    pub async fn respond(&self, req: Request) -> Result<Response<Body>, Error> {
        if req.method() == Method::OPTIONS {
            return json_response(200, &preflight_body());
        }

        let payload: Value = match serde_json::from_slice(req.body().as_ref()) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "unparseable request body");
                let err = error::Error::Validation(format!("request body is not JSON: {e}"));
                return json_response(err.status_code(), &err.to_body());
            }
        };

        match self.dispatch(payload).await {
            Ok(v) => json_response(200, &v),
            Err(e) => json_response(e.status_code(), &e.to_body()),
        }
    }
}
