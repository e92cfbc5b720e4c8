//! "Oneshot" version of the basketball platform Lambda.
//!
//! This executable runs one request envelope, given as JSON text on the
//! command line, against the real backends, and prints the result.

use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::env;

use hoops_platform_lambda::Services;

#[tokio::main]
async fn main() -> Result<()> {
    let mut args = env::args();
    args.next(); // skip argv[0]

    let json_text = args.next().ok_or_else(|| {
        anyhow!(r#"first argument should be the JSON envelope, e.g. '{{"action":"scanItems","tableName":"teams"}}'"#)
    })?;
    let payload: Value =
        serde_json::from_str(&json_text).context("envelope argument is not valid JSON")?;

    let svcs = Services::init().await.map_err(|e| anyhow!(e))?;
    let result = svcs.handle_event(payload).await;

    serde_json::to_writer(std::io::stdout().lock(), &result)?;
    println!();
    Ok(())
}
