//! "Bare" version of the basketball platform Lambda.
//!
//! The event is the request envelope itself, which is what API Gateway's
//! non-proxy "Lambda integration" delivers and what direct invocations send.
//! This is also the easy one to interact with locally.

use lambda_runtime::{run, service_fn, tracing, Error, LambdaEvent};
use serde_json::Value;

use hoops_platform_lambda::Services;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let svcs = Services::init().await?;
    let ref_svcs = &svcs;

    run(service_fn(|event: LambdaEvent<Value>| async move {
        let (payload, context) = event.into_parts();
        tracing::debug!(
            request_id = %context.request_id,
            function = %context.env_config.function_name,
            "invoked"
        );
        Ok::<Value, Error>(ref_svcs.handle_event(payload).await)
    }))
    .await?;
    Ok(())
}
