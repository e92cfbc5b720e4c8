//! "Proxy event" version of the basketball platform Lambda.
//!
//! This executable defines a server that expects to be interacted with
//! according to AWS API Gateway's "proxy event" protocol. On top of the
//! JSON-in, JSON-out handling of the "bare" version it takes care of CORS and
//! of HTTP status codes.

use lambda_http::{run, service_fn, Error, Request};

use hoops_platform_lambda::Services;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let svcs = Services::init().await?;
    let ref_svcs = &svcs;

    run(service_fn(|req: Request| async move { ref_svcs.respond(req).await })).await?;
    Ok(())
}
