//! `list-dragons` Lambda function (API Gateway proxy integration).

use dragons::config::Settings;
use dragons_lambda::{handlers, telemetry};
use lambda_http::{Error, Request, run, service_fn};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Error> {
    telemetry::init();

    let service = Arc::new(dragons::aws::connect(Settings::from_env()).await);
    tracing::info!(settings = ?service.settings(), "Initialising list-dragons");

    run(service_fn(move |request: Request| {
        let service = service.clone();
        async move { handlers::list_dragons(&service, request).await }
    }))
    .await
}
