//! `add-dragon` Lambda function.

use dragons::config::Settings;
use dragons::domain::Dragon;
use dragons_lambda::{handlers, telemetry};
use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Error> {
    telemetry::init();

    let service = Arc::new(dragons::aws::connect(Settings::from_env()).await);
    tracing::info!(settings = ?service.settings(), "Initialising add-dragon");

    run(service_fn(move |event: LambdaEvent<Dragon>| {
        let service = service.clone();
        async move { handlers::add_dragon(&service, event).await }
    }))
    .await
}
