//! Invocation handlers.
//!
//! Handlers take the shared service by reference so tests can drive them
//! with in-memory backends.

use crate::error::Result;
use dragons::domain::{Dragon, DragonFilter};
use dragons::service::DragonService;
use lambda_http::http::{StatusCode, header};
use lambda_http::{Body, Request, RequestExt, Response};
use lambda_runtime::LambdaEvent;

/// CORS header sent with every list response.
pub const ALLOW_ORIGIN_HEADER: &str = "access-control-allow-origin";

/// List dragons matching the request's query-string filters.
///
/// Recognized parameters are `family` and `dragonName`; when a parameter is
/// repeated, its first value is used.
///
/// # Errors
///
/// Propagates catalog failures; nothing is turned into an error response.
pub async fn list_dragons(service: &DragonService, request: Request) -> Result<Response<Body>> {
    let filter = request
        .query_string_parameters_ref()
        .map(|params| DragonFilter::from_lookup(|name| params.first(name)))
        .unwrap_or_default();
    tracing::debug!(?filter, "List request");

    let dragons = service.list(&filter).await?;
    let body = serde_json::to_string(&dragons)?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(ALLOW_ORIGIN_HEADER, "*")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::Text(body))?;
    Ok(response)
}

/// Append the event's dragon to the catalog.
///
/// # Errors
///
/// Propagates catalog failures.
pub async fn add_dragon(service: &DragonService, event: LambdaEvent<Dragon>) -> Result<String> {
    tracing::debug!(request_id = %event.context.request_id, "Add request");
    let message = service.add(event.payload).await?;
    Ok(message.to_string())
}

/// Check that the event's dragon name is not taken yet.
///
/// # Errors
///
/// Returns the duplicate-dragon error when the name exists, and propagates
/// other catalog failures.
pub async fn validate_dragon(
    service: &DragonService,
    event: LambdaEvent<Dragon>,
) -> Result<String> {
    tracing::debug!(request_id = %event.context.request_id, "Validate request");
    let message = service.validate(&event.payload).await?;
    Ok(message.to_string())
}
