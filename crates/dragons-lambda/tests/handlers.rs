//! Integration tests for the Lambda handlers.
//!
//! Handlers run against in-memory backends from the `test-util` feature.

use dragons::config::DataLocation;
use dragons::domain::Dragon;
use dragons::select::{MockSelectBackend, SelectEvent, records_chunk};
use dragons::service::{DragonService, test_service};
use dragons::store::InMemoryObjectStore;
use dragons_lambda::handlers::{ALLOW_ORIGIN_HEADER, add_dragon, list_dragons, validate_dragon};
use dragons_lambda::FunctionError;
use lambda_http::{Body, Request, RequestExt};
use lambda_runtime::{Context, Diagnostic, LambdaEvent};
use rstest::rstest;
use std::collections::HashMap;
use std::sync::Arc;

fn location() -> DataLocation {
    DataLocation::new("dragon-data", "dragon_stats_one.txt")
}

fn red(name: &str) -> Dragon {
    Dragon {
        family: Some("Red".to_string()),
        ..Dragon::named(name)
    }
}

fn list_service(backend: Arc<MockSelectBackend>) -> DragonService {
    test_service(&location(), backend, Arc::new(InMemoryObjectStore::new()))
}

fn body_text(body: &Body) -> &str {
    match body {
        Body::Text(text) => text,
        other => panic!("expected text body, got {other:?}"),
    }
}

fn event(dragon: Dragon) -> LambdaEvent<Dragon> {
    LambdaEvent::new(dragon, Context::default())
}

#[tokio::test]
async fn list_returns_json_array_with_cors_header() {
    let backend = Arc::new(MockSelectBackend::with_chunks(&[
        &[red("Atlas"), red("Bahamethut")],
        &[red("Cinder")],
    ]));
    let service = list_service(backend);

    let response = list_dragons(&service, Request::default()).await.unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()[ALLOW_ORIGIN_HEADER], "*");
    assert_eq!(response.headers()["content-type"], "application/json");
    let dragons: Vec<Dragon> = serde_json::from_str(body_text(response.body())).unwrap();
    assert_eq!(dragons, vec![red("Atlas"), red("Bahamethut"), red("Cinder")]);
}

#[tokio::test]
async fn list_without_matches_returns_empty_array() {
    let backend = Arc::new(MockSelectBackend::new(vec![SelectEvent::End]));
    let service = list_service(backend);

    let response = list_dragons(&service, Request::default()).await.unwrap();
    assert_eq!(body_text(response.body()), "[]");
}

#[rstest]
#[case::none(&[], "select * from S3Object[*][*] s")]
#[case::family(&[("family", "Red")], "select * from S3Object[*][*] s where s.family_str = 'Red'")]
#[case::name(&[("dragonName", "Bahamethut")], "select * from S3Object[*][*] s where s.dragon_name_str = 'Bahamethut'")]
#[case::both(
    &[("family", "Red"), ("dragonName", "Bahamethut")],
    "select * from S3Object[*][*] s where s.family_str = 'Red' or s.dragon_name_str = 'Bahamethut'"
)]
#[tokio::test]
async fn list_translates_query_string(#[case] pairs: &[(&str, &str)], #[case] expected: &str) {
    let backend = Arc::new(MockSelectBackend::default());
    let service = list_service(backend.clone());
    let params: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    let request = Request::default().with_query_string_parameters(params);

    list_dragons(&service, request).await.unwrap();

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].expression, expected);
    assert_eq!(requests[0].location, location());
}

#[tokio::test]
async fn list_propagates_decode_failures() {
    let backend = Arc::new(MockSelectBackend::new(vec![SelectEvent::Records(
        b"{\"dragon_name_str\": \"Atlas\"\n".to_vec(),
    )]));
    let service = list_service(backend);

    let err = list_dragons(&service, Request::default()).await.unwrap_err();
    assert_eq!(err.error_type(), "DecodeError");
}

#[tokio::test]
async fn add_writes_the_extended_document() {
    let store = Arc::new(InMemoryObjectStore::with_object(
        &location(),
        serde_json::to_vec(&[red("Atlas"), red("Bahamethut")]).unwrap(),
    ));
    let service = test_service(&location(), Arc::new(MockSelectBackend::default()), store.clone());

    let message = add_dragon(&service, event(red("Cinder"))).await.unwrap();
    assert_eq!(message, "Dragon added");

    let dragons: Vec<Dragon> = serde_json::from_slice(&store.object(&location()).unwrap()).unwrap();
    assert_eq!(dragons, vec![red("Atlas"), red("Bahamethut"), red("Cinder")]);
}

#[tokio::test]
async fn add_event_decodes_from_wire_json() {
    let payload: Dragon = serde_json::from_str(
        r#"{"dragon_name_str":"Cinder","family_str":"Blue","location_city_str":"Boise"}"#,
    )
    .unwrap();
    let store = Arc::new(InMemoryObjectStore::with_object(&location(), "[]"));
    let service = test_service(&location(), Arc::new(MockSelectBackend::default()), store.clone());

    add_dragon(&service, event(payload)).await.unwrap();

    let body = String::from_utf8(store.object(&location()).unwrap()).unwrap();
    assert_eq!(
        body,
        r#"[{"dragon_name_str":"Cinder","family_str":"Blue","location_city_str":"Boise"}]"#
    );
}

#[tokio::test]
async fn validate_passes_for_new_name() {
    let backend = Arc::new(MockSelectBackend::new(vec![SelectEvent::Progress, SelectEvent::End]));
    let service = list_service(backend);

    let message = validate_dragon(&service, event(red("Cinder"))).await.unwrap();
    assert_eq!(message, "Dragon validated");
}

#[tokio::test]
async fn validate_fails_with_catchable_error_type() {
    let backend = Arc::new(MockSelectBackend::new(vec![records_chunk(&[red("Atlas")])]));
    let service = list_service(backend);

    let err = validate_dragon(&service, event(red("Atlas"))).await.unwrap_err();
    assert!(matches!(
        err,
        FunctionError::Dragons(dragons::Error::DuplicateDragon(_))
    ));

    let diagnostic: Diagnostic = err.into();
    assert_eq!(diagnostic.error_type, "DragonValidationError");
    assert_eq!(diagnostic.error_message, "Duplicate dragon reported");
}
