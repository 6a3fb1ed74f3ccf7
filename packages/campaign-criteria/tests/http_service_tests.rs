//! HTTP binding tests against a local mock server.

use campaign_criteria::{
    build_operations, ApiError, CampaignId, Criterion, CriterionType, HttpMutationService,
    MutationResult, MutationService, ServiceConfig, ServiceError, TransportError,
};
use serde_json::json;
use wiremock::matchers::{bearer_token, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MUTATE_PATH: &str = "/v201502/CampaignCriterionService/mutate";

fn service(server: &MockServer) -> HttpMutationService {
    HttpMutationService::new(
        ServiceConfig::new("dev-token")
            .with_endpoint(server.uri())
            .with_client_customer_id("555-555-5555")
            .with_access_token("ya29.test"),
    )
}

fn operations() -> Vec<campaign_criteria::Operation> {
    build_operations(
        &CampaignId::from(123),
        &[Criterion::location(21137)],
        Some("http://mars.google.com"),
    )
    .unwrap()
}

#[tokio::test]
async fn test_posts_batch_with_credentials_and_decodes_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MUTATE_PATH))
        .and(bearer_token("ya29.test"))
        .and(header("developer-token", "dev-token"))
        .and(header("client-customer-id", "555-555-5555"))
        .and(body_partial_json(json!({
            "operations": [
                {
                    "operator": "ADD",
                    "operand": {
                        "xsi_type": "CampaignCriterion",
                        "campaignId": "123",
                        "criterion": { "xsi_type": "Location", "id": 21137 }
                    }
                },
                {
                    "operator": "ADD",
                    "operand": {
                        "xsi_type": "NegativeCampaignCriterion",
                        "campaignId": "123",
                        "criterion": { "xsi_type": "Placement", "url": "http://mars.google.com" }
                    }
                }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                { "campaignId": "123", "criterion": { "id": "21137", "type": "LOCATION" } },
                {
                    "campaignId": "123",
                    "isNegative": true,
                    "criterion": { "id": "88", "type": "PLACEMENT", "url": "http://mars.google.com" }
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = service(&server).mutate(&operations()).await.unwrap();

    assert_eq!(
        response.value,
        vec![
            MutationResult::new(123, 21137, CriterionType::Location),
            MutationResult::new(123, 88, CriterionType::Placement)
                .negative()
                .with_url("http://mars.google.com"),
        ]
    );
}

#[tokio::test]
async fn test_api_fault_becomes_validation_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MUTATE_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "Invalid criterion",
            "errors": [ { "field": "url", "reason": "malformed" } ]
        })))
        .mount(&server)
        .await;

    let err = service(&server).mutate(&operations()).await.unwrap_err();

    let ServiceError::Api(ApiError::Validation(validation)) = err else {
        panic!("expected validation error, got {:?}", err);
    };
    assert_eq!(validation.message, "Invalid criterion");
    assert_eq!(
        validation.violations[0].iter().collect::<Vec<_>>(),
        vec![("field", "url"), ("reason", "malformed")]
    );
}

#[tokio::test]
async fn test_fault_body_with_ok_status_is_unclassified() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MUTATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Invalid criterion",
            "errors": [ { "field": "url", "reason": "malformed" } ]
        })))
        .mount(&server)
        .await;

    let err = service(&server).mutate(&operations()).await.unwrap_err();

    assert!(matches!(err, ServiceError::Unclassified(_)));
}

#[tokio::test]
async fn test_server_fault_becomes_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "Backend error",
            "errors": [ { "reason": "INTERNAL" } ]
        })))
        .mount(&server)
        .await;

    let err = service(&server).mutate(&operations()).await.unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Api(ApiError::Transport(TransportError::Status { status: 500, .. }))
    ));
}

#[tokio::test]
async fn test_unauthorized_becomes_authorization_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_token"))
        .mount(&server)
        .await;

    let err = service(&server).mutate(&operations()).await.unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Api(ApiError::Authorization { message }) if message == "invalid_token"
    ));
}

#[tokio::test]
async fn test_gateway_failure_becomes_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let err = service(&server).mutate(&operations()).await.unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Api(ApiError::Transport(TransportError::Status { status: 503, .. }))
    ));
}

#[tokio::test]
async fn test_missing_access_token_fails_before_sending() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let service =
        HttpMutationService::new(ServiceConfig::new("dev-token").with_endpoint(server.uri()));
    let err = service.mutate(&operations()).await.unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Api(ApiError::Authorization { .. })
    ));
}

#[tokio::test]
async fn test_unreachable_endpoint_becomes_transport_error() {
    let service = HttpMutationService::new(
        ServiceConfig::new("dev-token")
            .with_endpoint("http://127.0.0.1:1")
            .with_access_token("ya29.test"),
    );

    let err = service.mutate(&operations()).await.unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Api(ApiError::Transport(TransportError::Request(_)))
    ));
}
