//! Integration tests for the Panel HTTP client

use panel_http::client::error::ClientError;
use panel_http::types::{LoginRequest, RefreshTokenRequest};
use panel_http::{PanelClient, RequestContext};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_client_builder() {
    let client = PanelClient::builder()
        .base_url("http://localhost:3000/")
        .build();

    assert!(client.is_ok());
    let client = client.unwrap();
    assert_eq!(client.base_url(), "http://localhost:3000");
}

#[tokio::test]
async fn test_client_builder_requires_base_url() {
    let result = PanelClient::builder().build();
    assert!(matches!(result, Err(ClientError::Configuration(_))));
}

#[tokio::test]
async fn test_default_json_headers_are_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/routes"))
        .and(header("content-type", "application/json"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let client = PanelClient::new(mock_server.uri()).unwrap();
    let routes: serde_json::Value = client
        .execute(RequestContext::get("/api/routes"))
        .await
        .unwrap();
    assert_eq!(routes, json!([]));
}

#[tokio::test]
async fn test_login_endpoint() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({
            "username": "admin",
            "password": "hunter2"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-1",
            "refresh_token": "refresh-1"
        })))
        .mount(&mock_server)
        .await;

    let client = PanelClient::new(mock_server.uri()).unwrap();
    let response = client
        .login(&LoginRequest {
            username: "admin".into(),
            password: "hunter2".into(),
        })
        .await
        .unwrap();

    assert_eq!(response.access_token, "access-1");
    assert_eq!(response.refresh_token, "refresh-1");
}

#[tokio::test]
async fn test_refresh_endpoint_wire_format() {
    let mock_server = MockServer::start().await;

    // The refresh endpoint expects camelCase.
    Mock::given(method("POST"))
        .and(path("/refresh-token"))
        .and(body_json(json!({ "refreshToken": "refresh-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "access-2" })))
        .mount(&mock_server)
        .await;

    let client = PanelClient::new(mock_server.uri()).unwrap();
    let response = client
        .refresh_token(&RefreshTokenRequest {
            refresh_token: "refresh-1".into(),
        })
        .await
        .unwrap();

    assert_eq!(response.token, "access-2");
}

#[tokio::test]
async fn test_error_handling() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&mock_server)
        .await;

    let client = PanelClient::new(mock_server.uri()).unwrap();
    let result = client
        .login(&LoginRequest {
            username: "admin".into(),
            password: "wrong".into(),
        })
        .await;

    assert!(matches!(result, Err(ClientError::AuthenticationFailed(_))));
}

#[tokio::test]
async fn test_not_found_is_mapped() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such thing"))
        .mount(&mock_server)
        .await;

    let client = PanelClient::new(mock_server.uri()).unwrap();
    let result: Result<serde_json::Value, _> =
        client.execute(RequestContext::get("/api/missing")).await;

    assert!(matches!(result, Err(ClientError::NotFound(_))));
}

#[tokio::test]
async fn test_dispatch_reuses_the_same_context() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/routes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = PanelClient::new(mock_server.uri()).unwrap();
    let ctx = RequestContext::get("/api/routes");

    // Two attempts from one context; builders are rebuilt per dispatch.
    let first = client.dispatch(&ctx).await.unwrap();
    assert!(first.status().is_success());
    let second = client.dispatch(&ctx).await.unwrap();
    assert!(second.status().is_success());
}
