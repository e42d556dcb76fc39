#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use jaalee_api::{ApiClient, Error, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup(account: &str) -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = ApiClient::with_base_url(base_url, account, &TransportConfig::default()).unwrap();
    (server, client)
}

fn secret(s: &str) -> SecretString {
    s.to_string().into()
}

// ── Verification code tests ─────────────────────────────────────────

#[tokio::test]
async fn test_request_code_success() {
    let (server, client) = setup("a@b.com").await;

    Mock::given(method("GET"))
        .and(path("/code"))
        .and(query_param("account", "a@b.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": 0 })))
        .mount(&server)
        .await;

    client.request_code().await.unwrap();
}

#[tokio::test]
async fn test_request_code_rejected_envelope() {
    let (server, client) = setup("a@b.com").await;

    Mock::given(method("GET"))
        .and(path("/code"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "code": 7, "message": "unknown account" })),
        )
        .mount(&server)
        .await;

    let result = client.request_code().await;

    match result {
        Err(Error::Api { code, ref message }) => {
            assert_eq!(code, 7);
            assert!(message.contains("unknown account"));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_request_code_transport_failure() {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = ApiClient::with_base_url(base_url, "a@b.com", &TransportConfig::default()).unwrap();

    // Dropping the server refuses subsequent connections.
    drop(server);

    let result = client.request_code().await;
    match result {
        Err(ref e @ Error::Transport(_)) => {
            assert!(e.is_transient(), "connection failures are transient");
            assert!(!e.is_auth_expired());
        }
        other => panic!("expected Transport error, got: {other:?}"),
    }
}

// ── Login tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_success_stores_token() {
    let (server, client) = setup("a@b.com").await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_partial_json(json!({
            "account": "a@b.com",
            "code": "123456",
            "timeZone": "Europe/Berlin",
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "code": 0, "data": { "token": "T1" } })),
        )
        .mount(&server)
        .await;

    assert!(client.token().is_none());

    let token = client.login("123456", "Europe/Berlin").await.unwrap();

    assert_eq!(token.expose_secret(), "T1");
    assert_eq!(client.token().unwrap().expose_secret(), "T1");
}

#[tokio::test]
async fn test_login_rejected() {
    let (server, client) = setup("a@b.com").await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "code": 2, "message": "invalid verification code" })),
        )
        .mount(&server)
        .await;

    let result = client.login("000000", "UTC").await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
    assert!(client.token().is_none(), "failed login must not store a token");
}

#[tokio::test]
async fn test_login_success_without_token_payload() {
    let (server, client) = setup("a@b.com").await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": 0, "data": {} })))
        .mount(&server)
        .await;

    let result = client.login("123456", "UTC").await;

    assert!(
        matches!(result, Err(Error::Deserialization { .. }) | Err(Error::Authentication { .. })),
        "expected failure on tokenless success envelope, got: {result:?}"
    );
}

// ── Device data tests ───────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_all_rekeys_by_mac() {
    let (server, client) = setup("a@b.com").await;

    let envelope = json!({
        "code": 0,
        "data": [
            {
                "mac": "AA",
                "alias": "Kitchen",
                "type": "F525",
                "temperature": "21.34",
                "humidity": "55.6"
            },
            {
                "mac": "BB",
                "type": "F526",
                "temperature": 18.0,
                "power": 87
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/data/all"))
        .and(header("Authorization", "T1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&envelope))
        .mount(&server)
        .await;

    let client = client.with_token(secret("T1"));
    let devices = client.fetch_all().await.unwrap();

    assert_eq!(devices.len(), 2);
    for (mac, record) in &devices {
        assert_eq!(mac, &record.mac, "map key must match record MAC");
    }
    let kitchen = &devices["AA"];
    assert_eq!(kitchen.display_name(), "Kitchen");
    assert_eq!(kitchen.model_code.as_deref(), Some("F525"));
    assert_eq!(devices["BB"].display_name(), "BB");
}

#[tokio::test]
async fn test_fetch_all_without_token_issues_no_request() {
    let (server, client) = setup("a@b.com").await;

    Mock::given(method("GET"))
        .and(path("/data/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": 0, "data": [] })))
        .expect(0)
        .mount(&server)
        .await;

    let result = client.fetch_all().await;

    assert!(
        matches!(result, Err(Error::MissingToken)),
        "expected MissingToken, got: {result:?}"
    );
}

#[tokio::test]
async fn test_fetch_all_token_expired_is_distinct() {
    let (server, client) = setup("a@b.com").await;

    Mock::given(method("GET"))
        .and(path("/data/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": 3 })))
        .mount(&server)
        .await;

    let client = client.with_token(secret("stale"));
    let result = client.fetch_all().await;

    match result {
        Err(ref e @ Error::TokenExpired) => assert!(e.is_auth_expired()),
        other => panic!("expected TokenExpired, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_all_generic_envelope_error() {
    let (server, client) = setup("a@b.com").await;

    Mock::given(method("GET"))
        .and(path("/data/all"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "code": 9, "message": "maintenance window" })),
        )
        .mount(&server)
        .await;

    let client = client.with_token(secret("T1"));
    let result = client.fetch_all().await;

    match result {
        Err(Error::Api { code, ref message }) => {
            assert_eq!(code, 9);
            assert!(message.contains("maintenance"));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_all_http_error_is_transport() {
    let (server, client) = setup("a@b.com").await;

    Mock::given(method("GET"))
        .and(path("/data/all"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client.with_token(secret("T1"));
    let result = client.fetch_all().await;

    assert!(
        matches!(result, Err(Error::Transport(_))),
        "expected Transport error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_fetch_all_malformed_body() {
    let (server, client) = setup("a@b.com").await;

    Mock::given(method("GET"))
        .and(path("/data/all"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let client = client.with_token(secret("T1"));
    let result = client.fetch_all().await;

    match result {
        Err(Error::Deserialization { ref body, .. }) => assert!(body.contains("not json")),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}
