use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use forge_gate_api::{ForgeApiError, ForgeClient, ForgeClientConfig, ForgeRequest};
use serde_json::{Value, json};

#[derive(Debug, Clone)]
struct RecordedRequest {
    method: Method,
    path: String,
    authorization: Option<String>,
    body: String,
}

type Recorder = Arc<Mutex<Vec<RecordedRequest>>>;

async fn spawn_forge_stub() -> (SocketAddr, Recorder) {
    let recorder: Recorder = Arc::new(Mutex::new(Vec::new()));
    let captured = Arc::clone(&recorder);
    let router = Router::new().fallback(move |method: Method, uri: Uri, headers: HeaderMap, body: String| {
        let captured = Arc::clone(&captured);
        async move {
            captured.lock().unwrap().push(RecordedRequest {
                method: method.clone(),
                path: uri.path().to_string(),
                authorization: headers
                    .get(header::AUTHORIZATION)
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_string),
                body,
            });
            respond(&method, uri.path())
        }
    });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (address, recorder)
}

fn respond(method: &Method, path: &str) -> Response {
    match (method.as_str(), path) {
        ("GET", "/api/v1/servers") => axum::Json(json!({"servers": [{"id": 1, "name": "web-1"}]})).into_response(),
        ("GET", "/api/v1/servers/1/sites/2/env") => (
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            "APP_ENV=production",
        )
            .into_response(),
        ("POST", "/api/v1/servers/1/databases") => {
            (StatusCode::CREATED, axum::Json(json!({"database": {"id": 9, "name": "prod"}}))).into_response()
        }
        ("DELETE", "/api/v1/servers/1/sites/2") => StatusCode::OK.into_response(),
        _ => (
            StatusCode::UNPROCESSABLE_ENTITY,
            axum::Json(json!({"message": "The given data was invalid."})),
        )
            .into_response(),
    }
}

fn client_for(address: SocketAddr) -> ForgeClient {
    ForgeClient::new(ForgeClientConfig::new("test-token").with_base_url(format!("http://{address}/api/v1"))).unwrap()
}

#[tokio::test]
async fn json_responses_are_parsed_and_requests_carry_bearer_auth() {
    let (address, recorder) = spawn_forge_stub().await;
    let client = client_for(address);

    let body = client.get("/servers").await.unwrap();
    assert_eq!(body["servers"][0]["name"], "web-1");

    let requests = recorder.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer test-token"));
}

#[tokio::test]
async fn non_json_responses_are_returned_as_text() {
    let (address, _) = spawn_forge_stub().await;
    let body = client_for(address).get("/servers/1/sites/2/env").await.unwrap();
    assert_eq!(body, Value::String("APP_ENV=production".into()));
}

#[tokio::test]
async fn payloads_are_sent_as_json() {
    let (address, recorder) = spawn_forge_stub().await;
    let client = client_for(address);
    let request = ForgeRequest::post("/servers/1/databases").with_payload(json!({"name": "prod"}));

    let body = client.send(request).await.unwrap();
    assert_eq!(body["database"]["id"], 9);

    let requests = recorder.lock().unwrap();
    assert_eq!(requests[0].method, Method::POST);
    assert_eq!(requests[0].path, "/api/v1/servers/1/databases");
    let sent: Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(sent, json!({"name": "prod"}));
}

#[tokio::test]
async fn empty_success_bodies_decode_to_null() {
    let (address, _) = spawn_forge_stub().await;
    let body = client_for(address).delete("/servers/1/sites/2").await.unwrap();
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn error_statuses_surface_status_and_body() {
    let (address, _) = spawn_forge_stub().await;
    let error = client_for(address).delete("/servers/1").await.unwrap_err();

    assert_eq!(error.status(), Some(422));
    assert_eq!(error.body(), Some(&json!({"message": "The given data was invalid."})));
    assert!(error.to_string().contains("Forge API error (422)"));
}

#[tokio::test]
async fn unreachable_hosts_raise_network_errors() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let error = client_for(address).get("/user").await.unwrap_err();
    assert!(matches!(error, ForgeApiError::Network { .. }));
    assert!(error.to_string().starts_with("Network error"));
}
