//! Drive `HttpClient` through a recording `Fetch` double.
//!
//! The double returns a canned response and keeps every request it was asked
//! to send, so each verb can be checked for "exactly one request, this shape"
//! without a socket.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use request_core::{ApiError, Fetch, HttpClient, HttpMethod, HttpRequest, HttpResponse};
use serde_json::{json, Value};

const BASE: &str = "https://allyspirates.herokuapp.com";

#[derive(Clone)]
struct RecordingFetch {
    requests: Arc<Mutex<Vec<HttpRequest>>>,
    response: HttpResponse,
}

impl RecordingFetch {
    fn replying(status: u16, body: &str) -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            response: HttpResponse {
                status,
                headers: vec![("content-type".to_string(), "application/json".to_string())],
                body: body.as_bytes().to_vec(),
            },
        }
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetch for RecordingFetch {
    async fn fetch(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.lock().unwrap().push(request);
        Ok(self.response.clone())
    }
}

struct FailingFetch;

#[async_trait]
impl Fetch for FailingFetch {
    async fn fetch(&self, _request: HttpRequest) -> Result<HttpResponse, ApiError> {
        Err(ApiError::transport("getaddrinfo failed"))
    }
}

fn json_header() -> Vec<(String, String)> {
    vec![("Content-Type".to_string(), "application/json".to_string())]
}

#[tokio::test]
async fn get_issues_one_bare_request() {
    let fetch = RecordingFetch::replying(200, r#"[{"id":1,"name":"Jack"}]"#);
    let client = HttpClient::with_fetch(BASE, fetch.clone());

    let pirates: Value = client.get("/pirates").await.unwrap();
    assert_eq!(pirates, json!([{"id": 1, "name": "Jack"}]));
    assert_eq!(
        fetch.requests(),
        vec![HttpRequest {
            method: HttpMethod::Get,
            url: format!("{BASE}/pirates"),
            headers: Vec::new(),
            body: None,
        }]
    );
}

#[tokio::test]
async fn get_parses_error_bodies() {
    let fetch = RecordingFetch::replying(500, r#"{"error":"boom"}"#);
    let client = HttpClient::with_fetch(BASE, fetch);

    let body: Value = client.get("/pirates").await.unwrap();
    assert_eq!(body, json!({"error": "boom"}));
}

#[tokio::test]
async fn delete_returns_raw_response_for_any_status() {
    for status in [200, 204, 404, 500] {
        let fetch = RecordingFetch::replying(status, "");
        let client = HttpClient::with_fetch(BASE, fetch.clone());

        let response = client.delete("/pirates/1").await.unwrap();
        assert_eq!(response.status, status);
        assert_eq!(
            fetch.requests(),
            vec![HttpRequest {
                method: HttpMethod::Delete,
                url: format!("{BASE}/pirates/1"),
                headers: json_header(),
                body: None,
            }]
        );
    }
}

#[tokio::test]
async fn post_returns_unparsed_response() {
    let fetch = RecordingFetch::replying(201, r#"{"id":2,"name":"Anne"}"#);
    let client = HttpClient::with_fetch(BASE, fetch.clone());

    let response = client.post("/pirates", &json!({"name": "Anne"})).await.unwrap();
    assert_eq!(response.status, 201);
    assert_eq!(response.body, br#"{"id":2,"name":"Anne"}"#.to_vec());
    assert_eq!(
        fetch.requests(),
        vec![HttpRequest {
            method: HttpMethod::Post,
            url: format!("{BASE}/pirates"),
            headers: json_header(),
            body: Some(r#"{"name":"Anne"}"#.to_string()),
        }]
    );
}

#[tokio::test]
async fn patch_mirrors_post() {
    let fetch = RecordingFetch::replying(200, "{}");
    let client = HttpClient::with_fetch(BASE, fetch.clone());

    #[derive(serde::Serialize)]
    struct Rename<'a> {
        name: &'a str,
    }

    client
        .patch("/pirates/2", &Rename { name: "Mary" })
        .await
        .unwrap();
    assert_eq!(
        fetch.requests(),
        vec![HttpRequest {
            method: HttpMethod::Patch,
            url: format!("{BASE}/pirates/2"),
            headers: json_header(),
            body: Some(r#"{"name":"Mary"}"#.to_string()),
        }]
    );
}

#[tokio::test]
async fn serialization_failure_never_reaches_fetch() {
    let fetch = RecordingFetch::replying(200, "{}");
    let client = HttpClient::with_fetch(BASE, fetch.clone());

    // Maps with non-string keys cannot be encoded as JSON objects.
    let mut bad = std::collections::BTreeMap::new();
    bad.insert(vec![1u8], "one");

    let err = client.post("/pirates", &bad).await.unwrap_err();
    assert!(matches!(err, ApiError::Serialization(_)));
    assert!(fetch.requests().is_empty());
}

#[tokio::test]
async fn transport_errors_propagate_unchanged() {
    let client = HttpClient::with_fetch(BASE, FailingFetch);

    let err = client.get::<Value>("/pirates").await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP request failed: getaddrinfo failed");
    let err = client.post("/pirates", &json!({})).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    let err = client.patch("/pirates/1", &json!({})).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    let err = client.delete("/pirates/1").await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
