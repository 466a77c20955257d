//! Base-URL-scoped JSON client.
//!
//! # Design
//! `HttpClient` holds only `base` and its `Fetch` primitive; it carries no
//! mutable state between calls, so concurrent calls are independent. Every
//! verb is split into a pure `build_*` step and one fetch. Paths are appended
//! to `base` verbatim: no slash is added or removed.
//!
//! `get` parses the body as JSON whatever the status. `delete`, `post` and
//! `patch` return the raw `HttpResponse` whatever the status. The asymmetry
//! is kept on purpose for callers written against it.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::fetch::{Fetch, ReqwestFetch};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

const CONTENT_TYPE: &str = "Content-Type";
const APPLICATION_JSON: &str = "application/json";

#[derive(Debug, Clone)]
pub struct HttpClient<F = ReqwestFetch> {
    base: String,
    fetch: F,
}

impl HttpClient<ReqwestFetch> {
    /// Client for `base` using reqwest as the network primitive.
    pub fn new(base: impl Into<String>) -> Result<Self, ApiError> {
        Ok(Self::with_fetch(base, ReqwestFetch::new()?))
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::new(config.base_url.clone())
    }
}

impl<F: Fetch> HttpClient<F> {
    pub fn with_fetch(base: impl Into<String>, fetch: F) -> Self {
        Self {
            base: base.into(),
            fetch,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn build_get(&self, path: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: self.url(path),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_delete(&self, path: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            url: self.url(path),
            headers: json_headers(),
            body: None,
        }
    }

    pub fn build_post<P>(&self, path: &str, payload: &P) -> Result<HttpRequest, ApiError>
    where
        P: Serialize + ?Sized,
    {
        self.build_with_body(HttpMethod::Post, path, payload)
    }

    pub fn build_patch<P>(&self, path: &str, payload: &P) -> Result<HttpRequest, ApiError>
    where
        P: Serialize + ?Sized,
    {
        self.build_with_body(HttpMethod::Patch, path, payload)
    }

    fn build_with_body<P>(
        &self,
        method: HttpMethod,
        path: &str,
        payload: &P,
    ) -> Result<HttpRequest, ApiError>
    where
        P: Serialize + ?Sized,
    {
        let body = serde_json::to_string(payload).map_err(ApiError::Serialization)?;
        Ok(HttpRequest {
            method,
            url: self.url(path),
            headers: json_headers(),
            body: Some(body),
        })
    }

    /// Parse a GET response body as JSON. The status is not looked at.
    pub fn parse_get<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        response.json()
    }

    /// GET `base + path` and resolve with the JSON body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.build_get(path)).await?;
        self.parse_get(response)
    }

    /// DELETE `base + path` and resolve with the raw response.
    pub async fn delete(&self, path: &str) -> Result<HttpResponse, ApiError> {
        self.send(self.build_delete(path)).await
    }

    /// POST `payload` as JSON to `base + path` and resolve with the raw response.
    pub async fn post<P>(&self, path: &str, payload: &P) -> Result<HttpResponse, ApiError>
    where
        P: Serialize + ?Sized,
    {
        let request = self.build_post(path, payload)?;
        self.send(request).await
    }

    /// PATCH `payload` as JSON to `base + path` and resolve with the raw response.
    pub async fn patch<P>(&self, path: &str, payload: &P) -> Result<HttpResponse, ApiError>
    where
        P: Serialize + ?Sized,
    {
        let request = self.build_patch(path, payload)?;
        self.send(request).await
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::debug!(method = %request.method, url = %request.url, "sending request");
        let response = self.fetch.fetch(request).await?;
        tracing::debug!(status = response.status, "received response");
        Ok(response)
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string())]
}
