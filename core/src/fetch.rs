//! The network primitive behind `HttpClient`.
//!
//! `Fetch` turns one `HttpRequest` into one `HttpResponse`. Implementations
//! must not retry and must not treat any status code as an error; only a
//! failure to obtain a response at all becomes `ApiError::Transport`.

use async_trait::async_trait;
use reqwest::{Client, Method};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// `Fetch` backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestFetch {
    client: Client,
}

impl ReqwestFetch {
    pub fn new() -> Result<Self, ApiError> {
        let client = Client::builder().build()?;
        Ok(Self { client })
    }

    /// Reuse an already configured client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Delete => Method::DELETE,
        HttpMethod::Post => Method::POST,
        HttpMethod::Patch => Method::PATCH,
    }
}

#[async_trait]
impl Fetch for ReqwestFetch {
    async fn fetch(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), &request.url);
        for (name, value) in request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
