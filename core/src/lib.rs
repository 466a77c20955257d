//! Async JSON client for a single remote API.
//!
//! # Overview
//! `HttpClient` fixes a base URL at construction and exposes four verbs:
//! `get`, `delete`, `post` and `patch`. Each call issues exactly one request
//! through a `Fetch` primitive (reqwest by default) and hands the outcome back
//! to the caller untouched: no retries, no timeouts, no status interpretation.
//!
//! # Design
//! - Requests and responses are plain data (`HttpRequest` / `HttpResponse`).
//!   The `build_*` methods are pure, so the request shape can be checked
//!   without a network, and the `Fetch` trait is the only I/O boundary.
//! - `get` resolves with the parsed JSON body. `delete`, `post` and `patch`
//!   resolve with the raw response; callers parse it themselves.
//! - The base URL is injected (`ClientConfig`), never read from a global.

pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod http;

pub use client::HttpClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use fetch::{Fetch, ReqwestFetch};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
