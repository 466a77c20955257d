//! In-memory pirates backend.
//!
//! Serves the `/pirates` resource the client talks to, journals every request
//! that reaches a route, and can be told to answer everything with a canned
//! response so callers can observe how non-2xx statuses flow through.

use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use axum::{
    body::{to_bytes, Body},
    extract::{Path, Request, State},
    http::header::CONTENT_TYPE,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{
    net::TcpListener,
    sync::{Mutex, RwLock},
};
use tower_http::trace::TraceLayer;

pub use axum::http::StatusCode;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pirate {
    pub id: u64,
    pub name: String,
}

#[derive(Deserialize)]
pub struct CreatePirate {
    pub name: String,
}

#[derive(Deserialize)]
pub struct UpdatePirate {
    pub name: Option<String>,
}

/// A request as it arrived at the server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    /// `None` when the request carried no body bytes.
    pub body: Option<String>,
}

#[derive(Default)]
struct Inner {
    pirates: RwLock<BTreeMap<u64, Pirate>>,
    next_id: AtomicU64,
    journal: Mutex<Vec<RecordedRequest>>,
    canned: RwLock<Option<(StatusCode, serde_json::Value)>>,
}

/// Shared handle on the server's state. Clones see the same data.
#[derive(Clone, Default)]
pub struct MockState {
    inner: Arc<Inner>,
}

impl MockState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State pre-populated with `names`, assigned ids 1, 2, ...
    pub fn with_pirates<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pirates: BTreeMap<u64, Pirate> = names
            .into_iter()
            .zip(1..)
            .map(|(name, id)| {
                (
                    id,
                    Pirate {
                        id,
                        name: name.into(),
                    },
                )
            })
            .collect();
        let next_id = pirates.len() as u64;
        Self {
            inner: Arc::new(Inner {
                pirates: RwLock::new(pirates),
                next_id: AtomicU64::new(next_id),
                ..Inner::default()
            }),
        }
    }

    fn allocate(&self, name: String) -> Pirate {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        Pirate { id, name }
    }

    pub async fn pirates(&self) -> Vec<Pirate> {
        self.inner.pirates.read().await.values().cloned().collect()
    }

    /// Every request journaled so far, oldest first.
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.journal.lock().await.clone()
    }

    /// Answer every subsequent request with `status` and `body`.
    pub async fn respond_with(&self, status: StatusCode, body: serde_json::Value) {
        *self.inner.canned.write().await = Some((status, body));
    }

    pub async fn clear_response(&self) {
        *self.inner.canned.write().await = None;
    }
}

pub fn app() -> Router {
    app_with_state(MockState::new())
}

pub fn app_with_state(state: MockState) -> Router {
    Router::new()
        .route("/pirates", get(list_pirates).post(create_pirate))
        .route(
            "/pirates/{id}",
            get(get_pirate).patch(update_pirate).delete(delete_pirate),
        )
        .layer(middleware::from_fn_with_state(state.clone(), journal))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, MockState::new()).await
}

pub async fn serve(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

async fn journal(State(state): State<MockState>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(_) => return StatusCode::BAD_REQUEST.into_response(),
    };

    let recorded = RecordedRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        content_type: parts
            .headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
        body: (!bytes.is_empty()).then(|| String::from_utf8_lossy(&bytes).into_owned()),
    };
    tracing::debug!(method = %recorded.method, path = %recorded.path, "journaled request");
    state.inner.journal.lock().await.push(recorded);

    if let Some((status, body)) = state.inner.canned.read().await.clone() {
        return (status, Json(body)).into_response();
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

async fn list_pirates(State(state): State<MockState>) -> Json<Vec<Pirate>> {
    Json(state.pirates().await)
}

async fn create_pirate(
    State(state): State<MockState>,
    Json(input): Json<CreatePirate>,
) -> (StatusCode, Json<Pirate>) {
    let pirate = state.allocate(input.name);
    state
        .inner
        .pirates
        .write()
        .await
        .insert(pirate.id, pirate.clone());
    tracing::info!(id = pirate.id, name = %pirate.name, "pirate created");
    (StatusCode::CREATED, Json(pirate))
}

async fn get_pirate(
    State(state): State<MockState>,
    Path(id): Path<u64>,
) -> Result<Json<Pirate>, StatusCode> {
    let pirates = state.inner.pirates.read().await;
    pirates.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_pirate(
    State(state): State<MockState>,
    Path(id): Path<u64>,
    Json(input): Json<UpdatePirate>,
) -> Result<Json<Pirate>, StatusCode> {
    let mut pirates = state.inner.pirates.write().await;
    let pirate = pirates.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(name) = input.name {
        pirate.name = name;
    }
    tracing::info!(id, "pirate updated");
    Ok(Json(pirate.clone()))
}

async fn delete_pirate(
    State(state): State<MockState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, StatusCode> {
    let mut pirates = state.inner.pirates.write().await;
    let removed = pirates.remove(&id).ok_or(StatusCode::NOT_FOUND)?;
    tracing::info!(id, name = %removed.name, "pirate deleted");
    Ok(StatusCode::NO_CONTENT)
}
