//! Fake spreadsheet host for integration tests.
//!
//! Spins up a minimal `axum` HTTP server on a random TCP port bound to
//! 127.0.0.1. Serves:
//! - `GET /book/{id}/export`: the published sheet `id`, reached through the
//!   generic `/edit` → `/export` link rewrite
//! - `GET /files/{name}`: the published sheet `name`, as a direct CSV link
//!
//! Every request bumps a hit counter so tests can tell cache hits from
//! refetches.
//!
//! # Example
//!
//! ```rust,no_run
//! # async {
//! let server = FakeSheetServer::start().await.unwrap();
//! server.publish("q1", Sheet::csv("call_id,cost\nA,1\n"));
//! let url = server.edit_url("q1");
//! # };
//! ```

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// One published sheet: what the server answers for it.
#[derive(Debug, Clone)]
pub struct Sheet {
    status: u16,
    content_type: &'static str,
    body: String,
}

impl Sheet {
    pub fn csv(body: impl Into<String>) -> Self {
        Self { status: 200, content_type: "text/csv; charset=utf-8", body: body.into() }
    }

    /// What a sheet that is not shared publicly serves: a sign-in page.
    pub fn html(body: impl Into<String>) -> Self {
        Self { status: 200, content_type: "text/html; charset=utf-8", body: body.into() }
    }

    pub fn failing(status: u16) -> Self {
        Self { status, content_type: "text/plain", body: String::new() }
    }
}

#[derive(Default)]
struct ServerState {
    sheets: Mutex<HashMap<String, Sheet>>,
    hits: AtomicUsize,
    last_query: Mutex<HashMap<String, String>>,
}

/// Handle to the running fake sheet host.
pub struct FakeSheetServer {
    addr: SocketAddr,
    state: Arc<ServerState>,
}

impl FakeSheetServer {
    /// Start the server on a random port. Returns once it is listening.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(ServerState::default());

        let app = Router::new()
            .route("/book/{id}/export", get(export_sheet))
            .route("/files/{name}", get(direct_file))
            .with_state(state.clone());

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self { addr, state })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Publish (or replace) the sheet served under `id`.
    pub fn publish(&self, id: &str, sheet: Sheet) {
        self.state.sheets.lock().unwrap().insert(id.to_string(), sheet);
    }

    /// A browser-style edit link that resolves to `/book/{id}/export`.
    pub fn edit_url(&self, id: &str) -> String {
        format!("{}/book/{id}/edit#gid=0", self.base_url())
    }

    /// A direct link served verbatim.
    pub fn file_url(&self, id: &str) -> String {
        format!("{}/files/{id}", self.base_url())
    }

    /// Requests served so far, for any path.
    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    /// Query parameters of the most recent export request.
    pub fn last_query(&self) -> HashMap<String, String> {
        self.state.last_query.lock().unwrap().clone()
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

async fn export_sheet(
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    *state.last_query.lock().unwrap() = query;
    serve(&state, &id)
}

async fn direct_file(Path(name): Path<String>, State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    serve(&state, &name)
}

fn serve(state: &ServerState, id: &str) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let sheet = state.sheets.lock().unwrap().get(id).cloned();
    match sheet {
        Some(sheet) => (
            StatusCode::from_u16(sheet.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            [(header::CONTENT_TYPE, sheet.content_type)],
            sheet.body,
        ),
        None => (StatusCode::NOT_FOUND, [(header::CONTENT_TYPE, "text/plain")], String::new()),
    }
}
