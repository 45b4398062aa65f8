//! In-process stand-in for a medownloader server, used by the client,
//! session, and poll-loop tests. Mirrors the real server's routes, status
//! codes, cookie session, and `{"err": ...}` error bodies.

use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::model::{AddedFile, DownloadRecord};

const PASSWORD: &str = "password";
const TOKEN: &str = "stub-session-token";
const COOKIE_NAME: &str = "medownloader_token";

#[derive(Default)]
struct Inner {
    authed: bool,
    downloads: Vec<DownloadRecord>,
    fail_lists: usize,
    add_calls: usize,
    next_id: i64,
}

type Shared = Arc<Mutex<Inner>>;

pub struct StubServer {
    pub base_url: String,
    state: Shared,
}

impl StubServer {
    pub async fn spawn() -> Self {
        let state: Shared = Arc::new(Mutex::new(Inner::default()));
        let app = Router::new()
            .route("/api/login", post(login))
            .route("/api/logout", get(logout))
            .route("/api/downloads", get(list_downloads))
            .route("/api/info", get(dir_info))
            .route("/api/toggle/{id}", get(toggle))
            .route("/api/delete/{id}", get(delete))
            .route("/api/add", post(add))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    pub fn push_download(&self, id: i64, filename: &str, downloaded: i64, size: i64) {
        let mut inner = self.state.lock().unwrap();
        inner.downloads.push(DownloadRecord {
            id,
            filename: filename.to_string(),
            active: true,
            downloaded,
            size,
            ..Default::default()
        });
        inner.next_id = inner.next_id.max(id + 1);
    }

    pub fn set_downloaded(&self, id: i64, bytes: i64) {
        let mut inner = self.state.lock().unwrap();
        if let Some(d) = inner.downloads.iter_mut().find(|d| d.id == id) {
            d.downloaded = bytes;
        }
    }

    /// Make the next `n` list requests answer 500.
    pub fn fail_lists(&self, n: usize) {
        self.state.lock().unwrap().fail_lists = n;
    }

    pub fn add_calls(&self) -> usize {
        self.state.lock().unwrap().add_calls
    }
}

fn authed(state: &Shared, headers: &HeaderMap) -> bool {
    if !state.lock().unwrap().authed {
        return false;
    }
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|cookies| cookies.contains(&format!("{COOKIE_NAME}={TOKEN}")))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({ "err": "session token not valid / not provided" })),
    )
        .into_response()
}

fn err_response(status: StatusCode, msg: &str) -> Response {
    (status, Json(serde_json::json!({ "err": msg }))).into_response()
}

async fn login(State(state): State<Shared>, headers: HeaderMap, body: Bytes) -> Response {
    if authed(&state, &headers) {
        return (StatusCode::OK, Json(serde_json::json!({ "msg": "OK" }))).into_response();
    }

    let password = serde_json::from_slice::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("password").and_then(|p| p.as_str()).map(String::from))
        .unwrap_or_default();

    if password != PASSWORD {
        return err_response(StatusCode::UNAUTHORIZED, "incorrect password");
    }

    state.lock().unwrap().authed = true;
    (
        StatusCode::OK,
        [(
            header::SET_COOKIE,
            format!("{COOKIE_NAME}={TOKEN}; Path=/"),
        )],
        Json(serde_json::json!({ "msg": "ok" })),
    )
        .into_response()
}

async fn logout(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if authed(&state, &headers) {
        state.lock().unwrap().authed = false;
    }
    StatusCode::OK.into_response()
}

async fn list_downloads(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if !authed(&state, &headers) {
        return unauthorized();
    }
    let mut inner = state.lock().unwrap();
    if inner.fail_lists > 0 {
        inner.fail_lists -= 1;
        return err_response(StatusCode::INTERNAL_SERVER_ERROR, "internal error");
    }
    (StatusCode::ACCEPTED, Json(inner.downloads.clone())).into_response()
}

async fn dir_info(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if !authed(&state, &headers) {
        return unauthorized();
    }
    (
        StatusCode::OK,
        Json(serde_json::json!({ "path": "/downloads", "freeSpace": "12.00 GB" })),
    )
        .into_response()
}

async fn toggle(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if !authed(&state, &headers) {
        return unauthorized();
    }
    let mut inner = state.lock().unwrap();
    match inner.downloads.iter_mut().find(|d| d.id == id) {
        Some(d) => {
            if d.active {
                d.active = false;
            } else if !d.completed {
                d.active = true;
            }
            StatusCode::OK.into_response()
        }
        None => err_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            &format!("downloadItem with id:{id} not found"),
        ),
    }
}

async fn delete(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if !authed(&state, &headers) {
        return unauthorized();
    }
    let mut inner = state.lock().unwrap();
    let before = inner.downloads.len();
    inner.downloads.retain(|d| d.id != id);
    if inner.downloads.len() == before {
        return err_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            &format!("downloadItem with id:{id} not found"),
        );
    }
    (StatusCode::OK, Json(serde_json::json!("removed"))).into_response()
}

async fn add(State(state): State<Shared>, headers: HeaderMap, body: Bytes) -> Response {
    if !authed(&state, &headers) {
        return unauthorized();
    }
    state.lock().unwrap().add_calls += 1;

    let req = match serde_json::from_slice::<crate::model::AddRequest>(&body) {
        Ok(req) => req,
        Err(_) => return err_response(StatusCode::BAD_REQUEST, "url is invalid"),
    };
    if !req.url.starts_with("http://") && !req.url.starts_with("https://") {
        return err_response(StatusCode::BAD_REQUEST, "url is invalid");
    }

    let filename = if req.filename.is_empty() {
        req.url.rsplit('/').next().unwrap_or("download").to_string()
    } else {
        req.filename.clone()
    };

    let mut inner = state.lock().unwrap();
    let id = inner.next_id;
    inner.next_id += 1;
    inner.downloads.push(DownloadRecord {
        id,
        url: req.url,
        filename: filename.clone(),
        active: true,
        ..Default::default()
    });

    (StatusCode::ACCEPTED, Json(AddedFile { id, filename })).into_response()
}
