use reqwest::{Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use crate::model::{AddRequest, AddedFile, DirInfo, DownloadRecord};

/// Failures at the HTTP boundary. Transport errors and server rejections
/// are kept apart so callers can surface the server's error string
/// verbatim where the contract requires it.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server rejected request ({status}): {message}")]
    Rejected { status: StatusCode, message: String },
}

/// Error payload the server attaches to non-success responses.
#[derive(Deserialize)]
struct ErrBody {
    #[serde(default)]
    err: String,
}

/// HTTP client for the medownloader API. The session token lives in the
/// cookie store, so every request carries credentials implicitly.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    pub fn new(server_url: &str) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            http,
            base_url: server_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map a non-success response to `Rejected`, carrying the server's
    /// `err` payload when present and the status line otherwise.
    async fn check(resp: Response) -> Result<Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = match resp.json::<ErrBody>().await {
            Ok(body) if !body.err.is_empty() => body.err,
            _ => status.to_string(),
        };
        Err(ApiError::Rejected { status, message })
    }

    /// Empty-body login, used to find out whether the stored session
    /// cookie is still valid.
    pub async fn probe(&self) -> Result<(), ApiError> {
        let resp = self.http.post(self.url("/api/login")).send().await?;
        Self::check(resp).await?;
        Ok(())
    }

    pub async fn login(&self, password: &str) -> Result<(), ApiError> {
        let resp = self
            .http
            .post(self.url("/api/login"))
            .json(&serde_json::json!({ "password": password }))
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        let resp = self.http.get(self.url("/api/logout")).send().await?;
        Self::check(resp).await?;
        Ok(())
    }

    /// Fetch the full snapshot of tracked downloads.
    pub async fn list_downloads(&self) -> Result<Vec<DownloadRecord>, ApiError> {
        let resp = self.http.get(self.url("/api/downloads")).send().await?;
        let resp = Self::check(resp).await?;
        Ok(resp.json().await?)
    }

    /// Path and free space of the server's download directory.
    pub async fn dir_info(&self) -> Result<DirInfo, ApiError> {
        let resp = self.http.get(self.url("/api/info")).send().await?;
        let resp = Self::check(resp).await?;
        Ok(resp.json().await?)
    }

    /// Ask the server to flip a download between active and paused.
    pub async fn toggle(&self, id: i64) -> Result<(), ApiError> {
        let resp = self
            .http
            .get(self.url(&format!("/api/toggle/{id}")))
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    /// Remove a download from the server.
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let resp = self
            .http
            .get(self.url(&format!("/api/delete/{id}")))
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    /// Submit a new download. The server answers with the assigned
    /// filename, or an error string passed through in `Rejected`.
    pub async fn add(&self, req: &AddRequest) -> Result<AddedFile, ApiError> {
        let resp = self
            .http
            .post(self.url("/api/add"))
            .json(req)
            .send()
            .await?;
        let resp = Self::check(resp).await?;
        Ok(resp.json().await?)
    }
}
