//! # Data Client
//!
//! Typed operations over the dashboard backend's REST surface.
//!
//! Every operation checks the status first: anything outside 2xx becomes
//! [`ApiError::Http`] carrying status and status text; a 2xx body is parsed
//! as JSON. The HTTP layer itself sits behind [`Transport`] so the client can
//! be driven by [`crate::api::HttpTransport`] or an in-memory fake.
//!
//! ## Package cache
//!
//! Package lists are immutable for a session. Each category has its own
//! [`OnceCell`]; concurrent requests for one category share a single fetch,
//! and a failed fetch leaves the cell empty so a later request retries.

use std::future::Future;

use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;

use crate::api::error::{ApiError, Result};
use crate::api::model::{
    Category, Commit, Config, ConfigSummary, DiffResponse, Package, SaveRequest, SaveResponse,
};

/// Message used when a rejected save carries no error text.
pub const SAVE_FAILED: &str = "Save failed";

/// A response as seen by the client: status line plus body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl RawResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            status_text: "OK".to_string(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The HTTP seam. Paths are absolute (`/api/...`).
pub trait Transport {
    fn get(&self, path: &str) -> impl Future<Output = Result<RawResponse>>;

    fn put_json(&self, path: &str, body: String) -> impl Future<Output = Result<RawResponse>>;
}

fn decode<R: DeserializeOwned>(response: RawResponse) -> Result<R> {
    if !response.is_success() {
        return Err(ApiError::Http {
            status: response.status,
            status_text: response.status_text,
        });
    }
    Ok(serde_json::from_str(&response.body)?)
}

pub struct ApiClient<T> {
    transport: T,
    packages: [OnceCell<Vec<Package>>; 3],
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            packages: Default::default(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        tracing::debug!(%path, "GET");
        let response = self.transport.get(path).await?;
        decode(response)
    }

    /// `GET /api/configs`
    pub async fn list_configs(&self) -> Result<Vec<ConfigSummary>> {
        self.get_json("/api/configs").await
    }

    /// `GET /api/configs/{id}`
    pub async fn get_config(&self, id: &str) -> Result<Config> {
        self.get_json(&format!("/api/configs/{id}")).await
    }

    /// `PUT /api/configs/{id}`. A 2xx reply may still report `success: false`;
    /// callers must check it (or use [`ApiClient::save_config`]).
    pub async fn update_config(&self, id: &str, content: &str) -> Result<SaveResponse> {
        let path = format!("/api/configs/{id}");
        let body = serde_json::to_string(&SaveRequest { content })?;
        tracing::debug!(%path, bytes = content.len(), "PUT");
        let response = self.transport.put_json(&path, body).await?;
        decode(response)
    }

    /// [`ApiClient::update_config`] with `success: false` folded into
    /// [`ApiError::Application`].
    pub async fn save_config(&self, id: &str, content: &str) -> Result<SaveResponse> {
        let reply = self.update_config(id, content).await?;
        if reply.success {
            Ok(reply)
        } else {
            Err(ApiError::Application(
                reply.error.unwrap_or_else(|| SAVE_FAILED.to_string()),
            ))
        }
    }

    /// `GET /api/brew/{category}`, fetched at most once per category.
    pub async fn list_packages(&self, category: Category) -> Result<Vec<Package>> {
        let path = format!("/api/brew/{category}");
        let packages = self.packages[category.index()]
            .get_or_try_init(|| async { self.get_json::<Vec<Package>>(&path).await })
            .await?;
        Ok(packages.clone())
    }

    /// `GET /api/history/{configId}`
    pub async fn get_history(&self, config_id: &str) -> Result<Vec<Commit>> {
        self.get_json(&format!("/api/history/{config_id}")).await
    }

    /// `GET /api/history/{configId}/{commit}`; `None` when the commit has no diff.
    pub async fn get_diff(&self, config_id: &str, commit: &str) -> Result<Option<String>> {
        let reply: DiffResponse = self
            .get_json(&format!("/api/history/{config_id}/{commit}"))
            .await?;
        Ok(reply.diff)
    }
}
