//! `reqwest`-backed [`Transport`].

use reqwest::header::CONTENT_TYPE;

use crate::api::client::{RawResponse, Transport};
use crate::api::error::{ApiError, Result};

/// Default backend address (the dashboard server binds here unless told otherwise).
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:8765";

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn transport_error(e: reqwest::Error) -> ApiError {
    ApiError::Transport(e.to_string())
}

async fn read(response: reqwest::Response) -> Result<RawResponse> {
    let status = response.status();
    let body = response.text().await.map_err(transport_error)?;
    Ok(RawResponse {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or_default().to_string(),
        body,
    })
}

impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> Result<RawResponse> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(transport_error)?;
        read(response).await
    }

    async fn put_json(&self, path: &str, body: String) -> Result<RawResponse> {
        let response = self
            .client
            .put(self.url(path))
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(transport_error)?;
        read(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let transport = HttpTransport::new("http://localhost:8765/");
        assert_eq!(transport.base_url(), "http://localhost:8765");
        assert_eq!(
            transport.url("/api/configs"),
            "http://localhost:8765/api/configs"
        );
    }
}
