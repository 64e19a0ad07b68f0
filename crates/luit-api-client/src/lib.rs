//! HTTP client for the Luit reporting backend.
//!
//! Provides a small client with optional auth (Bearer token or X-API-Key),
//! a JSON POST helper, and the reporting endpoints (image upload and report
//! submission). The CLI uses this client directly; the processing pipeline
//! sees it only through [`luit_core::ImageUploader`].

pub mod api;

use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Backend address used when no URL is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Authentication strategy for the API.
#[derive(Clone, Debug)]
pub enum Auth {
    /// `Authorization: Bearer {token}`
    Bearer(String),
    /// `X-API-Key: {key}`
    XApiKey(String),
}

/// HTTP client for the reporting backend.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth: Option<Auth>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, auth: Option<Auth>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth,
        })
    }

    /// Create client from environment: LUIT_API_URL (or API_URL), then
    /// LUIT_API_TOKEN for Bearer auth or LUIT_API_KEY for X-API-Key.
    /// The reporting endpoints accept anonymous requests, so auth is optional.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("LUIT_API_URL")
            .or_else(|_| std::env::var("API_URL"))
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let auth = std::env::var("LUIT_API_TOKEN")
            .map(Auth::Bearer)
            .or_else(|_| std::env::var("LUIT_API_KEY").map(Auth::XApiKey))
            .ok();

        Self::new(base_url, auth)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Some(Auth::Bearer(token)) => {
                request.header("Authorization", format!("Bearer {}", token))
            }
            Some(Auth::XApiKey(key)) => request.header("X-API-Key", key.as_str()),
            None => request,
        }
    }

    /// Send a JSON POST and hand back the raw response, whatever its status.
    pub(crate) async fn send_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> reqwest::Result<Response> {
        let url = self.build_url(path);
        let request = self.apply_auth(self.client.post(&url).json(body));
        request.send().await
    }

    /// POST JSON body and deserialize response.
    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .send_json(path, body)
            .await
            .context("Failed to send request")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let detail = error_detail(&error_text).unwrap_or(error_text);
            return Err(anyhow::anyhow!(
                "API request failed with status {}: {}",
                status,
                detail
            ));
        }

        let body: T = response
            .json()
            .await
            .context("Failed to parse response as JSON")?;

        Ok(body)
    }
}

/// Human-readable message from an error body: `detail`, else `message`.
pub(crate) fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["detail", "message"]
        .iter()
        .filter_map(|key| value.get(key).and_then(|v| v.as_str()))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

pub use api::{REPORT_PATH, UPLOAD_IMAGE_PATH};
