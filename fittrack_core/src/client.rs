//! HTTP boundary to the remote record store and advice service.
//!
//! [`RemoteStore`] is the seam the orchestrator talks through;
//! [`ReqwestRemoteStore`] is the real implementation. Every request carries
//! the fixed bearer credential. Nothing here retries.

use crate::config::RemoteConfig;
use crate::types::{DashboardCollections, FoodCandidate, InsightRequest, InsightResponse, Record};
use crate::{Error, Result};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

/// Operations offered by the remote service
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch the four collections a dashboard is built from
    async fn fetch_dashboard(&self) -> Result<DashboardCollections>;

    /// Store a normalized record; only success or failure is reported
    async fn submit(&self, record: &Record) -> Result<()>;

    /// Look up food candidates by name
    async fn search_foods(&self, query: &str) -> Result<Vec<FoodCandidate>>;

    /// Ask the advice service for free-text advice
    async fn request_insights(&self, request: &InsightRequest) -> Result<InsightResponse>;
}

/// Client for the remote service using reqwest
#[derive(Clone, Debug)]
pub struct ReqwestRemoteStore {
    base_url: String,
    token: SecretString,
    client: reqwest::Client,
}

impl ReqwestRemoteStore {
    /// Create a new client instance
    ///
    /// # Arguments
    /// * `base_url` - API root, e.g. `http://localhost:8001/api`
    /// * `token` - Bearer credential
    /// * `timeout` - Per-request timeout
    pub fn new(base_url: &str, token: SecretString, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            client,
        })
    }

    /// Build a client from the `[remote]` configuration section
    pub fn from_config(config: &RemoteConfig) -> Result<Self> {
        Self::new(
            &config.base_url,
            config.credential()?,
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Build an authenticated GET request.
    fn get_request(&self, path: &str) -> reqwest::RequestBuilder {
        tracing::debug!("GET {}", path);
        self.client
            .get(self.url(path))
            .bearer_auth(self.token.expose_secret())
    }

    /// Build an authenticated POST request.
    fn post_request(&self, path: &str) -> reqwest::RequestBuilder {
        tracing::debug!("POST {}", path);
        self.client
            .post(self.url(path))
            .bearer_auth(self.token.expose_secret())
    }

    /// Execute a request and expect a JSON response.
    async fn execute_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T> {
        let resp = self.send(request).await?;
        Ok(resp.json::<T>().await?)
    }

    /// Execute a request, mapping transport failures and error statuses.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let resp = request.send().await.map_err(|e| {
            tracing::warn!("Request to remote service failed: {}", e);
            Error::Transport(e)
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(self.error_from_response(resp).await);
        }
        Ok(resp)
    }

    /// Extract error information from a failed response.
    async fn error_from_response(&self, resp: reqwest::Response) -> Error {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let body_snippet: String = body.chars().take(256).collect();
        tracing::warn!("Remote service returned {}: {}", status, body_snippet);
        Error::RemoteStatus {
            status,
            body: body_snippet,
        }
    }
}

#[async_trait]
impl RemoteStore for ReqwestRemoteStore {
    async fn fetch_dashboard(&self) -> Result<DashboardCollections> {
        self.execute_json(self.get_request("dashboard")).await
    }

    async fn submit(&self, record: &Record) -> Result<()> {
        let request = self.post_request(record.endpoint()).json(record);
        self.send(request).await?;
        Ok(())
    }

    async fn search_foods(&self, query: &str) -> Result<Vec<FoodCandidate>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let request = self
            .get_request("nutrition/search")
            .query(&[("query", query)]);
        self.execute_json(request).await
    }

    async fn request_insights(&self, request: &InsightRequest) -> Result<InsightResponse> {
        let request = self.post_request("ai/insights").json(request);
        self.execute_json(request).await
    }
}
