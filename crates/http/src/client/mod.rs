//! Panel API client

pub mod auth;
pub mod context;
pub mod error;
pub mod middleware;

use std::time::Duration;

use reqwest::{Client, ClientBuilder, Response, header};

use context::RequestContext;
use error::ClientError;

/// Default request timeout, matching the shipped console configuration.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Panel API client: the single point of egress for backend calls.
///
/// Holds the connection pool, base URL, and the console's fixed JSON
/// defaults. Request state lives in [`RequestContext`] so a failed call can
/// be re-dispatched by the session-aware wrapper; this client performs no
/// retries of its own.
#[derive(Debug, Clone)]
pub struct PanelClient {
    client: Client,
    base_url: String,
}

impl PanelClient {
    /// Create a new client with default configuration
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new client builder
    pub fn builder() -> PanelClientBuilder {
        PanelClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one attempt for the given request context.
    pub async fn dispatch(&self, ctx: &RequestContext) -> Result<Response, ClientError> {
        let url = format!("{}{}", self.base_url, ctx.path());
        let mut request = self.client.request(ctx.method().clone(), url);

        for (name, value) in ctx.headers() {
            request = request.header(name, value);
        }
        if let Some(body) = ctx.body() {
            request = request.json(body);
        }

        Ok(request.send().await?)
    }

    /// Dispatch a request and handle common errors.
    pub async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        ctx: RequestContext,
    ) -> Result<T, ClientError> {
        let response = self.dispatch(&ctx).await?;
        let status = response.status();

        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let message = response.text().await.unwrap_or_else(|_| status.to_string());
            Err(ClientError::from_status(status, message))
        }
    }
}

/// Builder for PanelClient
#[derive(Debug, Default)]
pub struct PanelClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl PanelClientBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client
    pub fn build(self) -> Result<PanelClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        default_headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = ClientBuilder::new()
            .default_headers(default_headers)
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .user_agent(
                self.user_agent
                    .unwrap_or_else(|| format!("panel-client/{}", env!("CARGO_PKG_VERSION"))),
            )
            .build()?;

        Ok(PanelClient { client, base_url })
    }
}
