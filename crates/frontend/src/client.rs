//! Session-aware API client
//!
//! Wraps [`PanelClient`] with the request pipeline: bearer injection on the
//! way out, and one refresh-and-retry for the first 401 a request sees.

use panel_core::User;
use panel_http::client::middleware::{
    BearerAuth, RequestStage, ResponseDirective, ResponseStage, RetryOnUnauthorized,
};
use panel_http::types::UserResponse;
use panel_http::{ClientError, PanelClient, RequestContext};
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::auth::{AuthError, SessionStore};

/// Errors surfaced by wrapped API calls.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// API client that reads credentials from the session store.
///
/// All authenticated egress goes through [`SessionClient::execute`], which
/// drives the pipeline stages and owns their effects: when a stage asks for
/// `RefreshAndRetry`, the driver resolves the refresh through the store
/// before the retry is dispatched, never overlapping the two.
pub struct SessionClient {
    inner: PanelClient,
    session: SessionStore,
    request_stages: Vec<Box<dyn RequestStage>>,
    response_stages: Vec<Box<dyn ResponseStage>>,
}

impl SessionClient {
    /// Wrap a client with the default pipeline.
    pub fn new(inner: PanelClient, session: SessionStore) -> Self {
        Self {
            inner,
            session,
            request_stages: vec![Box::new(BearerAuth)],
            response_stages: vec![Box::new(RetryOnUnauthorized)],
        }
    }

    /// The session store this client reads from.
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Run one request through the pipeline.
    pub async fn execute<T: DeserializeOwned>(&self, mut ctx: RequestContext) -> Result<T, ApiError> {
        let session = self.session.snapshot();
        for stage in &self.request_stages {
            stage.apply(&mut ctx, &session)?;
        }

        loop {
            let response = self.inner.dispatch(&ctx).await.map_err(ApiError::Client)?;
            let status = response.status();

            if status.is_success() {
                return response
                    .json()
                    .await
                    .map_err(|err| ApiError::Client(ClientError::Request(err)));
            }

            match self.response_directive(status, &ctx) {
                ResponseDirective::Forward => {
                    let message = response.text().await.unwrap_or_else(|_| status.to_string());
                    return Err(ApiError::Client(ClientError::from_status(status, message)));
                }
                ResponseDirective::RefreshAndRetry => {
                    ctx.mark_retried();
                    tracing::debug!(path = ctx.path(), "access token rejected, refreshing");
                    match ctx.bearer().map(str::to_owned) {
                        Some(observed) => self.session.refresh_if_stale(&observed).await?,
                        None => self.session.refresh_access_token().await?,
                    }
                    if let Some(token) = self.session.access_token() {
                        ctx.set_bearer(&token).map_err(ApiError::Client)?;
                    }
                    // Loop re-dispatches; the context is marked retried, so a
                    // second 401 forwards.
                }
            }
        }
    }

    /// First non-forward verdict from the response stages.
    fn response_directive(&self, status: StatusCode, ctx: &RequestContext) -> ResponseDirective {
        let session = self.session.snapshot();
        self.response_stages
            .iter()
            .map(|stage| stage.inspect(status, ctx, &session))
            .find(|directive| *directive != ResponseDirective::Forward)
            .unwrap_or(ResponseDirective::Forward)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(RequestContext::get(path)).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        let ctx = RequestContext::post(path)
            .json(body)
            .map_err(ApiError::Client)?;
        self.execute(ctx).await
    }

    /// Fetch the signed-in user's profile and install it in the session.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        let response: UserResponse = self.get("/api/auth/me").await?;
        let user = User::from(response);
        self.session.set_user(user.clone()).await;
        Ok(user)
    }
}
