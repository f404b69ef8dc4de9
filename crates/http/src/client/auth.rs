//! Authentication API client methods

use super::context::RequestContext;
use super::error::ClientError;
use super::PanelClient;
use crate::types::{LoginRequest, LoginResponse, RefreshTokenRequest, RefreshTokenResponse};

impl PanelClient {
    /// Exchange credentials for an access/refresh token pair (public endpoint).
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ClientError> {
        let ctx = RequestContext::post("/api/auth/login").json(request)?;
        self.execute(ctx).await
    }

    /// Mint a new access token from a refresh token (public endpoint).
    pub async fn refresh_token(
        &self,
        request: &RefreshTokenRequest,
    ) -> Result<RefreshTokenResponse, ClientError> {
        let ctx = RequestContext::post("/refresh-token").json(request)?;
        self.execute(ctx).await
    }
}
