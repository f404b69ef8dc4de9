//! Wire types for the backend contract
//!
//! Field casing is pinned per endpoint; the backend speaks snake_case on the
//! login exchange and camelCase on the refresh endpoint.

use serde::{Deserialize, Serialize};

/// Credentials for `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Token pair returned by a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// Body for `POST /refresh-token`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// New access token minted from a refresh token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenResponse {
    pub token: String,
}

/// Profile record from `GET /api/auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl From<UserResponse> for panel_core::User {
    fn from(response: UserResponse) -> Self {
        Self {
            id: response.id,
            username: response.username,
            name: response.name,
        }
    }
}
