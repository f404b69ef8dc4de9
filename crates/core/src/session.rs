//! Session data model

use serde::{Deserialize, Serialize};

/// Identity record for the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub name: Option<String>,
}

/// Authentication state for the current user.
///
/// There is exactly one of these per process, owned by the frontend's session
/// store and persisted verbatim through a [`crate::StorageBackend`]. The
/// access token is the short-lived credential sent with authenticated
/// requests; the refresh token is used only to mint a new access token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: Option<User>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl Session {
    /// Check if the session is authenticated (a non-empty access token is present).
    pub fn is_authenticated(&self) -> bool {
        self.access_token.as_deref().is_some_and(|token| !token.is_empty())
    }

    /// Install both tokens from a successful credential exchange.
    pub fn apply_login(
        &mut self,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) {
        self.access_token = Some(access_token.into());
        self.refresh_token = Some(refresh_token.into());
    }

    /// Replace the access token after a successful refresh.
    ///
    /// The refresh token and user record are left untouched.
    pub fn apply_refresh(&mut self, access_token: impl Into<String>) {
        self.access_token = Some(access_token.into());
    }

    /// Clear the user and both tokens. Idempotent.
    pub fn clear(&mut self) {
        self.user = None;
        self.access_token = None;
        self.refresh_token = None;
    }
}
