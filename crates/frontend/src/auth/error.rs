//! Authentication error types

use panel_http::ClientError;
use thiserror::Error;

/// Failures of the two authentication round trips.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Credential exchange rejected or failed in transit; the session is
    /// left untouched.
    #[error("Login failed")]
    LoginFailed(#[source] ClientError),

    /// Refresh rejected or failed in transit; the session has already been
    /// logged out by the time this is returned.
    #[error("Unable to refresh token")]
    RefreshFailed(#[source] ClientError),
}
