//! Frontend configuration

use std::time::Duration;

use panel_http::{ClientError, PanelClient};

/// Authentication configuration
pub struct AuthConfig;

impl AuthConfig {
    /// Storage key for the persisted session state
    pub const SESSION_STATE_KEY: &'static str = "session_state";

    /// Backend base address for local development
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:3000";

    /// Request timeout for backend calls
    pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(10_000);
}

/// Client over the local development backend with the console's fixed
/// configuration.
pub fn default_client() -> Result<PanelClient, ClientError> {
    PanelClient::builder()
        .base_url(AuthConfig::DEFAULT_BASE_URL)
        .timeout(AuthConfig::REQUEST_TIMEOUT)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_client_points_at_the_local_backend() {
        let client = default_client().unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
    }
}
