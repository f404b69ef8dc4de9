//! Persisted session store

use std::sync::{Arc, RwLock};

use panel_core::{Session, StorageBackend, User};
use panel_http::types::{LoginRequest, RefreshTokenRequest};
use panel_http::{ClientError, PanelClient};
use tokio::sync::Mutex;

use super::AuthError;
use crate::config::AuthConfig;

/// Owner of the process-wide session state.
///
/// Cloning yields another handle to the same state. All reads and writes go
/// through the accessors here; the session-aware client never keeps its own
/// copy of the tokens. Every mutation is written through to the storage
/// backend.
#[derive(Clone)]
pub struct SessionStore {
    session: Arc<RwLock<Session>>,
    storage: Arc<dyn StorageBackend>,
    client: PanelClient,
    /// Serializes refresh round trips so concurrent 401 handlers cannot race
    /// on the stored token.
    refresh_gate: Arc<Mutex<()>>,
}

impl SessionStore {
    /// Create an empty store over the given backend and public client.
    pub fn new(client: PanelClient, storage: Arc<dyn StorageBackend>) -> Self {
        Self {
            session: Arc::new(RwLock::new(Session::default())),
            storage,
            client,
            refresh_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Restore persisted session state, if any.
    ///
    /// A missing key leaves the store empty; a corrupt payload is discarded
    /// from storage and the store starts logged out.
    pub async fn restore(&self) {
        let stored = match self.storage.get(AuthConfig::SESSION_STATE_KEY).await {
            Ok(stored) => stored,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read persisted session");
                return;
            }
        };
        let Some(raw) = stored else {
            return;
        };
        match serde_json::from_str::<Session>(&raw) {
            Ok(session) => {
                *self.session.write().expect("session lock poisoned") = session;
                tracing::debug!("session restored from storage");
            }
            Err(err) => {
                tracing::warn!(error = %err, "discarding corrupt persisted session");
                if let Err(err) = self.storage.remove(AuthConfig::SESSION_STATE_KEY).await {
                    tracing::warn!(error = %err, "failed to clear persisted session");
                }
            }
        }
    }

    /// True iff an access token is present.
    pub fn is_authenticated(&self) -> bool {
        self.session
            .read()
            .expect("session lock poisoned")
            .is_authenticated()
    }

    /// The current access token, if any.
    pub fn access_token(&self) -> Option<String> {
        self.session
            .read()
            .expect("session lock poisoned")
            .access_token
            .clone()
    }

    /// The current session state, by value.
    pub fn snapshot(&self) -> Session {
        self.session.read().expect("session lock poisoned").clone()
    }

    /// Exchange credentials for a token pair and store it.
    ///
    /// On any failure the session is left exactly as it was.
    pub async fn login(&self, credentials: LoginRequest) -> Result<(), AuthError> {
        let response = self.client.login(&credentials).await.map_err(|err| {
            tracing::debug!(error = %err, "login rejected");
            AuthError::LoginFailed(err)
        })?;

        self.session
            .write()
            .expect("session lock poisoned")
            .apply_login(response.access_token, response.refresh_token);
        tracing::debug!(username = %credentials.username, "logged in");
        self.persist().await;
        Ok(())
    }

    /// Clear the session. Idempotent; storage failures are logged only.
    pub async fn logout(&self) {
        self.session.write().expect("session lock poisoned").clear();
        if let Err(err) = self.storage.remove(AuthConfig::SESSION_STATE_KEY).await {
            tracing::warn!(error = %err, "failed to clear persisted session");
        }
    }

    /// Mint a new access token from the stored refresh token.
    ///
    /// Any failure logs the session out before the error is returned, so a
    /// failed refresh can never leave a half-authenticated session behind.
    pub async fn refresh_access_token(&self) -> Result<(), AuthError> {
        let _gate = self.refresh_gate.lock().await;
        self.refresh_locked().await
    }

    /// Refresh unless another caller already replaced `observed_token`.
    ///
    /// Deduplication path for concurrent 401 handlers: the first caller
    /// performs the round trip, later callers find the token changed and
    /// reuse it.
    pub async fn refresh_if_stale(&self, observed_token: &str) -> Result<(), AuthError> {
        let _gate = self.refresh_gate.lock().await;
        let already_replaced = self
            .session
            .read()
            .expect("session lock poisoned")
            .access_token
            .as_deref()
            .is_some_and(|current| current != observed_token);
        if already_replaced {
            tracing::debug!("access token already refreshed by a concurrent request");
            return Ok(());
        }
        self.refresh_locked().await
    }

    async fn refresh_locked(&self) -> Result<(), AuthError> {
        let refresh_token = self
            .session
            .read()
            .expect("session lock poisoned")
            .refresh_token
            .clone();
        let Some(refresh_token) = refresh_token else {
            self.logout().await;
            return Err(AuthError::RefreshFailed(ClientError::Configuration(
                "no refresh token available".into(),
            )));
        };

        let request = RefreshTokenRequest { refresh_token };
        match self.client.refresh_token(&request).await {
            Ok(response) => {
                self.session
                    .write()
                    .expect("session lock poisoned")
                    .apply_refresh(response.token);
                tracing::debug!("access token refreshed");
                self.persist().await;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "token refresh failed, logging out");
                self.logout().await;
                Err(AuthError::RefreshFailed(err))
            }
        }
    }

    /// Install the profile record for the signed-in user.
    pub async fn set_user(&self, user: User) {
        self.session.write().expect("session lock poisoned").user = Some(user);
        self.persist().await;
    }

    /// Write the current session through to storage.
    ///
    /// The in-memory session is authoritative; a write failure is logged and
    /// the operation that triggered it still succeeds.
    async fn persist(&self) {
        let snapshot = self.snapshot();
        match serde_json::to_string(&snapshot) {
            Ok(raw) => {
                if let Err(err) = self.storage.set(AuthConfig::SESSION_STATE_KEY, &raw).await {
                    tracing::warn!(error = %err, "failed to persist session");
                }
            }
            Err(err) => tracing::warn!(error = %err, "failed to serialize session"),
        }
    }
}
