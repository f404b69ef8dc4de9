//! Client request pipeline
//!
//! Ordered request and response stages evaluated around every dispatch. Each
//! stage is a pure function over the request state and a session snapshot;
//! the driver that owns the session executes the effects a stage asks for
//! (the refresh round trip, the re-dispatch).

use panel_core::Session;
use reqwest::StatusCode;

use super::context::RequestContext;
use super::error::ClientError;

/// Transform applied to an outgoing request before dispatch.
pub trait RequestStage: Send + Sync {
    fn apply(&self, ctx: &mut RequestContext, session: &Session) -> Result<(), ClientError>;
}

/// Verdict a response stage hands back to the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseDirective {
    /// Surface the response as-is, success or terminal error.
    Forward,
    /// Refresh the session's access token, then re-dispatch the request once.
    RefreshAndRetry,
}

/// Inspection applied to an error response before it is surfaced.
pub trait ResponseStage: Send + Sync {
    fn inspect(
        &self,
        status: StatusCode,
        ctx: &RequestContext,
        session: &Session,
    ) -> ResponseDirective;
}

/// Attaches `Authorization: Bearer <token>` when the session holds one.
///
/// A session without an access token dispatches the request unmodified.
pub struct BearerAuth;

impl RequestStage for BearerAuth {
    fn apply(&self, ctx: &mut RequestContext, session: &Session) -> Result<(), ClientError> {
        if let Some(token) = session.access_token.as_deref().filter(|t| !t.is_empty()) {
            ctx.set_bearer(token)?;
        }
        Ok(())
    }
}

/// Asks for one refresh-and-retry on the first 401 a request sees.
///
/// The retry flag is scoped to the request context, so concurrent calls each
/// get their own allowance and an already-retried 401 forwards unchanged.
pub struct RetryOnUnauthorized;

impl ResponseStage for RetryOnUnauthorized {
    fn inspect(
        &self,
        status: StatusCode,
        ctx: &RequestContext,
        _session: &Session,
    ) -> ResponseDirective {
        if status == StatusCode::UNAUTHORIZED && !ctx.retried() {
            ResponseDirective::RefreshAndRetry
        } else {
            ResponseDirective::Forward
        }
    }
}
