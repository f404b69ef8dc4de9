//! Panel frontend core
//!
//! State and plumbing behind the console UI: the persisted session store,
//! the session-aware API client with single-shot refresh-and-retry, and the
//! navigation guard. The UI layer renders on top of these and never touches
//! tokens or routes' auth rules directly.

pub mod auth;
pub mod client;
pub mod config;
pub mod router;
pub mod utils;

pub use auth::{AuthError, SessionStore};
pub use client::{ApiError, SessionClient};
pub use config::{AuthConfig, default_client};
pub use router::{GuardDecision, NavigationGuard, RouteDef, RouteTable};
