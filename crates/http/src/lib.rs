//! Panel HTTP client
//!
//! The client half of the backend contract: a reqwest-based client with the
//! console's fixed JSON defaults, typed authentication endpoints, and the
//! explicit request pipeline the frontend drives for refresh-and-retry.

pub mod client;
pub mod types;

pub use client::context::RequestContext;
pub use client::error::ClientError;
pub use client::{PanelClient, PanelClientBuilder};
