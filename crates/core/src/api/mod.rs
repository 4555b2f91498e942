//! Credential-bearing API surface for callers that are already logged in.

pub mod auto_refresh;
pub mod client;

pub use auto_refresh::{call_with_auto_refresh, AutoRefreshLineApiClient};
pub use client::{LineApiClient, LineApiClientImpl};
