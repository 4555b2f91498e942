//! # LINE SDK Core
//!
//! Login flow logic - no HTTP, storage or platform code.
//!
//! This crate contains:
//! - The authentication state machine and its persisted status
//! - Authorization request construction and login agent selection
//! - Redirect parsing and the single-slot redirect relay
//! - ID token claim validation
//! - The API client facade and its auto-refresh decorator
//! - Port interfaces (traits) implemented by `linesdk-infra` and the host
//!
//! ## Architecture Principles
//! - Only depends on `linesdk-common` and `linesdk-domain`
//! - All remote calls and host interaction go through traits
//! - Remote failures travel as `LineApiResponse` values, never panics

pub mod api;
pub mod auth;

// Re-export specific items to avoid ambiguity
pub use api::{call_with_auto_refresh, AutoRefreshLineApiClient, LineApiClient, LineApiClientImpl};
pub use auth::agent::{AgentIntent, AgentResolver, LineAppVersion, ResolvedAgent};
pub use auth::controller::{AuthenticationController, LoginDependencies};
pub use auth::login::{LoginApi, LoginIntent, LoginResultIntent};
pub use auth::ports::{
    AccessTokenStore, AgentEnvironment, AuthenticationApi, LaunchMode, LoginHost, TalkApi,
};
pub use auth::redirect::{AuthorizationResult, RedirectIntent, RedirectRelay};
pub use auth::request::{build_request, AuthorizationRequest};
pub use auth::status::{AuthenticationPhase, AuthenticationStatus};
pub use auth::validator::{IdTokenValidationError, IdTokenValidator};
