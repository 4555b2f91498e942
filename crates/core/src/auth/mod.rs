//! Sign in with LINE flow.
//!
//! ```text
//!  host ──start──▶ AuthenticationController ──build_request──▶ login URI
//!                        │                                        │
//!                        │◀── AgentResolver (app / browser / chooser)
//!                        │
//!  redirect ─┬─ on_new_intent ─────────┐
//!            ├─ on_activity_result ────┤ (phase guard, cancel grace window)
//!            └─ on_host_resumed ───────┘
//!                        │
//!                        ▼
//!       token exchange ▶ profile ▶ cache ▶ ID token validation ▶ LoginResult
//! ```

pub mod agent;
pub mod controller;
pub mod login;
pub mod ports;
pub mod redirect;
pub mod request;
pub mod status;
pub mod validator;
