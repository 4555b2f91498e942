//! # LINE SDK Domain
//!
//! Value types shared by every layer of the LINE login SDK.
//!
//! This crate contains:
//! - Scopes, tokens, credentials, profile and ID token values
//! - The API response envelope (`LineApiResponse`, `LineApiError`)
//! - The login result handed back to the caller
//! - SDK configuration structures and constants
//! - Domain error types and Result definitions
//!
//! ## Architecture
//! - No dependencies on other LINE SDK crates
//! - Only external dependencies allowed
//! - Pure, immutable data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
