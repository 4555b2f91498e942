//! Modular common utilities shared across the LINE SDK crates.
//!
//! # Safety and Quality
//!
//! This crate enforces strict safety and quality standards. Everything that
//! touches key material or login secrets lives here so the higher layers only
//! see opaque strings.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: shared error type, random identifiers
//! - `runtime`: AES-256-GCM string cipher with Argon2 key derivation
//! - `platform`: login primitives (PKCE)
//! - `observability`: optional tracing (not included by default)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod error;
#[cfg(feature = "foundation")]
pub mod random;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod crypto;

// Platform tier
// -------------------------------------------------------------------
#[cfg(feature = "platform")]
pub mod auth;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "platform")]
pub use auth::{CodeChallengeMethod, PkceCode};
#[cfg(feature = "runtime")]
pub use crypto::{EncryptedData, EncryptionService, StringCipher};
#[cfg(feature = "foundation")]
pub use error::{CommonError, CommonResult};
